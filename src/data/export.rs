//! Parquet export of rate records
//!
//! Each export writes one file named `cbr_usdrub_<YYYY-MM-DD>_<HHMMSS>.parquet`
//! after the export time. Data goes to a hidden temporary file in the target
//! directory first and is renamed into place only once fully written, so a
//! failed export never leaves a truncated file behind. Existing files are
//! never overwritten.

use crate::error::{CbrError, Result};
use crate::types::RateRecord;
use chrono::{NaiveDate, NaiveDateTime};
use hashbrown::HashSet;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const DATE_COLUMN: &str = "date";
pub const RATE_COLUMN: &str = "rate";

const FILE_PREFIX: &str = "cbr_usdrub";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Output file name for an export made at `now`
pub fn output_file_name(now: NaiveDateTime) -> String {
    format!("{}_{}.parquet", FILE_PREFIX, now.format("%Y-%m-%d_%H%M%S"))
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Build the two-column table: `date` as ISO-8601 strings, `rate` as Float64
pub fn to_dataframe(records: &[RateRecord]) -> PolarsResult<DataFrame> {
    let dates: Vec<String> = records
        .iter()
        .map(|r| r.date.format(DATE_FORMAT).to_string())
        .collect();
    let rates: Vec<f64> = records.iter().map(|r| r.rate).collect();

    df!(
        DATE_COLUMN => dates,
        RATE_COLUMN => rates
    )
}

/// Writes rate records into a target directory
#[derive(Debug, Clone)]
pub struct ParquetExporter {
    out_dir: PathBuf,
}

impl ParquetExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Create the output directory if needed and check it is a directory
    pub fn prepare_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.out_dir).map_err(|e| CbrError::write(&self.out_dir, e))?;
        if !self.out_dir.is_dir() {
            return Err(CbrError::write(&self.out_dir, "not a directory"));
        }
        Ok(())
    }

    /// Write `records` to a new file named after `now`.
    ///
    /// Empty input is rejected before the filesystem is touched.
    pub fn export(&self, records: &[RateRecord], now: NaiveDateTime) -> Result<ExportSummary> {
        if records.is_empty() {
            return Err(CbrError::EmptyDataError(
                "record sequence is empty, refusing to write an empty file".to_string(),
            ));
        }

        self.prepare_dir()?;

        let target = self.out_dir.join(output_file_name(now));
        if target.exists() {
            return Err(CbrError::write(&target, "file already exists"));
        }

        let mut df = to_dataframe(records).map_err(|e| CbrError::write(&target, e))?;

        let mut part = tempfile::Builder::new()
            .prefix(".cbr_usdrub_")
            .suffix(".parquet.part")
            .tempfile_in(&self.out_dir)
            .map_err(|e| CbrError::write(&self.out_dir, e))?;

        ParquetWriter::new(part.as_file_mut())
            .with_compression(ParquetCompression::Snappy)
            .with_statistics(true)
            .finish(&mut df)
            .map_err(|e| CbrError::write(&target, e))?;

        part.as_file()
            .sync_all()
            .map_err(|e| CbrError::write(part.path(), e))?;

        // dropping `part` on any error above removes the temporary file
        part.persist_noclobber(&target)
            .map_err(|e| CbrError::write(&target, e.error))?;

        log::info!("Wrote {} rows to {}", records.len(), target.display());

        Ok(ExportSummary {
            path: target,
            rows: records.len(),
        })
    }
}

/// Load an exported file back into records, checking its schema
pub fn read_parquet(path: &Path) -> Result<Vec<RateRecord>> {
    let parse_err =
        |e: &dyn std::fmt::Display| CbrError::ParseError(format!("{}: {}", path.display(), e));

    let file = File::open(path).map_err(|e| CbrError::ReadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let df = ParquetReader::new(file).finish().map_err(|e| parse_err(&e))?;

    let columns = df.get_column_names();
    if columns != [DATE_COLUMN, RATE_COLUMN] {
        return Err(parse_err(&format!(
            "expected columns [{}, {}], found {:?}",
            DATE_COLUMN, RATE_COLUMN, columns
        )));
    }

    let dates = df
        .column(DATE_COLUMN)
        .and_then(|s| s.str())
        .map_err(|e| parse_err(&e))?;
    let rates = df
        .column(RATE_COLUMN)
        .and_then(|s| s.f64())
        .map_err(|e| parse_err(&e))?;

    let mut seen = HashSet::with_capacity(df.height());
    let mut records = Vec::with_capacity(df.height());

    for (row, (date, rate)) in dates.into_iter().zip(rates.into_iter()).enumerate() {
        let (date, rate) = match (date, rate) {
            (Some(d), Some(r)) => (d, r),
            _ => return Err(parse_err(&format!("null value in row {}", row))),
        };
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|e| parse_err(&format!("row {}: {}", row, e)))?;
        if !seen.insert(date) {
            return Err(parse_err(&format!("duplicate date {}", date)));
        }
        records.push(RateRecord::new(date, rate));
    }

    Ok(records)
}
