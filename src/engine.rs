//! Fetch-then-export pipeline

use crate::calendar::DateWindow;
use crate::data::export::{ExportSummary, ParquetExporter};
use crate::data::sources::{RateFetcher, RateSource};
use crate::error::{CbrError, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Runs one fetch of the 7-day window followed by one export
pub struct ExportEngine<S> {
    fetcher: RateFetcher<S>,
    exporter: ParquetExporter,
}

impl<S: RateSource> ExportEngine<S> {
    pub fn new(fetcher: RateFetcher<S>, exporter: ParquetExporter) -> Self {
        Self { fetcher, exporter }
    }

    /// Export the window ending at `end`, stamping the file with `now`.
    ///
    /// The output directory is prepared before any network traffic so an
    /// unwritable target fails fast. Nothing is written unless the fetch
    /// produced at least one record.
    pub fn run(&self, end: NaiveDate, now: NaiveDateTime) -> Result<ExportSummary> {
        let window = DateWindow::ending_at(end, now.date())?;
        self.exporter.prepare_dir()?;

        log::info!(
            "Fetching USD/RUB from {} for {}..={} (missing days: {})",
            self.fetcher.source().name(),
            window.start(),
            window.end(),
            self.fetcher.policy()
        );

        let records = self.fetcher.fetch(&window)?;
        if records.is_empty() {
            return Err(CbrError::EmptyDataError(format!(
                "no quotes published for {}..={}",
                window.start(),
                window.end()
            )));
        }

        log::info!("Fetched {} of {} days", records.len(), window.days().len());

        self.exporter.export(&records, now)
    }
}
