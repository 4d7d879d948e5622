//! Rate data handling
//!
//! - **sources**: upstream quote sources and the windowed fetcher
//! - **export**: Parquet export of fetched records

pub mod export;
pub mod sources;

pub use export::{output_file_name, read_parquet, ExportSummary, ParquetExporter};
pub use sources::{CbrDailySource, RateFetcher, RateSource};
