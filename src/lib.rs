//! # cbr_usdrub
//!
//! Fetches the official Central Bank of Russia USD/RUB rate for the last
//! seven calendar days and writes it to a timestamped Parquet file.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cbr_usdrub::prelude::*;
//! use chrono::Local;
//!
//! # fn main() -> cbr_usdrub::error::Result<()> {
//! let source = CbrDailySource::new()?;
//! let engine = ExportEngine::new(RateFetcher::new(source), ParquetExporter::new("."));
//!
//! let now = Local::now().naive_local();
//! let summary = engine.run(now.date(), now)?;
//! println!("Saved: {}", summary.path.display());
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::calendar::DateWindow;
    pub use crate::config::Settings;
    pub use crate::data::{CbrDailySource, ExportSummary, ParquetExporter, RateFetcher, RateSource};
    pub use crate::engine::ExportEngine;
    pub use crate::error::{CbrError, Result};
    pub use crate::types::*;
}
