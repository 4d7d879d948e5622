//! Core types and constants

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange rate, RUB per 1 USD
pub type Rate = f64;

/// Number of calendar days covered by one export, inclusive of the end date
pub const WINDOW_DAYS: i64 = 7;

/// One official USD/RUB quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub date: NaiveDate,
    pub rate: Rate,
}

impl RateRecord {
    /// Create a new record
    pub fn new(date: NaiveDate, rate: Rate) -> Self {
        Self { date, rate }
    }
}

/// What to do with a day the upstream source has no quote for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingDayPolicy {
    /// Leave the day out of the output
    #[default]
    Omit,
    /// Repeat the most recent earlier quote within the window
    CarryForward,
}

impl FromStr for MissingDayPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "omit" => Ok(MissingDayPolicy::Omit),
            "carry-forward" => Ok(MissingDayPolicy::CarryForward),
            other => Err(format!(
                "unknown missing-day policy '{}' (expected 'omit' or 'carry-forward')",
                other
            )),
        }
    }
}

impl fmt::Display for MissingDayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingDayPolicy::Omit => write!(f, "omit"),
            MissingDayPolicy::CarryForward => write!(f, "carry-forward"),
        }
    }
}
