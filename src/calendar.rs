//! Date window covered by an export

use crate::error::{CbrError, Result};
use crate::types::WINDOW_DAYS;
use chrono::{Duration, NaiveDate};

/// First day the CBR archive carries an official USD/RUB quote
pub fn first_quote_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1992, 7, 1).unwrap_or(NaiveDate::MIN)
}

/// Inclusive range of calendar days `[end - 6, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Window ending at `end`. Fails if `end` lies after `today` or the
    /// window would start before [`first_quote_date`].
    pub fn ending_at(end: NaiveDate, today: NaiveDate) -> Result<Self> {
        if end > today {
            return Err(CbrError::InvalidDate(format!(
                "end date {} is in the future (today is {})",
                end, today
            )));
        }

        let start = end
            .checked_sub_signed(Duration::days(WINDOW_DAYS - 1))
            .filter(|start| *start >= first_quote_date())
            .ok_or_else(|| {
                CbrError::InvalidDate(format!(
                    "window ending {} starts before the first archived quote ({})",
                    end,
                    first_quote_date()
                ))
            })?;

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// All days of the window, oldest first
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take_while(|d| *d <= self.end).collect()
    }
}
