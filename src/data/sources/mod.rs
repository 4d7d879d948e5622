//! Upstream exchange-rate sources
//!
//! A [`RateSource`] answers "what was the USD/RUB rate on this day", one day
//! at a time. [`RateFetcher`] walks a [`DateWindow`] over a source and turns
//! the answers into an ordered list of [`RateRecord`]s.

pub mod cbr;

pub use cbr::CbrDailySource;

use crate::calendar::DateWindow;
use crate::error::{CbrError, Result};
use crate::types::{MissingDayPolicy, Rate, RateRecord};
use chrono::NaiveDate;

/// Trait for daily rate sources
pub trait RateSource {
    /// Quote for `date`, or `None` if the source publishes none for that day
    fn fetch_day(&self, date: NaiveDate) -> Result<Option<Rate>>;

    /// Get the source name
    fn name(&self) -> &str;
}

impl<S: RateSource + ?Sized> RateSource for Box<S> {
    fn fetch_day(&self, date: NaiveDate) -> Result<Option<Rate>> {
        (**self).fetch_day(date)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: RateSource + ?Sized> RateSource for &S {
    fn fetch_day(&self, date: NaiveDate) -> Result<Option<Rate>> {
        (**self).fetch_day(date)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Reject anything that cannot be an exchange rate
pub fn validate_rate(rate: Rate) -> Result<Rate> {
    if !rate.is_finite() {
        return Err(CbrError::ParseError(format!(
            "rate must be a finite number, got: {}",
            rate
        )));
    }
    if rate <= 0.0 {
        return Err(CbrError::ParseError(format!(
            "rate must be positive, got: {}",
            rate
        )));
    }
    Ok(rate)
}

/// Fetches every day of a window from a [`RateSource`]
pub struct RateFetcher<S> {
    source: S,
    policy: MissingDayPolicy,
}

impl<S: RateSource> RateFetcher<S> {
    /// Create a fetcher that omits days without a quote
    pub fn new(source: S) -> Self {
        Self::with_policy(source, MissingDayPolicy::Omit)
    }

    pub fn with_policy(source: S, policy: MissingDayPolicy) -> Self {
        Self { source, policy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn policy(&self) -> MissingDayPolicy {
        self.policy
    }

    /// Fetch the window oldest day first.
    ///
    /// The result holds at most one record per day of the window, in
    /// ascending date order. The first source error aborts the fetch.
    pub fn fetch(&self, window: &DateWindow) -> Result<Vec<RateRecord>> {
        let days = window.days();
        let mut records = Vec::with_capacity(days.len());
        let mut last_rate: Option<Rate> = None;

        for day in days {
            log::debug!("Requesting {} rate for {}", self.source.name(), day);

            match self.source.fetch_day(day)? {
                Some(rate) => {
                    let rate = validate_rate(rate)?;
                    last_rate = Some(rate);
                    records.push(RateRecord::new(day, rate));
                }
                None => match (self.policy, last_rate) {
                    (MissingDayPolicy::CarryForward, Some(rate)) => {
                        log::info!("No quote for {}, carrying forward {:.4}", day, rate);
                        records.push(RateRecord::new(day, rate));
                    }
                    _ => {
                        log::warn!("No quote for {}, day omitted", day);
                    }
                },
            }
        }

        Ok(records)
    }
}
