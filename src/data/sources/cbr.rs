//! Central Bank of Russia daily rates, via the cbr-xml-daily.ru JSON archive
//!
//! One document per day at `{base}/archive/YYYY/MM/DD/daily_json.js`. Days
//! without an official quote (weekends, holidays, not yet published) answer
//! 404.

use super::{validate_rate, RateSource};
use crate::config::{Settings, CBR_BASE_URL};
use crate::error::{CbrError, Result};
use crate::types::Rate;
use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

const USD_CODE: &str = "USD";

/// CBR daily archive source (no API key required)
pub struct CbrDailySource {
    client: Client,
    base_url: String,
    max_retries: u32,
}

/// Outcome of a single HTTP attempt that did not produce a quote
enum AttemptError {
    /// Worth one more try: transport failure, timeout, 5xx
    Transient(String),
    Fatal(CbrError),
}

mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "PascalCase")]
    pub struct DailyResponse {
        #[serde(default)]
        pub date: Option<String>,
        pub valute: serde_json::Map<String, serde_json::Value>,
    }

    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "PascalCase")]
    pub struct Valute {
        #[serde(default = "one")]
        pub nominal: f64,
        pub value: f64,
    }

    fn one() -> f64 {
        1.0
    }
}

impl CbrDailySource {
    /// Create a source against the public archive with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(CBR_BASE_URL, Duration::from_secs(10), 1, true)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::with_config(
            &settings.base_url,
            settings.timeout(),
            settings.max_retries,
            settings.use_proxy,
        )
    }

    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        max_retries: u32,
        use_proxy: bool,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cbr-usdrub/", env!("CARGO_PKG_VERSION")));
        if !use_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| CbrError::FetchError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
        })
    }

    /// Archive document URL for `date`
    pub fn archive_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/archive/{}/{:02}/{:02}/daily_json.js",
            self.base_url,
            date.year(),
            date.month(),
            date.day()
        )
    }

    fn attempt(&self, url: &str) -> std::result::Result<Option<Rate>, AttemptError> {
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_builder() {
                AttemptError::Fatal(CbrError::FetchError(format!("Invalid request {}: {}", url, e)))
            } else {
                AttemptError::Transient(format!("HTTP request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_server_error() {
            return Err(AttemptError::Transient(format!(
                "CBR archive returned error: {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(AttemptError::Fatal(CbrError::FetchError(format!(
                "CBR archive returned error: {}",
                status
            ))));
        }

        let body = response.text().map_err(|e| {
            AttemptError::Transient(format!("Failed to read response from {}: {}", url, e))
        })?;

        parse_daily_json(&body).map_err(AttemptError::Fatal)
    }
}

impl RateSource for CbrDailySource {
    fn fetch_day(&self, date: NaiveDate) -> Result<Option<Rate>> {
        let url = self.archive_url(date);
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.attempt(&url) {
                Ok(rate) => return Ok(rate),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Transient(msg)) if attempts <= self.max_retries => {
                    log::warn!("{}; retrying", msg);
                }
                Err(AttemptError::Transient(msg)) => {
                    return Err(CbrError::FetchError(format!(
                        "{} (gave up after {} attempt(s))",
                        msg, attempts
                    )));
                }
            }
        }
    }

    fn name(&self) -> &str {
        "CBR"
    }
}

/// Decode one archive document into the per-unit USD rate.
///
/// `Ok(None)` means the document is well formed but carries no USD quote.
pub fn parse_daily_json(body: &str) -> Result<Option<Rate>> {
    let doc: api::DailyResponse = serde_json::from_str(body)
        .map_err(|e| CbrError::ParseError(format!("Invalid CBR daily document: {}", e)))?;

    let usd = match doc.valute.get(USD_CODE) {
        Some(value) => value,
        None => {
            log::debug!("No {} entry in document dated {:?}", USD_CODE, doc.date);
            return Ok(None);
        }
    };

    let valute: api::Valute = serde_json::from_value(usd.clone())
        .map_err(|e| CbrError::ParseError(format!("Invalid {} entry: {}", USD_CODE, e)))?;

    if !(valute.nominal > 0.0) {
        return Err(CbrError::ParseError(format!(
            "{} nominal must be positive, got: {}",
            USD_CODE, valute.nominal
        )));
    }

    validate_rate(valute.value / valute.nominal).map(Some)
}
