//! Shared test helpers: canned rate sources and a loopback HTTP responder

#![allow(dead_code)]

use cbr_usdrub::error::{CbrError, Result};
use cbr_usdrub::types::Rate;
use cbr_usdrub::data::RateSource;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily archive document carrying the given USD value
pub fn daily_json(usd_value: f64) -> String {
    format!(
        r#"{{"Date": "2024-01-10T11:30:00+03:00", "Valute": {{"USD": {{"ID": "R01235", "NumCode": "840", "CharCode": "USD", "Nominal": 1, "Name": "Доллар США", "Value": {}, "Previous": 89.6883}}}}}}"#,
        usd_value
    )
}

/// Source answering from a fixed date -> rate table
pub struct CannedSource {
    pub quotes: BTreeMap<NaiveDate, Rate>,
    pub failing_day: Option<NaiveDate>,
}

impl CannedSource {
    pub fn new(quotes: impl IntoIterator<Item = (NaiveDate, Rate)>) -> Self {
        Self {
            quotes: quotes.into_iter().collect(),
            failing_day: None,
        }
    }
}

impl RateSource for CannedSource {
    fn fetch_day(&self, date: NaiveDate) -> Result<Option<Rate>> {
        if self.failing_day == Some(date) {
            return Err(CbrError::FetchError(format!("connection reset on {}", date)));
        }
        Ok(self.quotes.get(&date).copied())
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// Minimal HTTP/1.1 server on 127.0.0.1 replaying canned responses.
///
/// Response `n` answers the `n`-th request; once the list is exhausted the
/// last response repeats. Request paths are recorded.
pub struct Responder {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl Responder {
    pub fn spawn(responses: Vec<(u16, String)>) -> Self {
        assert!(!responses.is_empty());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let paths = Arc::new(Mutex::new(Vec::new()));

        let (thread_hits, thread_paths) = (hits.clone(), paths.clone());
        thread::spawn(move || {
            for stream in listener.incoming() {
                let mut stream = match stream {
                    Ok(s) => s,
                    Err(_) => break,
                };

                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) | Err(_) => break,
                        Ok(_) if header == "\r\n" => break,
                        Ok(_) => {}
                    }
                }
                if let Some(path) = request_line.split_whitespace().nth(1) {
                    thread_paths.lock().unwrap().push(path.to_string());
                }

                let n = thread_hits.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses.get(n).unwrap_or(responses.last().unwrap());
                let reason = match *status {
                    200 => "OK",
                    404 => "Not Found",
                    503 => "Service Unavailable",
                    _ => "Error",
                };
                let _ = write!(
                    stream,
                    "HTTP/1.1 {} {}\r\nContent-Type: application/javascript; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = stream.flush();
            }
        });

        Self {
            base_url,
            hits,
            paths,
        }
    }

    /// Same response for every request
    pub fn always(status: u16, body: impl Into<String>) -> Self {
        Self::spawn(vec![(status, body.into())])
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

/// Loopback listener that accepts connections and never answers.
///
/// Accepted streams are held open so clients hit their read timeout rather
/// than a reset.
pub struct SilentListener {
    pub base_url: String,
    accepted: Arc<AtomicUsize>,
    _streams: Arc<Mutex<Vec<TcpStream>>>,
}

impl SilentListener {
    pub fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let accepted = Arc::new(AtomicUsize::new(0));
        let streams = Arc::new(Mutex::new(Vec::new()));

        let (thread_accepted, thread_streams) = (accepted.clone(), streams.clone());
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(s) => {
                        thread_accepted.fetch_add(1, Ordering::SeqCst);
                        thread_streams.lock().unwrap().push(s);
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            base_url,
            accepted,
            _streams: streams,
        }
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}
