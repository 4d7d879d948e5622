//! cbr-usdrub CLI - export the last 7 days of CBR USD/RUB rates to Parquet
//!
//! ## Example Usage
//!
//! ```bash
//! # Write cbr_usdrub_<date>_<time>.parquet into the current directory
//! cbr-usdrub
//!
//! # Choose the target directory and fill weekends with the last quote
//! cbr-usdrub --out-dir data/rates --fill carry-forward
//!
//! # Re-export a past week with a progress bar
//! cbr-usdrub --end-date 2024-01-07 --show-progress
//! ```

use cbr_usdrub::config::Settings;
use cbr_usdrub::data::{CbrDailySource, ParquetExporter, RateFetcher, RateSource};
use cbr_usdrub::engine::ExportEngine;
use cbr_usdrub::error::Result;
use cbr_usdrub::types::{MissingDayPolicy, Rate, WINDOW_DAYS};
use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;

/// Fetch USD/RUB rates from CBR for the last 7 days and save them to Parquet
#[derive(Parser)]
#[command(name = "cbr-usdrub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch USD/RUB rates from CBR for the last 7 days and save them to Parquet", long_about = None)]
struct Cli {
    /// Output directory (default: current directory)
    #[arg(long, value_name = "PATH")]
    out_dir: Option<PathBuf>,

    /// Last day of the window, YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE")]
    end_date: Option<NaiveDate>,

    /// Days without a quote: omit or carry-forward
    #[arg(long, value_name = "POLICY")]
    fill: Option<MissingDayPolicy>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show a progress bar while fetching
    #[arg(long)]
    show_progress: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Ticks a progress bar around every request of the wrapped source
struct ProgressSource<S> {
    inner: S,
    bar: ProgressBar,
}

impl<S: RateSource> RateSource for ProgressSource<S> {
    fn fetch_day(&self, date: NaiveDate) -> Result<Option<Rate>> {
        self.bar.set_message(date.to_string());
        let result = self.inner.fetch_day(date);
        self.bar.inc(1);
        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// `--config` must exist; otherwise `~/.cbr-usdrub/config.toml` is used if present
fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    if let Some(config_path) = path {
        return Settings::load(config_path);
    }

    if let Some(home) = dirs::home_dir() {
        let default_config = home.join(".cbr-usdrub").join("config.toml");
        if default_config.exists() {
            log::debug!("Using config {}", default_config.display());
            return Settings::load(&default_config);
        }
    }

    Ok(Settings::default())
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(WINDOW_DAYS as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn run(cli: Cli) -> Result<PathBuf> {
    let mut settings = load_settings(cli.config.as_ref())?;
    if let Some(out_dir) = cli.out_dir {
        settings.out_dir = out_dir;
    }
    if let Some(fill) = cli.fill {
        settings.fill = fill;
    }

    let now = Local::now().naive_local();
    let end = cli.end_date.unwrap_or_else(|| now.date());

    if cli.verbose {
        println!("{} v{}", "cbr-usdrub".cyan().bold(), env!("CARGO_PKG_VERSION"));
        println!("  {} {}", "Source:".bold(), settings.base_url);
        println!("  {} {}", "Out dir:".bold(), settings.out_dir.display());
        println!("  {} {}", "End date:".bold(), end);
        println!("  {} {}", "Missing days:".bold(), settings.fill);
        println!();
    }

    let cbr = CbrDailySource::from_settings(&settings)?;
    let bar = cli.show_progress.then(progress_bar);
    let source: Box<dyn RateSource> = match &bar {
        Some(bar) => Box::new(ProgressSource {
            inner: cbr,
            bar: bar.clone(),
        }),
        None => Box::new(cbr),
    };

    let engine = ExportEngine::new(
        RateFetcher::with_policy(source, settings.fill),
        ParquetExporter::new(&settings.out_dir),
    );
    let result = engine.run(end, now);

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let summary = result?;
    if cli.verbose {
        println!("  {} {}", "Rows:".bold(), summary.rows);
    }
    Ok(summary.path)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(path) => println!("{} {}", "Saved:".green().bold(), path.display()),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(e.exit_code());
        }
    }
}
