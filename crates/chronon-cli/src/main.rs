//! `chronon` command-line entry point.
//!
//! Reads the platform timer, measures sleeps, converts values between
//! units, and drives a tick counter to report realized tick rates.

mod report;

use anyhow::{Context, Result};
use chronon_clock::{Clock, TickCounter};
use chronon_core::config::{ChrononConfig, TickerConfig};
use chronon_core::Duration;
use chronon_platform::Timebase;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};

use crate::report::{ConvertReport, NowReport, RateSummary, SleepReport};

/// chronon command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "chronon",
    about = "Monotonic timer readings, sleeps, unit conversion, and tick-rate measurement",
    version,
    long_about = None
)]
struct Args {
    /// Path to a configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current timer reading.
    Now,

    /// Sleep, then report how long the sleep actually took.
    Sleep {
        /// How long to sleep (e.g. "15ms", "2s").
        #[arg(value_parser = humantime::parse_duration)]
        duration: StdDuration,
    },

    /// Drive a tick counter and report the tick rate of every period.
    Rate {
        /// Period after which the rate is computed (overrides config).
        #[arg(long, value_parser = humantime::parse_duration)]
        period: Option<StdDuration>,

        /// Total measurement time (overrides config).
        #[arg(long, value_parser = humantime::parse_duration)]
        run_for: Option<StdDuration>,

        /// Sleep performed on every tick to simulate work (overrides config).
        #[arg(long, value_parser = humantime::parse_duration)]
        work: Option<StdDuration>,
    },

    /// Show a microsecond value in every supported unit.
    Convert {
        /// Value in microseconds; may be negative.
        #[arg(allow_hyphen_values = true)]
        microseconds: i64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    debug!(version = env!("CARGO_PKG_VERSION"), "Starting chronon");

    let mut config = load_config(&args)?;

    let timebase = chronon_platform::initialize(&config.timebase)
        .context("Failed to calibrate the timebase")?;

    match args.command {
        Command::Now => run_now(timebase, args.json),
        Command::Sleep { duration } => {
            let duration = Duration::try_from(duration).context("Sleep duration too long")?;
            run_sleep(duration, args.json)
        }
        Command::Rate {
            period,
            run_for,
            work,
        } => {
            if let Some(period) = period {
                config.ticker.period = period;
            }
            if let Some(run_for) = run_for {
                config.ticker.run_for = run_for;
            }
            if let Some(work) = work {
                config.ticker.work = work;
            }
            config.validate().context("Invalid rate settings")?;
            run_rate(&config.ticker, args.json)
        }
        Command::Convert { microseconds } => {
            emit(&ConvertReport::new(Duration::from_microseconds(microseconds)), args.json)
        }
    }
}

/// Initialize logging with the specified log level.
fn init_logging(level: &str) {
    let filter = format!(
        "chronon={},chronon_core={},chronon_platform={},chronon_clock={}",
        level, level, level, level
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing file wins):
/// 1. Command-line `--config` argument
/// 2. `CHRONON_CONFIG` environment variable
/// 3. `chronon.toml` in the working directory
/// 4. Built-in defaults
fn load_config(args: &Args) -> Result<ChrononConfig> {
    // 1. Command-line argument (highest priority)
    if let Some(config_path) = &args.config {
        info!(?config_path, "Loading config from command-line argument");
        return ChrononConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path));
    }

    // 2. Environment variable
    if let Ok(env_path) = std::env::var("CHRONON_CONFIG") {
        let config_path = PathBuf::from(&env_path);
        if config_path.exists() {
            info!(?config_path, "Loading config from CHRONON_CONFIG");
            return ChrononConfig::from_file(&config_path).with_context(|| {
                format!("Failed to load config from CHRONON_CONFIG={:?}", env_path)
            });
        }
        warn!(
            path = %env_path,
            "CHRONON_CONFIG set but file does not exist, checking other locations"
        );
    }

    // 3. Working directory
    let local_path = PathBuf::from("chronon.toml");
    if local_path.exists() {
        info!(?local_path, "Loading config from working directory");
        return ChrononConfig::from_file(&local_path)
            .with_context(|| format!("Failed to load config from {:?}", local_path));
    }

    // 4. Built-in defaults
    debug!("No config file found, using built-in defaults");
    Ok(ChrononConfig::default())
}

fn run_now(timebase: &Timebase, json: bool) -> Result<()> {
    let reading = timebase.try_now().context("Failed to read the timer")?;
    let report = NowReport {
        source: timebase.source(),
        microseconds: reading.as_microseconds_i64(),
        seconds: reading.as_seconds_f64(),
        timespec: reading
            .to_os_timespec()
            .context("Reading not representable as timespec")?,
        resolution_us: timebase.resolution().map(Duration::as_microseconds_i64),
    };
    emit(&report, json)
}

fn run_sleep(duration: Duration, json: bool) -> Result<()> {
    let mut clock = Clock::new();
    chronon_platform::sleep(duration);
    let measured = clock.restart();
    emit(&SleepReport::new(duration, measured), json)
}

fn run_rate(ticker: &TickerConfig, json: bool) -> Result<()> {
    let period = ticker.period()?;
    let run_for = ticker.run_for()?;
    let work = ticker.work()?;

    info!(
        period_us = period.as_microseconds_i64(),
        run_for_us = run_for.as_microseconds_i64(),
        work_us = work.as_microseconds_i64(),
        "Measuring tick rate"
    );

    let total = Clock::new();
    let mut counter = TickCounter::new();
    let mut summary = RateSummary::new(period);

    while total.elapsed() < run_for {
        if counter.update(period) {
            summary.record(counter.tick_rate());
            info!(
                interval = summary.intervals,
                tick_rate = counter.tick_rate(),
                "Period elapsed"
            );
        }
        chronon_platform::sleep(work);
    }

    summary.finish(total.elapsed());
    if summary.intervals == 0 {
        warn!("Run ended before a full period elapsed; no rate was computed");
    }
    emit(&summary, json)
}

/// Print a report as text or JSON.
fn emit<T: Serialize + Display>(report: &T, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{text}");
    } else {
        println!("{report}");
    }
    Ok(())
}
