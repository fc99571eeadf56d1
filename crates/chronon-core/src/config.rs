//! Configuration structures for the timebase and tick measurement.
//!
//! Supports TOML deserialization; every field has a default so an empty
//! file is a valid configuration.

use crate::duration::Duration;
use crate::error::TimeResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration as StdDuration;
use tracing::debug;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChrononConfig {
    /// How `now()` reads the platform timer.
    pub timebase: TimebaseConfig,

    /// Tick-rate measurement settings.
    pub ticker: TickerConfig,
}

/// Timer source and read settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimebaseConfig {
    /// Which OS clock backs `now()`.
    pub source: ClockSource,

    /// Pin the reading thread to this CPU for the duration of each read.
    ///
    /// Only needed where the high-resolution timer is not consistent
    /// across cores.
    pub pin_cpu: Option<usize>,
}

/// OS clocks a timebase can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClockSource {
    /// `CLOCK_MONOTONIC`: steady, not affected by wall-clock changes.
    #[default]
    Monotonic,
    /// `CLOCK_MONOTONIC_RAW`: like monotonic, without NTP slewing (Linux).
    MonotonicRaw,
    /// `CLOCK_BOOTTIME`: monotonic, includes time suspended (Linux).
    Boottime,
    /// `CLOCK_PROCESS_CPUTIME_ID`: CPU time consumed by this process.
    ProcessCpu,
}

/// Tick-rate measurement settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Interval after which the counter computes a rate and resets.
    #[serde(with = "humantime_serde")]
    pub period: StdDuration,

    /// Total measurement time.
    #[serde(with = "humantime_serde")]
    pub run_for: StdDuration,

    /// Simulated work (a sleep) performed on every tick.
    #[serde(with = "humantime_serde")]
    pub work: StdDuration,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            period: StdDuration::from_millis(100),
            run_for: StdDuration::from_secs(1),
            work: StdDuration::ZERO,
        }
    }
}

impl TickerConfig {
    /// The period as a chronon [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns an overflow error if the period exceeds the microsecond range.
    pub fn period(&self) -> TimeResult<Duration> {
        Duration::try_from(self.period)
    }

    /// The measurement time as a chronon [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns an overflow error if the value exceeds the microsecond range.
    pub fn run_for(&self) -> TimeResult<Duration> {
        Duration::try_from(self.run_for)
    }

    /// The per-tick work as a chronon [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns an overflow error if the value exceeds the microsecond range.
    pub fn work(&self) -> TimeResult<Duration> {
        Duration::try_from(self.work)
    }
}

impl ChrononConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        debug!(?path, "Reading configuration file");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticker.period.is_zero() {
            return Err(ConfigError::Invalid(
                "ticker.period must be greater than zero".into(),
            ));
        }
        for (name, value) in [
            ("ticker.period", self.ticker.period),
            ("ticker.run_for", self.ticker.run_for),
            ("ticker.work", self.ticker.work),
        ] {
            if Duration::try_from(value).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "{name} exceeds the microsecond range"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ChrononConfig::default();
        assert_eq!(config.timebase.source, ClockSource::Monotonic);
        assert_eq!(config.timebase.pin_cpu, None);
        assert_eq!(config.ticker.period, StdDuration::from_millis(100));
        assert_eq!(config.ticker.period().unwrap(), Duration::from_milliseconds_i32(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [timebase]
            source = "process_cpu"
            pin_cpu = 0

            [ticker]
            period = "250ms"
            run_for = "2s"
            work = "1ms"
        "#;

        let config = ChrononConfig::from_toml(toml).unwrap();
        assert_eq!(config.timebase.source, ClockSource::ProcessCpu);
        assert_eq!(config.timebase.pin_cpu, Some(0));
        assert_eq!(config.ticker.period, StdDuration::from_millis(250));
        assert_eq!(config.ticker.run_for().unwrap(), Duration::from_microseconds(2_000_000));
        assert_eq!(config.ticker.work().unwrap(), Duration::from_microseconds(1_000));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ChrononConfig::from_toml("").unwrap();
        assert_eq!(config, ChrononConfig::default());
    }

    #[test]
    fn test_roundtrip_toml() {
        let mut config = ChrononConfig::default();
        config.timebase.source = ClockSource::MonotonicRaw;
        let toml = config.to_toml().unwrap();
        assert!(
            toml.contains("monotonic_raw"),
            "Expected 'monotonic_raw' in serialized TOML: {}",
            toml
        );
        let parsed = ChrononConfig::from_toml(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_zero_period_rejected() {
        let err = ChrononConfig::from_toml("[ticker]\nperiod = \"0s\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_source_rejected() {
        let err = ChrononConfig::from_toml("[timebase]\nsource = \"sundial\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timebase]\nsource = \"boottime\"").unwrap();

        let config = ChrononConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timebase.source, ClockSource::Boottime);

        let missing = ChrononConfig::from_file(std::path::Path::new("/nonexistent/chronon.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_source_json_names() {
        let source: ClockSource = serde_json::from_str("\"monotonic\"").unwrap();
        assert_eq!(source, ClockSource::Monotonic);
        assert_eq!(serde_json::to_string(&ClockSource::ProcessCpu).unwrap(), "\"process_cpu\"");
    }
}
