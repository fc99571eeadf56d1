//! Command output: serializable reports with a plain-text rendering.

use chronon_core::{ClockSource, Duration, Timespec};
use serde::Serialize;
use std::fmt;

/// A single timer reading.
#[derive(Debug, Clone, Serialize)]
pub struct NowReport {
    /// Clock the reading came from.
    pub source: ClockSource,
    /// Reading in microseconds.
    pub microseconds: i64,
    /// Reading in seconds.
    pub seconds: f64,
    /// Reading split the way the OS reports it.
    pub timespec: Timespec,
    /// Timer resolution in microseconds, when the OS reports one.
    pub resolution_us: Option<i64>,
}

impl fmt::Display for NowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "source:       {:?}", self.source)?;
        writeln!(f, "microseconds: {}", self.microseconds)?;
        writeln!(f, "seconds:      {:.6}", self.seconds)?;
        writeln!(
            f,
            "timespec:     {}s {}ns",
            self.timespec.seconds, self.timespec.nanoseconds
        )?;
        match self.resolution_us {
            Some(us) => write!(f, "resolution:   {us}us"),
            None => write!(f, "resolution:   unknown"),
        }
    }
}

/// Requested versus measured sleep.
#[derive(Debug, Clone, Serialize)]
pub struct SleepReport {
    /// Requested sleep in microseconds.
    pub requested_us: i64,
    /// Measured sleep in microseconds.
    pub measured_us: i64,
    /// How much longer than requested the sleep took.
    pub overshoot_us: i64,
}

impl SleepReport {
    /// Build a report from the requested and measured spans.
    #[must_use]
    pub fn new(requested: Duration, measured: Duration) -> Self {
        Self {
            requested_us: requested.as_microseconds_i64(),
            measured_us: measured.as_microseconds_i64(),
            overshoot_us: measured.saturating_sub(requested).as_microseconds_i64(),
        }
    }
}

impl fmt::Display for SleepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requested {}us, slept {}us (overshoot {}us)",
            self.requested_us, self.measured_us, self.overshoot_us
        )
    }
}

/// One value in every unit chronon converts to.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    /// Input in microseconds.
    pub microseconds: i64,
    /// Seconds as f32.
    pub seconds_f32: f32,
    /// Seconds as f64.
    pub seconds_f64: f64,
    /// Whole seconds, floored.
    pub lower_seconds: i64,
    /// Milliseconds, if they fit an i32.
    pub milliseconds: Option<i32>,
    /// Nanoseconds, if they fit an i64.
    pub nanoseconds: Option<i64>,
    /// OS timestamp form, if representable.
    pub timespec: Option<Timespec>,
}

impl ConvertReport {
    /// Convert `value` into every unit; unrepresentable units are `None`.
    #[must_use]
    pub fn new(value: Duration) -> Self {
        Self {
            microseconds: value.as_microseconds_i64(),
            seconds_f32: value.as_seconds_f32(),
            seconds_f64: value.as_seconds_f64(),
            lower_seconds: value.as_lower_seconds_i64(),
            milliseconds: value.as_milliseconds_i32().ok(),
            nanoseconds: value.as_nanoseconds_i64().ok(),
            timespec: value.to_os_timespec().ok(),
        }
    }
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_overflow<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "overflow".to_string(), |v| v.to_string())
        }

        writeln!(f, "microseconds:  {}", self.microseconds)?;
        writeln!(f, "seconds (f32): {}", self.seconds_f32)?;
        writeln!(f, "seconds (f64): {}", self.seconds_f64)?;
        writeln!(f, "lower seconds: {}", self.lower_seconds)?;
        writeln!(f, "milliseconds:  {}", or_overflow(self.milliseconds))?;
        writeln!(f, "nanoseconds:   {}", or_overflow(self.nanoseconds))?;
        match self.timespec {
            Some(ts) => write!(f, "timespec:      {}s {}ns", ts.seconds, ts.nanoseconds),
            None => write!(f, "timespec:      overflow"),
        }
    }
}

/// Statistics over the tick rates reported during a `rate` run.
#[derive(Debug, Clone, Serialize)]
pub struct RateSummary {
    /// Requested period in microseconds.
    pub period_us: i64,
    /// Number of completed periods.
    pub intervals: u64,
    /// Lowest rate seen, ticks per second.
    pub min_rate: Option<f64>,
    /// Highest rate seen, ticks per second.
    pub max_rate: Option<f64>,
    /// Mean of the reported rates.
    pub mean_rate: Option<f64>,
    /// Total measurement time in microseconds.
    pub elapsed_us: i64,
    #[serde(skip)]
    sum: f64,
}

impl RateSummary {
    /// An empty summary for `period`.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period_us: period.as_microseconds_i64(),
            intervals: 0,
            min_rate: None,
            max_rate: None,
            mean_rate: None,
            elapsed_us: 0,
            sum: 0.0,
        }
    }

    /// Add the rate of one completed period.
    pub fn record(&mut self, rate: f64) {
        self.intervals += 1;
        self.sum += rate;
        self.min_rate = Some(self.min_rate.map_or(rate, |min| min.min(rate)));
        self.max_rate = Some(self.max_rate.map_or(rate, |max| max.max(rate)));
        #[allow(clippy::cast_precision_loss)]
        let mean = self.sum / self.intervals as f64;
        self.mean_rate = Some(mean);
    }

    /// Record the total measurement time.
    pub fn finish(&mut self, elapsed: Duration) {
        self.elapsed_us = elapsed.as_microseconds_i64();
    }
}

impl fmt::Display for RateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} periods of {}us in {}us",
            self.intervals, self.period_us, self.elapsed_us
        )?;
        match (self.min_rate, self.mean_rate, self.max_rate) {
            (Some(min), Some(mean), Some(max)) => write!(
                f,
                "tick rate min {min:.1}/s, mean {mean:.1}/s, max {max:.1}/s"
            ),
            _ => write!(f, "no period completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_summary_statistics() {
        let mut summary = RateSummary::new(Duration::from_milliseconds_i32(100));
        assert!(summary.to_string().contains("no period completed"));

        for rate in [100.0, 300.0, 200.0] {
            summary.record(rate);
        }
        summary.finish(Duration::from_microseconds(310_000));

        assert_eq!(summary.intervals, 3);
        assert_eq!(summary.min_rate, Some(100.0));
        assert_eq!(summary.max_rate, Some(300.0));
        assert_eq!(summary.mean_rate, Some(200.0));
        assert_eq!(summary.elapsed_us, 310_000);
    }

    #[test]
    fn test_rate_summary_json_hides_accumulator() {
        let mut summary = RateSummary::new(Duration::from_milliseconds_i32(100));
        summary.record(50.0);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["period_us"], 100_000);
        assert_eq!(json["intervals"], 1);
        assert!(json.get("sum").is_none());
    }

    #[test]
    fn test_convert_report_marks_overflow() {
        let report = ConvertReport::new(Duration::MAX);
        assert_eq!(report.milliseconds, None);
        assert_eq!(report.nanoseconds, None);
        assert!(report.to_string().contains("overflow"));

        let report = ConvertReport::new(Duration::from_microseconds(-1_500_000));
        assert_eq!(report.lower_seconds, -2);
        assert_eq!(report.milliseconds, Some(-1_500));
        assert_eq!(
            report.timespec,
            Some(Timespec { seconds: -2, nanoseconds: 500_000_000 })
        );
    }

    #[test]
    fn test_sleep_report_overshoot() {
        let report = SleepReport::new(
            Duration::from_microseconds(1_000),
            Duration::from_microseconds(1_070),
        );
        assert_eq!(report.overshoot_us, 70);
        assert_eq!(report.to_string(), "requested 1000us, slept 1070us (overshoot 70us)");
    }
}
