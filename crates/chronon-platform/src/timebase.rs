//! Calibrated access to the platform high-resolution timer.
//!
//! A [`Timebase`] is built once from a [`TimebaseConfig`]: it resolves the
//! requested clock against what the platform offers, caches the timer
//! resolution, and validates the optional CPU pin. After that every read is
//! a single `clock_gettime` (Unix) or `Instant` subtraction (elsewhere).

use crate::affinity;
use crate::source::TimeSource;
use chronon_core::config::{ClockSource, TimebaseConfig};
use chronon_core::duration::Duration;
use chronon_core::error::{TimeError, TimeResult};
#[cfg(unix)]
use chronon_core::timespec::Timespec;
use crossbeam_utils::atomic::AtomicCell;
#[allow(unused_imports)] // Platform-specific code may not use all imports
use tracing::{debug, error, info, warn};

/// A calibrated platform timer.
#[derive(Debug)]
pub struct Timebase {
    /// Clock actually read, after platform fallbacks.
    source: ClockSource,
    /// CPU the reading thread is pinned to, if any.
    pin_cpu: Option<usize>,
    /// Timer resolution reported by the OS, when known.
    resolution: Option<Duration>,
    /// Last successful reading, served if a later read fails.
    last: AtomicCell<Duration>,
    /// Epoch for `Instant`-based readings.
    #[cfg(not(unix))]
    base: std::time::Instant,
}

impl Timebase {
    /// Calibrate a timebase.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Platform`] if `pin_cpu` names a CPU this thread
    /// cannot run on.
    pub fn new(config: &TimebaseConfig) -> TimeResult<Self> {
        if let Some(cpu) = config.pin_cpu {
            affinity::validate_cpu(cpu)?;
        }

        let mut timebase = Self::unpinned(config.source);
        timebase.pin_cpu = config.pin_cpu;

        // Prime the fallback reading through the configured path.
        let first = timebase.try_now()?;
        timebase.last.store(first);

        info!(
            source = ?timebase.source,
            pin_cpu = ?timebase.pin_cpu,
            resolution = ?timebase.resolution,
            "Timebase calibrated"
        );
        Ok(timebase)
    }

    /// Calibrate without CPU pinning. Cannot fail.
    pub(crate) fn unpinned(requested: ClockSource) -> Self {
        let source = resolve_source(requested);
        let timebase = Self {
            source,
            pin_cpu: None,
            resolution: query_resolution(source),
            last: AtomicCell::new(Duration::ZERO),
            #[cfg(not(unix))]
            base: std::time::Instant::now(),
        };
        if let Ok(first) = timebase.read() {
            timebase.last.store(first);
        }
        timebase
    }

    /// The clock this timebase reads.
    #[must_use]
    pub fn source(&self) -> ClockSource {
        self.source
    }

    /// The CPU reads are pinned to.
    #[must_use]
    pub fn pin_cpu(&self) -> Option<usize> {
        self.pin_cpu
    }

    /// Timer resolution reported by the OS.
    ///
    /// A resolution finer than a microsecond reads as zero.
    #[must_use]
    pub fn resolution(&self) -> Option<Duration> {
        self.resolution
    }

    /// Read the timer, reporting failures instead of masking them.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Platform`] if pinning or the OS read fails, and
    /// an overflow error if the reading does not fit in microseconds.
    pub fn try_now(&self) -> TimeResult<Duration> {
        let _pin = self
            .pin_cpu
            .map(affinity::pin_current_thread)
            .transpose()?;
        self.read()
    }

    #[cfg(unix)]
    fn read(&self) -> TimeResult<Duration> {
        let ts = nix::time::clock_gettime(clock_id(self.source))
            .map_err(|e| TimeError::Platform(format!("clock_gettime failed: {e}")))?;
        Duration::from_os_timespec(Timespec {
            seconds: i64::from(ts.tv_sec()),
            nanoseconds: i64::from(ts.tv_nsec()),
        })
    }

    #[cfg(not(unix))]
    fn read(&self) -> TimeResult<Duration> {
        Duration::try_from(self.base.elapsed())
    }
}

impl TimeSource for Timebase {
    fn now(&self) -> Duration {
        match self.try_now() {
            Ok(reading) => {
                self.last.store(reading);
                reading
            }
            Err(e) => {
                let last = self.last.load();
                error!("Timer read failed, serving last reading: {e}");
                last
            }
        }
    }
}

/// Map a requested clock onto one this platform provides.
fn resolve_source(requested: ClockSource) -> ClockSource {
    let available = match requested {
        ClockSource::Monotonic => true,
        ClockSource::MonotonicRaw | ClockSource::Boottime => {
            cfg!(any(target_os = "linux", target_os = "android"))
        }
        ClockSource::ProcessCpu => cfg!(unix),
    };

    if available {
        requested
    } else {
        warn!(
            ?requested,
            "Clock source not available on this platform, using monotonic"
        );
        ClockSource::Monotonic
    }
}

#[cfg(unix)]
fn clock_id(source: ClockSource) -> nix::time::ClockId {
    use nix::time::ClockId;

    match source {
        #[cfg(any(target_os = "linux", target_os = "android"))]
        ClockSource::MonotonicRaw => ClockId::CLOCK_MONOTONIC_RAW,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        ClockSource::Boottime => ClockId::CLOCK_BOOTTIME,
        ClockSource::ProcessCpu => ClockId::CLOCK_PROCESS_CPUTIME_ID,
        _ => ClockId::CLOCK_MONOTONIC,
    }
}

#[cfg(unix)]
fn query_resolution(source: ClockSource) -> Option<Duration> {
    match nix::time::clock_getres(clock_id(source)) {
        Ok(ts) => Duration::from_os_timespec(Timespec {
            seconds: i64::from(ts.tv_sec()),
            nanoseconds: i64::from(ts.tv_nsec()),
        })
        .ok(),
        Err(e) => {
            debug!(?source, "clock_getres failed: {e}");
            None
        }
    }
}

#[cfg(not(unix))]
fn query_resolution(_source: ClockSource) -> Option<Duration> {
    None
}
