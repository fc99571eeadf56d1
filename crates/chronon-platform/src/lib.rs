//! Platform timers for chronon.
//!
//! This crate turns the OS high-resolution timer into [`Duration`] readings:
//!
//! - **Time sources** ([`source`]): the [`TimeSource`] seam plus the global
//!   and manual implementations
//! - **Timebase** ([`timebase`]): one-time calibration of the platform timer
//! - **Sleep** ([`sleep`](mod@sleep)): thread suspension that ignores
//!   non-positive durations
//! - **Affinity** ([`affinity`]): optional CPU pinning around each read
//!
//! The process-wide timebase is created by [`initialize`], or lazily with
//! default settings on the first [`now`] call.
//!
//! # Example
//!
//! ```
//! use chronon_core::{Duration, TimebaseConfig};
//!
//! chronon_platform::initialize(&TimebaseConfig::default()).unwrap();
//!
//! let start = chronon_platform::now();
//! chronon_platform::sleep(Duration::from_milliseconds_i32(1));
//! assert!(chronon_platform::now() > start);
//! ```

pub mod affinity;
pub mod sleep;
pub mod source;
pub mod timebase;

pub use sleep::sleep;
pub use source::{GlobalSource, ManualSource, TimeSource};
pub use timebase::Timebase;

use chronon_core::config::TimebaseConfig;
use chronon_core::duration::Duration;
use chronon_core::error::TimeResult;
use std::sync::OnceLock;
use tracing::warn;

static TIMEBASE: OnceLock<Timebase> = OnceLock::new();

/// Calibrate the process-wide timebase.
///
/// Idempotent: once a timebase exists, later calls return it unchanged and
/// log a warning if they asked for different settings.
///
/// # Errors
///
/// Returns an error if calibration fails (see [`Timebase::new`]); the
/// global timebase stays uninitialized in that case.
pub fn initialize(config: &TimebaseConfig) -> TimeResult<&'static Timebase> {
    if let Some(existing) = TIMEBASE.get() {
        warn_if_different(existing, config);
        return Ok(existing);
    }

    let timebase = Timebase::new(config)?;
    let installed = TIMEBASE.get_or_init(|| timebase);
    warn_if_different(installed, config);
    Ok(installed)
}

/// Whether the process-wide timebase has been created.
#[must_use]
pub fn is_initialized() -> bool {
    TIMEBASE.get().is_some()
}

/// The process-wide timebase, created with default settings if needed.
pub fn global() -> &'static Timebase {
    TIMEBASE.get_or_init(|| Timebase::unpinned(TimebaseConfig::default().source))
}

/// Current reading of the process-wide timebase.
#[must_use]
pub fn now() -> Duration {
    global().now()
}

fn warn_if_different(existing: &Timebase, config: &TimebaseConfig) {
    if existing.pin_cpu() != config.pin_cpu || existing.source() != config.source {
        warn!(
            requested = ?config,
            active_source = ?existing.source(),
            active_pin_cpu = ?existing.pin_cpu(),
            "Timebase already initialized; keeping the active settings"
        );
    }
}
