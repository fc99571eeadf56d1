//! Time source abstraction.
//!
//! Clocks read time through [`TimeSource`] so that tests can substitute a
//! [`ManualSource`] for the platform timer.

use chronon_core::duration::Duration;
use chronon_core::error::TimeResult;
use crossbeam_utils::atomic::AtomicCell;
use std::fmt::Debug;
use std::sync::Arc;

/// Provides monotonic readings.
pub trait TimeSource: Debug {
    /// Current reading, in microseconds since the source's epoch.
    fn now(&self) -> Duration;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Reads the process-wide timebase (see [`crate::global`]).
///
/// Zero-sized, so a clock over it is no larger than its start reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalSource;

impl TimeSource for GlobalSource {
    fn now(&self) -> Duration {
        crate::now()
    }
}

/// A hand-driven source for tests and simulations.
///
/// Clones share the same reading, so a test can keep one handle and move
/// another into the clock under test.
///
/// # Example
///
/// ```
/// use chronon_core::Duration;
/// use chronon_platform::{ManualSource, TimeSource};
///
/// let source = ManualSource::new(Duration::ZERO);
/// let handle = source.clone();
///
/// handle.advance(Duration::from_milliseconds_i32(5)).unwrap();
/// assert_eq!(source.now(), Duration::from_microseconds(5_000));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    reading: Arc<AtomicCell<Duration>>,
}

impl ManualSource {
    /// Create a source reading `start`.
    #[must_use]
    pub fn new(start: Duration) -> Self {
        Self {
            reading: Arc::new(AtomicCell::new(start)),
        }
    }

    /// Jump to an absolute reading. Going backwards is allowed.
    pub fn set(&self, reading: Duration) {
        self.reading.store(reading);
    }

    /// Move the reading forward (or backward, for a negative step).
    ///
    /// # Errors
    ///
    /// Returns an overflow error if the new reading is not representable;
    /// the reading is left unchanged.
    pub fn advance(&self, step: Duration) -> TimeResult<Duration> {
        let next = self.reading.load().checked_add(step)?;
        self.reading.store(next);
        Ok(next)
    }
}

impl TimeSource for ManualSource {
    fn now(&self) -> Duration {
        self.reading.load()
    }
}
