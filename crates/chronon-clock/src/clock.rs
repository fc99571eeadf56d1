//! Stopwatch clock.

use chronon_core::duration::Duration;
use chronon_platform::source::{GlobalSource, TimeSource};

/// A resettable clock measuring time since a start reading.
///
/// Over the default [`GlobalSource`] the clock is a single [`Duration`];
/// use [`Clock::with_source`] to drive it from another source.
///
/// Readings that would go below the start (only possible with a
/// non-monotonic source) saturate rather than fail.
///
/// # Example
///
/// ```
/// use chronon_clock::Clock;
/// use chronon_core::Duration;
/// use chronon_platform::ManualSource;
///
/// let source = ManualSource::new(Duration::ZERO);
/// let mut clock = Clock::with_source(source.clone());
///
/// source.advance(Duration::from_milliseconds_i32(16)).unwrap();
/// assert_eq!(clock.elapsed(), Duration::from_microseconds(16_000));
///
/// let lap = clock.restart();
/// assert_eq!(lap, Duration::from_microseconds(16_000));
/// assert_eq!(clock.elapsed(), Duration::ZERO);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Clock<S: TimeSource = GlobalSource> {
    /// Reading captured at creation or the last restart.
    start: Duration,
    /// Where readings come from.
    source: S,
}

impl Clock {
    /// Start a clock on the process-wide timebase.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(GlobalSource)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSource> Clock<S> {
    /// Start a clock on `source`.
    #[must_use]
    pub fn with_source(source: S) -> Self {
        let start = source.now();
        Self { start, source }
    }

    /// The reading this clock measures from.
    #[must_use]
    pub fn start(&self) -> Duration {
        self.start
    }

    /// The source this clock reads.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Time since the start reading. Does not modify the clock.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.source.now().saturating_sub(self.start)
    }

    /// Return the elapsed time and start measuring again from now.
    ///
    /// The same reading ends the old lap and starts the new one, so no time
    /// is lost between laps.
    pub fn restart(&mut self) -> Duration {
        let now = self.source.now();
        let elapsed = now.saturating_sub(self.start);
        self.start = now;
        elapsed
    }
}
