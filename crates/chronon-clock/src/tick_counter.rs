//! Tick-rate counter.
//!
//! Call [`TickCounter::update`] once per tick (frame, loop iteration,
//! message). Once the requested period has passed, the counter turns the
//! ticks it saw into a rate, resets, and reports that it did.

use crate::clock::Clock;
use chronon_core::duration::Duration;
use chronon_platform::source::{GlobalSource, TimeSource};
use tracing::trace;

/// Periodic tick-rate counter with an embedded [`Clock`].
///
/// The rate is `ticks / period`, using the requested period rather than the
/// time that actually passed. The tick that triggers a reset is counted in
/// the new interval, so [`TickCounter::tick_count`] is `1` right after a
/// reset.
///
/// # Example
///
/// ```
/// use chronon_clock::TickCounter;
/// use chronon_core::Duration;
/// use chronon_platform::ManualSource;
///
/// let source = ManualSource::new(Duration::ZERO);
/// let mut counter = TickCounter::with_source(source.clone());
/// let period = Duration::from_milliseconds_i32(500);
///
/// for _ in 0..30 {
///     assert!(!counter.update(period));
/// }
///
/// source.advance(period).unwrap();
/// assert!(counter.update(period));
/// assert!((counter.tick_rate() - 60.0).abs() < 1e-3);
/// assert_eq!(counter.tick_count(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TickCounter<S: TimeSource = GlobalSource> {
    /// Ticks per second over the last completed period.
    tick_rate: f64,
    /// Measures the current period.
    clock: Clock<S>,
    /// Ticks seen since the last reset.
    tick_count: u64,
}

impl TickCounter {
    /// Create a counter on the process-wide timebase.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(GlobalSource)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSource> TickCounter<S> {
    /// Create a counter whose clock reads `source`.
    #[must_use]
    pub fn with_source(source: S) -> Self {
        Self {
            tick_rate: 0.0,
            clock: Clock::with_source(source),
            tick_count: 0,
        }
    }

    /// Record one tick and report whether `period` had elapsed.
    ///
    /// On a reset the tick rate is recomputed, the count cleared and the
    /// clock restarted before this tick is counted. A period of zero resets
    /// on every call; its rate is not finite.
    pub fn update(&mut self, period: Duration) -> bool {
        let elapsed = self.clock.elapsed();
        let reset = elapsed >= period;

        if reset {
            let ticks = self.tick_count;
            #[allow(clippy::cast_precision_loss)]
            let rate = ticks as f64 / f64::from(period.as_seconds_f32());
            self.tick_rate = rate;
            self.tick_count = 0;
            self.clock.restart();

            trace!(
                ticks,
                tick_rate = rate,
                elapsed_us = elapsed.as_microseconds_i64(),
                "Tick counter reset"
            );
        }

        self.tick_count += 1;
        reset
    }

    /// Ticks per second over the last completed period; `0.0` before the
    /// first reset.
    #[must_use]
    pub fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    /// Ticks recorded since the last reset.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The embedded clock.
    #[must_use]
    pub fn clock(&self) -> &Clock<S> {
        &self.clock
    }
}
