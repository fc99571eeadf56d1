//! Tick-rate measurement against the real timer.
//!
//! # Acceptance Criteria
//!
//! - A ~1.05s loop with a 100ms period resets the counter repeatedly
//! - Each reported rate is the ticks of that window over 0.1s
//! - The tick that triggers a reset is the first of the next window

use super::common::{assert_close, ms};
use chronon_clock::{Clock, TickCounter};
use chronon_core::Duration;
use chronon_platform::ManualSource;

#[test]
fn test_clock_starts_near_zero() {
    let clock = Clock::new();
    let elapsed = clock.elapsed();
    assert!(!elapsed.is_negative());
    assert!(elapsed < ms(50), "fresh clock already at {elapsed:?}");
}

#[test]
fn test_sleep_is_measured_by_clock() {
    let mut clock = Clock::new();
    chronon_platform::sleep(ms(20));
    let slept = clock.restart();
    assert!(slept >= ms(20), "slept only {slept:?}");
    assert!(clock.elapsed() < slept);
}

#[test]
fn test_rate_loop_over_one_second() {
    let period = ms(100);
    let total = Clock::new();
    let mut counter = TickCounter::new();
    let mut window_ticks = 0u64;
    let mut rates = Vec::new();

    while total.elapsed() < ms(1_050) {
        let before = counter.tick_count();
        if counter.update(period) {
            // The window closed with `before` ticks; the triggering tick
            // opens the next one.
            rates.push((before, counter.tick_rate()));
            assert_eq!(counter.tick_count(), 1);
            window_ticks = 1;
        } else {
            window_ticks += 1;
            assert_eq!(counter.tick_count(), window_ticks);
        }
        chronon_platform::sleep(ms(2));
    }

    assert!(
        (8..=11).contains(&rates.len()),
        "expected about ten resets, got {}",
        rates.len()
    );
    for (ticks, rate) in rates {
        #[allow(clippy::cast_precision_loss)]
        let expected = ticks as f64 / 0.1;
        assert_close(rate, expected, 1e-4);
        assert!(rate > 0.0);
    }
}

#[test]
fn test_manual_rate_is_exact() {
    let source = ManualSource::new(Duration::ZERO);
    let mut counter = TickCounter::with_source(source.clone());

    for _ in 0..25 {
        assert!(!counter.update(ms(500)));
        source.advance(ms(10)).unwrap();
    }
    source.advance(ms(250)).unwrap();
    assert!(counter.update(ms(500)));

    assert_close(counter.tick_rate(), 50.0, 1e-6);
    assert_eq!(counter.tick_count(), 1);
    assert_eq!(counter.clock().elapsed(), Duration::ZERO);
}
