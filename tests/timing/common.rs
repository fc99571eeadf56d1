//! Common utilities for timing tests.

#![allow(dead_code)] // Not every helper is used by every test module

use chronon_core::Duration;

/// Shorthand for a duration in microseconds.
pub fn us(microseconds: i64) -> Duration {
    Duration::from_microseconds(microseconds)
}

/// Shorthand for a duration in milliseconds.
pub fn ms(milliseconds: i32) -> Duration {
    Duration::from_milliseconds_i32(milliseconds)
}

/// Assert two floats agree within a relative tolerance.
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= expected.abs() * tolerance,
        "expected {expected} (±{:.0}%), got {actual}",
        tolerance * 100.0
    );
}
