//! Overflow-checked microsecond durations.
//!
//! A [`Duration`] is a signed 64-bit count of microseconds. It is used both
//! for spans ("100ms") and for timer readings, which are spans since an
//! arbitrary, platform-defined epoch.
//!
//! Arithmetic and unit scaling never wrap: anything that would leave the
//! representable range returns [`TimeError::Overflow`], and division by zero
//! returns [`TimeError::DivideByZero`].

use crate::error::{TimeError, TimeResult};
use crate::timespec::Timespec;
use serde::{Deserialize, Serialize};

/// Microseconds in one second.
pub const MICROS_PER_SECOND: i64 = 1_000_000;
/// Microseconds in one millisecond.
pub const MICROS_PER_MILLI: i64 = 1_000;
/// Nanoseconds in one microsecond.
pub const NANOS_PER_MICRO: i64 = 1_000;

/// A span of time with microsecond resolution.
///
/// # Example
///
/// ```
/// use chronon_core::Duration;
///
/// let a = Duration::from_microseconds(5_000_000);
/// let b = Duration::from_microseconds(2_000_000);
/// let diff = a.checked_sub(b).unwrap();
///
/// assert_eq!(diff.as_microseconds_i64(), 3_000_000);
/// assert_eq!(diff.as_seconds_f32(), 3.0);
/// assert!(Duration::MAX.checked_add(Duration::from_microseconds(1)).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Duration {
    microseconds: i64,
}

impl Duration {
    /// The zero-length duration.
    pub const ZERO: Self = Self::from_microseconds(0);
    /// The largest representable duration.
    pub const MAX: Self = Self::from_microseconds(i64::MAX);
    /// The smallest (most negative) representable duration.
    pub const MIN: Self = Self::from_microseconds(i64::MIN);

    /// Whether this duration is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.microseconds == 0
    }

    /// Whether this duration is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.microseconds < 0
    }

    /// Whether this duration is above zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.microseconds > 0
    }

    // ==================== Arithmetic ====================

    /// Computes `self + rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] if the sum leaves the i64 range.
    pub fn checked_add(self, rhs: Self) -> TimeResult<Self> {
        self.microseconds
            .checked_add(rhs.microseconds)
            .map(Self::from_microseconds)
            .ok_or(TimeError::overflow("add"))
    }

    /// Computes `self - rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] if the difference leaves the i64 range.
    pub fn checked_sub(self, rhs: Self) -> TimeResult<Self> {
        self.microseconds
            .checked_sub(rhs.microseconds)
            .map(Self::from_microseconds)
            .ok_or(TimeError::overflow("subtract"))
    }

    /// Computes `self - rhs`, clamping at [`Duration::MIN`] / [`Duration::MAX`].
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self::from_microseconds(self.microseconds.saturating_sub(rhs.microseconds))
    }

    /// Computes `self * scalar`.
    ///
    /// Fails when `|self| >= i64::MAX / |scalar|`, which also rejects a few
    /// products at the very edge of the range. A zero scalar always yields
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] when the bound above is hit.
    pub fn checked_mul(self, scalar: i64) -> TimeResult<Self> {
        check_scale_bound(self.microseconds, scalar, "multiply")?;
        Ok(Self::from_microseconds(self.microseconds * scalar))
    }

    /// Computes `self / scalar`, truncating toward zero.
    ///
    /// The overflow guard is the same bound [`Duration::checked_mul`] uses,
    /// so `Duration::MAX / 1` is rejected even though it is representable.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::DivideByZero`] if `scalar` is zero and
    /// [`TimeError::Overflow`] when the multiply bound is hit.
    pub fn checked_div(self, scalar: i64) -> TimeResult<Self> {
        if scalar == 0 {
            return Err(TimeError::DivideByZero);
        }
        check_scale_bound(self.microseconds, scalar, "divide")?;
        Ok(Self::from_microseconds(self.microseconds / scalar))
    }

    // ==================== Conversions out ====================

    /// Seconds as `f32`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_seconds_f32(self) -> f32 {
        if self.microseconds == 0 {
            return 0.0;
        }
        self.microseconds as f32 / MICROS_PER_SECOND as f32
    }

    /// Seconds as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_seconds_f64(self) -> f64 {
        if self.microseconds == 0 {
            return 0.0;
        }
        self.microseconds as f64 / MICROS_PER_SECOND as f64
    }

    /// Whole seconds, rounded toward negative infinity.
    ///
    /// `-0.5s` gives `-1`, not `0`.
    #[must_use]
    pub const fn as_lower_seconds_i64(self) -> i64 {
        self.microseconds.div_euclid(MICROS_PER_SECOND)
    }

    /// Whole milliseconds, truncated toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] if the value does not fit an `i32`.
    pub fn as_milliseconds_i32(self) -> TimeResult<i32> {
        if self.microseconds == 0 {
            return Ok(0);
        }
        i32::try_from(self.microseconds / MICROS_PER_MILLI)
            .map_err(|_| TimeError::overflow("as_milliseconds_i32"))
    }

    /// Raw microsecond count.
    #[must_use]
    pub const fn as_microseconds_i64(self) -> i64 {
        self.microseconds
    }

    /// Nanoseconds.
    ///
    /// Overflows for spans beyond roughly 292 years; prefer
    /// [`Duration::to_os_timespec`] for timer readings.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] if the scaled value leaves the i64 range.
    pub fn as_nanoseconds_i64(self) -> TimeResult<i64> {
        self.microseconds
            .checked_mul(NANOS_PER_MICRO)
            .ok_or(TimeError::overflow("as_nanoseconds_i64"))
    }

    /// Converts to a standard library duration.
    ///
    /// Returns `None` for zero and negative spans, which have no
    /// `std::time::Duration` equivalent worth sleeping on.
    #[must_use]
    pub fn to_std(self) -> Option<std::time::Duration> {
        u64::try_from(self.microseconds)
            .ok()
            .filter(|&micros| micros > 0)
            .map(std::time::Duration::from_micros)
    }

    // ==================== Conversions in ====================

    /// Builds a duration from seconds given as `f32`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] for non-finite input or a value
    /// outside the microsecond range.
    pub fn from_seconds_f32(seconds: f32) -> TimeResult<Self> {
        from_float_seconds(f64::from(seconds), "from_seconds_f32")
    }

    /// Builds a duration from seconds given as `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] for non-finite input or a value
    /// outside the microsecond range.
    pub fn from_seconds_f64(seconds: f64) -> TimeResult<Self> {
        from_float_seconds(seconds, "from_seconds_f64")
    }

    /// Builds a duration from whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] if the microsecond count leaves the
    /// i64 range.
    pub fn from_lower_seconds_i64(seconds: i64) -> TimeResult<Self> {
        seconds
            .checked_mul(MICROS_PER_SECOND)
            .map(Self::from_microseconds)
            .ok_or(TimeError::overflow("from_lower_seconds_i64"))
    }

    /// Builds a duration from milliseconds. Every `i32` fits.
    #[must_use]
    pub const fn from_milliseconds_i32(milliseconds: i32) -> Self {
        Self::from_microseconds(milliseconds as i64 * MICROS_PER_MILLI)
    }

    /// Builds a duration from a raw microsecond count.
    #[must_use]
    pub const fn from_microseconds(microseconds: i64) -> Self {
        Self { microseconds }
    }

    /// Builds a duration from nanoseconds, truncating the sub-microsecond part.
    #[must_use]
    pub const fn from_nanoseconds_i64(nanoseconds: i64) -> Self {
        if nanoseconds == 0 {
            return Self::ZERO;
        }
        Self::from_microseconds(nanoseconds / NANOS_PER_MICRO)
    }

    // ==================== OS timestamps ====================

    /// Splits into whole seconds (floored) and the nanosecond remainder.
    ///
    /// The remainder is always in `0..1_000_000_000`, so negative durations
    /// borrow from the seconds field: `-1.5s` becomes `{ -2, 500_000_000 }`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] near [`Duration::MIN`], where the
    /// floored seconds no longer fit in microseconds.
    pub fn to_os_timespec(self) -> TimeResult<Timespec> {
        let seconds = self.as_lower_seconds_i64();
        let whole = Self::from_lower_seconds_i64(seconds)?;
        let nanoseconds = self.checked_sub(whole)?.as_nanoseconds_i64()?;
        Ok(Timespec {
            seconds,
            nanoseconds,
        })
    }

    /// Rebuilds a duration from an OS timestamp.
    ///
    /// Sub-microsecond nanoseconds are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Overflow`] if the seconds field does not fit.
    pub fn from_os_timespec(timespec: Timespec) -> TimeResult<Self> {
        Self::from_lower_seconds_i64(timespec.seconds)?
            .checked_add(Self::from_nanoseconds_i64(timespec.nanoseconds))
    }
}

impl TryFrom<std::time::Duration> for Duration {
    type Error = TimeError;

    fn try_from(value: std::time::Duration) -> TimeResult<Self> {
        i64::try_from(value.as_micros())
            .map(Self::from_microseconds)
            .map_err(|_| TimeError::overflow("from_std"))
    }
}

/// Rejects `value * scalar` (and `value / scalar`) when
/// `|value| >= i64::MAX / |scalar|`.
fn check_scale_bound(value: i64, scalar: i64, operation: &'static str) -> TimeResult<()> {
    if scalar == 0 || value == 0 {
        return Ok(());
    }
    let bound = i64::MAX.unsigned_abs() / scalar.unsigned_abs();
    if value.unsigned_abs() >= bound {
        return Err(TimeError::overflow(operation));
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn from_float_seconds(seconds: f64, operation: &'static str) -> TimeResult<Duration> {
    let micros = seconds * MICROS_PER_SECOND as f64;
    // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive.
    if !micros.is_finite() || micros >= i64::MAX as f64 || micros < i64::MIN as f64 {
        return Err(TimeError::overflow(operation));
    }
    Ok(Duration::from_microseconds(micros as i64))
}
