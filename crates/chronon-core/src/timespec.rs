//! OS high-resolution timestamp pair.

use serde::{Deserialize, Serialize};

/// Nanoseconds in one second.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Seconds plus nanoseconds, the shape of a POSIX `struct timespec`.
///
/// Produced by [`Duration::to_os_timespec`](crate::Duration::to_os_timespec),
/// which keeps `nanoseconds` in `0..NANOS_PER_SECOND`. Values read back from
/// the OS are not re-normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timespec {
    /// Whole seconds, floored.
    pub seconds: i64,
    /// Nanosecond remainder.
    pub nanoseconds: i64,
}

impl Timespec {
    /// Whether `nanoseconds` lies in `0..NANOS_PER_SECOND`.
    #[must_use]
    pub const fn is_normalized(&self) -> bool {
        self.nanoseconds >= 0 && self.nanoseconds < NANOS_PER_SECOND
    }
}
