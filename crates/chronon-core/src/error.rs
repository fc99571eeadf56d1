use thiserror::Error;

/// Errors raised by duration arithmetic, unit scaling, and timebase setup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The result would not fit the representable range.
    #[error("overflow in {operation}")]
    Overflow {
        /// Name of the operation that overflowed.
        operation: &'static str,
    },

    /// A duration was divided by zero.
    #[error("cannot divide a duration by zero")]
    DivideByZero,

    /// An OS timer or affinity call failed.
    #[error("platform error: {0}")]
    Platform(String),
}

impl TimeError {
    /// Shorthand for an [`TimeError::Overflow`] in `operation`.
    #[must_use]
    pub const fn overflow(operation: &'static str) -> Self {
        Self::Overflow { operation }
    }

    /// Whether this is an overflow condition.
    #[must_use]
    pub const fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}

/// Convenience type alias for fallible time operations.
pub type TimeResult<T> = Result<T, TimeError>;
