//! Failures reported by the positioning capability.

use std::fmt;

use thiserror::Error;

/// Message reported when the platform has no positioning capability.
const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported on this platform";

/// Message reported when a one-shot fix does not arrive in time.
const TIMEOUT_MESSAGE: &str = "Timeout expired";

/// Classification of a [`PositionError`].
///
/// The numeric codes follow the vocabulary used by platform geolocation
/// services. Codes outside the known set are preserved in
/// [`PositionErrorCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionErrorCode {
    /// The platform offers no positioning capability at all.
    Unsupported,
    /// The user or platform refused access to the position.
    PermissionDenied,
    /// No position could be determined.
    PositionUnavailable,
    /// The fix did not arrive before the deadline.
    Timeout,
    /// A code this crate does not recognise.
    Other(u16),
}

impl PositionErrorCode {
    /// Map a native numeric code onto the taxonomy.
    ///
    /// # Examples
    ///
    /// ```
    /// use live_locations_core::PositionErrorCode;
    ///
    /// assert_eq!(PositionErrorCode::from_code(1), PositionErrorCode::PermissionDenied);
    /// assert_eq!(PositionErrorCode::from_code(17), PositionErrorCode::Other(17));
    /// assert_eq!(PositionErrorCode::from_code(17).code(), 17);
    /// ```
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Unsupported,
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            other => Self::Other(other),
        }
    }

    /// Numeric code of this classification.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Unsupported => 0,
            Self::PermissionDenied => 1,
            Self::PositionUnavailable => 2,
            Self::Timeout => 3,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for PositionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => f.write_str("unsupported"),
            Self::PermissionDenied => f.write_str("permission denied"),
            Self::PositionUnavailable => f.write_str("position unavailable"),
            Self::Timeout => f.write_str("timeout"),
            Self::Other(code) => write!(f, "error {code}"),
        }
    }
}

/// A failure of the positioning capability.
///
/// Never carries a reading. Platform errors keep their original message so
/// callers can surface it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {})", code.code())]
pub struct PositionError {
    /// Classification of the failure.
    pub code: PositionErrorCode,
    /// Human-readable description.
    pub message: String,
}

impl PositionError {
    /// Construct an error with an explicit classification.
    pub fn new(code: PositionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Normalise a platform error given as a raw code and message.
    pub fn from_native(code: u16, message: impl Into<String>) -> Self {
        Self::new(PositionErrorCode::from_code(code), message)
    }

    /// The capability-missing error (code 0).
    #[must_use]
    pub fn unsupported() -> Self {
        Self::new(PositionErrorCode::Unsupported, UNSUPPORTED_MESSAGE)
    }

    /// The deadline-exceeded error (code 3).
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(PositionErrorCode::Timeout, TIMEOUT_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, PositionErrorCode::Unsupported)]
    #[case(1, PositionErrorCode::PermissionDenied)]
    #[case(2, PositionErrorCode::PositionUnavailable)]
    #[case(3, PositionErrorCode::Timeout)]
    #[case(99, PositionErrorCode::Other(99))]
    fn native_codes_map_onto_taxonomy(#[case] raw: u16, #[case] expected: PositionErrorCode) {
        let err = PositionError::from_native(raw, "boom");
        assert_eq!(err.code, expected);
        assert_eq!(err.code.code(), raw);
        assert_eq!(err.message, "boom");
    }

    #[rstest]
    fn unsupported_uses_code_zero() {
        let err = PositionError::unsupported();
        assert_eq!(err.code.code(), 0);
        assert!(err.message.contains("not supported"));
    }

    #[rstest]
    fn display_includes_code() {
        let err = PositionError::from_native(1, "User denied Geolocation");
        assert_eq!(err.to_string(), "User denied Geolocation (code 1)");
    }
}
