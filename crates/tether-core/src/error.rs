#![forbid(unsafe_code)]

//! Errors reported by the checked `try_*` operations on [`Signal`](crate::Signal).
//!
//! The unchecked operations never fail: connecting a missing slot yields
//! [`SlotKey::NONE`] and disconnecting something unknown does nothing. The
//! checked variants turn those absences into values a caller can assert on.

use crate::key::SlotKey;

/// Result of a checked signal operation.
pub type SignalResult<T> = Result<T, SignalError>;

/// Absence-of-effect conditions surfaced by the checked operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// No slot was supplied to connect.
    NullSlot,
    /// The key is not present in this signal's registry.
    UnknownKey(SlotKey),
    /// The slot is not connected to this signal.
    ForeignSlot,
}

impl std::fmt::Display for SignalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NullSlot => write!(f, "no slot supplied to connect"),
            Self::UnknownKey(key) => write!(f, "no connection with key {}", key),
            Self::ForeignSlot => write!(f, "slot is not connected to this signal"),
        }
    }
}

impl std::error::Error for SignalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(SignalError::NullSlot.to_string(), "no slot supplied to connect");
        assert_eq!(
            SignalError::UnknownKey(SlotKey::new(3)).to_string(),
            "no connection with key #3"
        );
        assert_eq!(
            SignalError::UnknownKey(SlotKey::NONE).to_string(),
            "no connection with key none"
        );
        assert_eq!(
            SignalError::ForeignSlot.to_string(),
            "slot is not connected to this signal"
        );
    }

    #[test]
    fn is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(SignalError::ForeignSlot);
        assert!(err.source().is_none());
    }
}
