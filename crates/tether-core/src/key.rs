#![forbid(unsafe_code)]

//! Connection identifiers.

use std::fmt;

/// Opaque identifier for one connection inside one [`Signal`](crate::Signal).
///
/// Keys are issued by a signal's own counter, starting at `1`, strictly
/// increasing in connect order and never reused. A key is only meaningful
/// to the signal that issued it.
///
/// [`SlotKey::NONE`] (raw value `0`) means "no connection" and is never
/// issued by a successful connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SlotKey(u64);

impl SlotKey {
    /// The "no connection" sentinel.
    pub const NONE: Self = Self(0);

    /// Create a key from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw key value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether this is the [`SlotKey::NONE`] sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Whether this key refers to a real connection.
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("none")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

impl From<SlotKey> for u64 {
    fn from(key: SlotKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_zero() {
        assert_eq!(SlotKey::NONE.raw(), 0);
        assert!(SlotKey::NONE.is_none());
        assert!(!SlotKey::NONE.is_some());
        assert_eq!(SlotKey::default(), SlotKey::NONE);
    }

    #[test]
    fn ordering_follows_raw_value() {
        assert!(SlotKey::new(1) < SlotKey::new(2));
        assert!(SlotKey::NONE < SlotKey::new(1));
    }

    #[test]
    fn display() {
        assert_eq!(SlotKey::NONE.to_string(), "none");
        assert_eq!(SlotKey::new(7).to_string(), "#7");
        assert_eq!(u64::from(SlotKey::new(7)), 7);
    }
}
