//! Per-entry version counter
//!
//! Every entry starts at version 1 and each successful value update bumps the
//! counter by exactly one. Transfers and freezes leave it untouched.

use serde::{Deserialize, Serialize};

/// Monotonic per-entry mutation counter
///
/// ## Invariants
///
/// - A stored version is always `>= 1`
/// - `next()` is strictly greater than `self` until `u64::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Version assigned on creation
    pub const INITIAL: Version = Version(1);

    /// Wrap a raw counter value
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Version(raw)
    }

    /// Raw counter value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The version produced by one more update
    #[inline]
    pub const fn next(&self) -> Self {
        Version(self.0.saturating_add(1))
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::INITIAL
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<Version> for u64 {
    fn from(v: Version) -> Self {
        v.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_version_is_one() {
        assert_eq!(Version::INITIAL.as_u64(), 1);
        assert_eq!(Version::default(), Version::INITIAL);
    }

    #[test]
    fn test_next_increments_by_one() {
        let v = Version::INITIAL.next().next();
        assert_eq!(v.as_u64(), 3);
        assert!(v > Version::INITIAL);
    }

    #[test]
    fn test_next_saturates() {
        let top = Version::new(u64::MAX);
        assert_eq!(top.next(), top);
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(7).to_string(), "v7");
    }
}
