//! Sequence/time marker attached to every entry
//!
//! A `Timestamp` is whatever monotonic marker the host supplies for "now":
//! a logical call counter, a block height, or wall-clock microseconds.
//! The registry only relies on ordering, never on units.
//!
//! ```
//! use keyreg_core::Timestamp;
//!
//! let created = Timestamp::from(7u64);
//! let updated = created.max(Timestamp::from(9u64));
//! assert!(updated.is_after(created));
//! ```

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonic sequence/time marker
///
/// ## Invariants
///
/// - Markers are totally ordered
/// - The registry never stores a marker lower than one it already committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The zero marker, used before anything has been committed
    pub const ZERO: Timestamp = Timestamp(0);

    /// Largest representable marker
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    /// Create a marker from a raw value
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Timestamp(raw)
    }

    /// Wall-clock microseconds since the Unix epoch
    ///
    /// Returns `ZERO` if the system clock reads before the epoch.
    pub fn wall_clock() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_micros() as u64)
    }

    /// Raw marker value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The marker immediately after this one (saturating)
    #[inline]
    pub const fn successor(&self) -> Self {
        Timestamp(self.0.saturating_add(1))
    }

    /// Check if this marker is before another
    #[inline]
    pub fn is_before(&self, other: Timestamp) -> bool {
        self.0 < other.0
    }

    /// Check if this marker is after another
    #[inline]
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::ZERO
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(raw: u64) -> Self {
        Timestamp(raw)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
