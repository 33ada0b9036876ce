//! Sources for the "current marker" stamped on entries
//!
//! The registry never takes markers from callers. Each commit asks the
//! configured [`Clock`] for the current marker and clamps it so it is never
//! below the last committed one.

use keyreg_core::{RegistryError, RegistryResult, Timestamp};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Supplier of the current sequence/time marker
pub trait Clock: Send + Sync + fmt::Debug {
    /// Marker for a commit happening now
    fn now(&self) -> Timestamp;
}

/// Counter that advances by one per commit
///
/// This is the default: markers are dense, deterministic, and independent
/// of the wall clock.
#[derive(Debug, Default)]
pub struct LogicalClock {
    last: AtomicU64,
}

impl LogicalClock {
    /// Clock whose first marker is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock whose first marker follows `after` (used after recovery)
    pub fn starting_after(after: Timestamp) -> Self {
        LogicalClock {
            last: AtomicU64::new(after.as_u64()),
        }
    }
}

impl Clock for LogicalClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.last.fetch_add(1, Ordering::SeqCst).saturating_add(1))
    }
}

/// Wall-clock microseconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::wall_clock()
    }
}

/// Marker driven entirely by the host, e.g. a block height.
///
/// Share it as `Arc<ManualClock>` and hand a clone to the registry.
#[derive(Debug, Default)]
pub struct ManualClock {
    current: AtomicU64,
}

impl ManualClock {
    /// Clock reading `start`
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            current: AtomicU64::new(start.as_u64()),
        }
    }

    /// Set the current marker
    pub fn set(&self, at: Timestamp) {
        self.current.store(at.as_u64(), Ordering::SeqCst);
    }

    /// Move the marker forward by `by` and return the new reading
    pub fn advance(&self, by: u64) -> Timestamp {
        let prev = self.current.fetch_add(by, Ordering::SeqCst);
        Timestamp::new(prev.saturating_add(by))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }
}

/// Clock selection from `keyreg.toml`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockKind {
    /// [`LogicalClock`]
    #[default]
    Logical,
    /// [`SystemClock`]
    System,
}

impl ClockKind {
    /// Parse the config string
    pub fn parse(s: &str) -> RegistryResult<Self> {
        match s {
            "logical" => Ok(ClockKind::Logical),
            "system" => Ok(ClockKind::System),
            other => Err(RegistryError::config(format!(
                "invalid clock '{}'. Expected \"logical\" or \"system\"",
                other
            ))),
        }
    }

    /// Config string for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockKind::Logical => "logical",
            ClockKind::System => "system",
        }
    }
}
