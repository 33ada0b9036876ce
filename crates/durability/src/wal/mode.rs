//! Durability mode configuration
//!
//! Controls WAL sync behavior (Cache, Standard, Always).

/// Durability mode for WAL operations
///
/// | Mode | fsync | Data Loss Window |
/// |------|-------|-----------------|
/// | Cache | Never | Everything since open |
/// | Always | Every commit | Zero |
/// | Standard | Every N commits or T ms | Up to batch/interval |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityMode {
    /// No log at all; state lives only in memory
    Cache,

    /// fsync after every committed mutation
    Always,

    /// fsync after `batch_size` records or once `interval_ms` has elapsed
    /// since the last sync, whichever comes first
    Standard {
        /// Maximum time between fsyncs in milliseconds
        interval_ms: u64,
        /// Maximum writes between fsyncs
        batch_size: usize,
    },
}

impl DurabilityMode {
    /// Check if this mode writes a log
    pub fn requires_wal(&self) -> bool {
        !matches!(self, DurabilityMode::Cache)
    }

    /// Check if this mode fsyncs every commit
    pub fn requires_immediate_fsync(&self) -> bool {
        matches!(self, DurabilityMode::Always)
    }

    /// Human-readable description of the mode
    pub fn description(&self) -> &'static str {
        match self {
            DurabilityMode::Cache => "Cache (no log, state lost on exit)",
            DurabilityMode::Always => "Always sync (safest, slowest)",
            DurabilityMode::Standard { .. } => "Standard (batched sync)",
        }
    }

    /// Standard mode with recommended defaults: 100ms or 64 records
    pub fn standard_default() -> Self {
        DurabilityMode::Standard {
            interval_ms: 100,
            batch_size: 64,
        }
    }
}

impl Default for DurabilityMode {
    fn default() -> Self {
        Self::standard_default()
    }
}
