//! Rebuild registry state from a data directory
//!
//! 1. Load `registry.snap`, decode it, and cross-check its indices
//! 2. Read `registry.wal` and replay every record newer than the snapshot
//!
//! A partial record at the end of the log is the normal result of a crash
//! mid-append; it is reported so the caller can cut it off. A checksum
//! failure anywhere else means the log cannot be trusted and recovery fails.

use crate::mutation::Mutation;
use crate::state::RegistryState;
use keyreg_core::{RegistryError, RegistryResult, Timestamp};
use keyreg_durability::{load_snapshot, ReadStopReason, WalReader};
use std::path::Path;
use tracing::{debug, warn};

/// Outcome of a successful recovery
#[derive(Debug)]
pub(crate) struct Recovered {
    /// Rebuilt state
    pub state: RegistryState,
    /// Sequence folded into the snapshot
    pub snapshot_sequence: u64,
    /// Log records applied on top of the snapshot
    pub replayed: usize,
    /// Byte offset where the valid log ends, if a torn tail must be cut
    pub torn_tail_at: Option<u64>,
}

/// Recover the registry stored in `dir`.
///
/// Returns `Ok(None)` for a directory that holds no registry yet.
pub(crate) fn recover(dir: &Path) -> RegistryResult<Option<Recovered>> {
    let snapshot = load_snapshot(dir)?;
    let log = WalReader::read_all(dir)?;

    let torn_tail_at = match &log.stop_reason {
        ReadStopReason::EndOfData => None,
        ReadStopReason::PartialRecord => {
            warn!(
                target: "keyreg::engine",
                valid_end = log.valid_end,
                "Torn record at end of WAL; discarding it"
            );
            Some(log.valid_end)
        }
        ReadStopReason::ChecksumMismatch { offset } => {
            return Err(RegistryError::corruption(format!(
                "WAL checksum mismatch at offset {}",
                offset
            )));
        }
        ReadStopReason::ParseError { offset, detail } => {
            return Err(RegistryError::corruption(format!(
                "WAL record at offset {} could not be parsed: {}",
                offset, detail
            )));
        }
    };

    let Some(snapshot) = snapshot else {
        if log.records.is_empty() {
            return Ok(None);
        }
        return Err(RegistryError::corruption(
            "WAL has records but the snapshot is missing",
        ));
    };

    let mut state = RegistryState::from_bytes(&snapshot.payload)
        .map_err(|e| RegistryError::corruption(format!("snapshot payload: {}", e)))?;
    state
        .check_invariants()
        .map_err(|e| RegistryError::corruption(format!("snapshot state: {}", e)))?;
    if state.last_sequence() != snapshot.last_sequence {
        return Err(RegistryError::corruption(format!(
            "snapshot header says sequence {} but state is at {}",
            snapshot.last_sequence,
            state.last_sequence()
        )));
    }

    let mut replayed = 0;
    for record in &log.records {
        if record.sequence <= snapshot.last_sequence {
            continue;
        }
        let mutation = Mutation::decode(&record.payload).map_err(|e| {
            RegistryError::corruption(format!("WAL record {}: {}", record.sequence, e))
        })?;
        state
            .apply(record.sequence, Timestamp::new(record.timestamp), &mutation)
            .map_err(|e| {
                RegistryError::corruption(format!("WAL record {}: {}", record.sequence, e))
            })?;
        replayed += 1;
    }

    debug!(
        target: "keyreg::engine",
        snapshot_sequence = snapshot.last_sequence,
        replayed,
        "Replayed WAL"
    );

    Ok(Some(Recovered {
        state,
        snapshot_sequence: snapshot.last_sequence,
        replayed,
        torn_tail_at,
    }))
}
