//! WAL writer with durability mode support.
//!
//! The writer appends framed records to `registry.wal` and syncs according to
//! the configured mode. A failed append (write or sync) rolls the file back to
//! its previous length, so a rejected record is never replayed and the next
//! record can reuse its sequence number.

use super::DurabilityMode;
use crate::format::{WalHeader, WalRecord, WAL_HEADER_SIZE};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// WAL file name inside the data directory
pub const WAL_FILE_NAME: &str = "registry.wal";

/// Path of the WAL file for a data directory
pub fn wal_path(dir: &Path) -> PathBuf {
    dir.join(WAL_FILE_NAME)
}

/// Cumulative WAL operation counters.
///
/// These counters accumulate over the lifetime of the WalWriter
/// and are never reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalCounters {
    /// Total WAL record appends
    pub wal_appends: u64,
    /// Total sync/fsync calls
    pub sync_calls: u64,
    /// Total bytes written to the log
    pub bytes_written: u64,
}

/// WAL writer with configurable durability modes.
pub struct WalWriter {
    /// Open log file (None when DurabilityMode::Cache)
    file: Option<File>,

    durability: DurabilityMode,

    path: PathBuf,

    /// Length of the valid log, in bytes
    write_position: u64,

    /// Writes since last fsync (for Standard mode)
    writes_since_sync: usize,

    /// Last fsync time (for Standard mode)
    last_sync_time: Instant,

    counters: WalCounters,

    /// Make the next sync fail (tests only)
    #[cfg(test)]
    fail_next_sync: bool,
}

impl WalWriter {
    /// Open the log in `dir` for appending, creating it if missing.
    ///
    /// An existing file must carry a valid header. Records are not validated
    /// here; recovery reads them with `WalReader` and calls `truncate_to` if
    /// the tail is torn.
    pub fn open(dir: &Path, durability: DurabilityMode) -> std::io::Result<Self> {
        let path = wal_path(dir);

        if !durability.requires_wal() {
            return Ok(WalWriter {
                file: None,
                durability,
                path,
                write_position: 0,
                writes_since_sync: 0,
                last_sync_time: Instant::now(),
                counters: WalCounters::default(),
                #[cfg(test)]
                fail_next_sync: false,
            });
        }

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(&WalHeader::current().to_bytes())?;
            file.sync_all()?;
        } else {
            let mut header_bytes = [0u8; WAL_HEADER_SIZE];
            file.read_exact(&mut header_bytes)?;
            if !WalHeader::from_bytes(&header_bytes).is_valid() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "Invalid WAL header",
                ));
            }
        }

        let write_position = file.seek(SeekFrom::End(0))?;

        Ok(WalWriter {
            file: Some(file),
            durability,
            path,
            write_position,
            writes_since_sync: 0,
            last_sync_time: Instant::now(),
            counters: WalCounters::default(),
            #[cfg(test)]
            fail_next_sync: false,
        })
    }

    /// Append a record, syncing according to the durability mode.
    ///
    /// On error, including a failed sync after a successful write, the log
    /// is restored to its previous length and the counters are unchanged.
    pub fn append(&mut self, record: &WalRecord) -> std::io::Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };

        let start = self.write_position;
        let bytes = record.to_bytes();
        let len = bytes.len() as u64;
        if let Err(e) = file.write_all(&bytes) {
            self.rollback(start, record.sequence);
            return Err(e);
        }

        self.write_position += len;
        self.writes_since_sync += 1;
        self.counters.wal_appends += 1;
        self.counters.bytes_written += len;

        if let Err(e) = self.maybe_sync() {
            self.writes_since_sync -= 1;
            self.counters.wal_appends -= 1;
            self.counters.bytes_written -= len;
            self.rollback(start, record.sequence);
            return Err(e);
        }
        Ok(())
    }

    /// Cut the log back to `position` after a failed append.
    fn rollback(&mut self, position: u64, sequence: u64) {
        if let Some(file) = self.file.as_mut() {
            let restored = file
                .set_len(position)
                .and_then(|_| file.seek(SeekFrom::Start(position)).map(|_| ()));
            if let Err(e) = restored {
                warn!(
                    target: "keyreg::durability",
                    sequence,
                    position,
                    error = %e,
                    "Failed to roll back WAL after append error"
                );
            } else {
                debug!(target: "keyreg::durability", sequence, position, "Rolled back WAL append");
            }
        }
        self.write_position = position;
    }

    /// Handle fsync based on durability mode.
    fn maybe_sync(&mut self) -> std::io::Result<()> {
        let due = match self.durability {
            DurabilityMode::Always => true,
            DurabilityMode::Standard {
                interval_ms,
                batch_size,
            } => {
                self.writes_since_sync >= batch_size
                    || self.last_sync_time.elapsed().as_millis() as u64 >= interval_ms
            }
            DurabilityMode::Cache => false,
        };
        if due {
            self.sync()?;
        }
        Ok(())
    }

    /// Force pending writes to disk.
    pub fn sync(&mut self) -> std::io::Result<()> {
        #[cfg(test)]
        if std::mem::take(&mut self.fail_next_sync) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "simulated sync failure",
            ));
        }
        if let Some(file) = self.file.as_mut() {
            if self.writes_since_sync > 0 {
                file.sync_data()?;
                self.counters.sync_calls += 1;
            }
        }
        self.writes_since_sync = 0;
        self.last_sync_time = Instant::now();
        Ok(())
    }

    /// Sync if records are pending and the Standard interval has elapsed.
    ///
    /// Called periodically by the background flush thread so a quiet
    /// registry does not leave its last records unsynced.
    pub fn sync_if_overdue(&mut self) -> std::io::Result<bool> {
        let DurabilityMode::Standard { interval_ms, .. } = self.durability else {
            return Ok(false);
        };
        if self.writes_since_sync == 0
            || (self.last_sync_time.elapsed().as_millis() as u64) < interval_ms
        {
            return Ok(false);
        }
        self.sync()?;
        Ok(true)
    }

    /// Number of appends since the last sync
    pub fn pending_writes(&self) -> usize {
        self.writes_since_sync
    }

    /// Cut the log back to `position` (used to drop a torn tail).
    pub fn truncate_to(&mut self, position: u64) -> std::io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            let position = position.max(WAL_HEADER_SIZE as u64);
            file.set_len(position)?;
            file.seek(SeekFrom::Start(position))?;
            file.sync_all()?;
            debug!(target: "keyreg::durability", from = self.write_position, to = position, "Truncated WAL");
            self.write_position = position;
        }
        Ok(())
    }

    /// Drop every record, keeping only the header (after a checkpoint).
    pub fn reset(&mut self) -> std::io::Result<()> {
        self.truncate_to(WAL_HEADER_SIZE as u64)?;
        self.writes_since_sync = 0;
        Ok(())
    }

    /// Current log length in bytes
    pub fn size(&self) -> u64 {
        self.write_position
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durability mode in effect
    pub fn durability(&self) -> DurabilityMode {
        self.durability
    }

    /// Cumulative counters
    pub fn counters(&self) -> WalCounters {
        self.counters.clone()
    }
}
