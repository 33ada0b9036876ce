//! Registry: the single serialization point over registry state
//!
//! A `Registry` owns one [`RegistryState`] behind a `parking_lot::Mutex`.
//! Every call takes the lock, validates against the current state, and
//! either rejects with no effect or commits exactly one [`Mutation`]:
//!
//! 1. Validate (pure reads; any failure returns before anything is written)
//! 2. Append the mutation to the WAL (disk-backed registries only)
//! 3. Apply it to memory
//!
//! If step 2 fails the call fails with `Storage` and memory is untouched.
//!
//! # Example
//!
//! ```
//! use keyreg_engine::Registry;
//! use keyreg_core::Identity;
//!
//! let admin = Identity::from("wallet_1");
//! let registry = Registry::ephemeral(admin.clone());
//! registry.create_entry(&admin, "hotline:region1", "tel:123").unwrap();
//! assert_eq!(registry.get_key_count(&admin), 1);
//! ```

pub mod config;
mod operations;
mod recovery;

use crate::clock::{Clock, ClockKind, LogicalClock, SystemClock};
use crate::mutation::Mutation;
use crate::state::RegistryState;
use config::{RegistryConfig, CONFIG_FILE_NAME};
use keyreg_core::{Identity, Limits, RegistryError, RegistryResult, Timestamp};
use keyreg_durability::{DurabilityMode, SnapshotWriter, WalCounters, WalRecord, WalWriter};
use parking_lot::Mutex;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info};

/// Name of the lock file held while a data directory is open
pub const LOCK_FILE_NAME: &str = ".lock";

/// Everything guarded by the registry lock
struct Inner {
    state: RegistryState,
    wal: Option<WalWriter>,
    snapshots: Option<SnapshotWriter>,
}

/// Access-controlled, versioned key registry
///
/// Create one with [`Registry::ephemeral`] for an in-memory registry, or
/// [`Registry::open`] / [`Registry::open_with_config`] for a disk-backed
/// one. All methods take `&self`; share the registry as `Arc<Registry>`.
pub struct Registry {
    inner: Arc<Mutex<Inner>>,

    limits: Limits,

    clock: Arc<dyn Clock>,

    durability: DurabilityMode,

    /// None for ephemeral registries
    data_dir: Option<PathBuf>,

    /// Shutdown signal for the background WAL flush thread (Standard mode only)
    flush_shutdown: Arc<AtomicBool>,

    flush_handle: Mutex<Option<JoinHandle<()>>>,

    /// Exclusive lock on the data directory, released on drop.
    _lock_file: Option<File>,
}

impl Registry {
    // ========================================================================
    // Construction
    // ========================================================================

    /// In-memory registry with default limits and a logical clock
    pub fn ephemeral(admin: impl Into<Identity>) -> Arc<Self> {
        Self::ephemeral_with(admin, Limits::default(), Arc::new(LogicalClock::new()))
    }

    /// In-memory registry with explicit limits and clock
    pub fn ephemeral_with(
        admin: impl Into<Identity>,
        limits: Limits,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Arc::new(Registry {
            inner: Arc::new(Mutex::new(Inner {
                state: RegistryState::new(admin.into()),
                wal: None,
                snapshots: None,
            })),
            limits,
            clock,
            durability: DurabilityMode::Cache,
            data_dir: None,
            flush_shutdown: Arc::new(AtomicBool::new(false)),
            flush_handle: Mutex::new(None),
            _lock_file: None,
        })
    }

    /// In-memory registry taking admin, limits, and clock from a config.
    ///
    /// The durability setting is ignored; nothing touches disk.
    pub fn with_config(cfg: &RegistryConfig) -> RegistryResult<Arc<Self>> {
        cfg.validate()?;
        let clock: Arc<dyn Clock> = match cfg.clock_kind()? {
            ClockKind::Logical => Arc::new(LogicalClock::new()),
            ClockKind::System => Arc::new(SystemClock),
        };
        Ok(Self::ephemeral_with(cfg.admin_identity()?, cfg.limits()?, clock))
    }

    /// Open an existing registry at `path`, reading `keyreg.toml`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the directory has no `keyreg.toml`; a new registry
    /// needs an admin, so create it with [`Registry::open_with_config`].
    pub fn open<P: AsRef<Path>>(path: P) -> RegistryResult<Arc<Self>> {
        let config_path = path.as_ref().join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(RegistryError::config(format!(
                "no {} in '{}'; create the registry with an admin first",
                CONFIG_FILE_NAME,
                path.as_ref().display()
            )));
        }
        let cfg = RegistryConfig::from_file(&config_path)?;
        Self::open_inner(path.as_ref(), cfg, None)
    }

    /// Open or create a registry at `path` with an explicit configuration.
    ///
    /// `cfg` governs this open. It is written to `keyreg.toml` only if the
    /// directory has none yet, so later [`Registry::open`] calls pick up the
    /// same settings and hand edits to an existing file are kept.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        cfg: RegistryConfig,
    ) -> RegistryResult<Arc<Self>> {
        Self::open_inner(path.as_ref(), cfg, None)
    }

    /// Like [`Registry::open_with_config`], with a host-supplied clock
    /// (e.g. a [`ManualClock`](crate::ManualClock) tracking block height).
    pub fn open_with_clock<P: AsRef<Path>>(
        path: P,
        cfg: RegistryConfig,
        clock: Arc<dyn Clock>,
    ) -> RegistryResult<Arc<Self>> {
        Self::open_inner(path.as_ref(), cfg, Some(clock))
    }

    fn open_inner(
        path: &Path,
        cfg: RegistryConfig,
        clock: Option<Arc<dyn Clock>>,
    ) -> RegistryResult<Arc<Self>> {
        cfg.validate()?;
        let durability = cfg.durability_mode()?;
        let limits = cfg.limits()?;
        let configured_admin = cfg.admin_identity()?;

        std::fs::create_dir_all(path)?;
        let data_dir = path.canonicalize()?;

        let lock_file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(data_dir.join(LOCK_FILE_NAME))
            .map_err(|e| RegistryError::storage(format!("failed to open lock file: {}", e)))?;
        fs2::FileExt::try_lock_exclusive(&lock_file).map_err(|_| {
            RegistryError::storage(format!(
                "registry at '{}' is already in use by another process",
                data_dir.display()
            ))
        })?;

        let recovered = recovery::recover(&data_dir)?;
        let snapshots = SnapshotWriter::new(&data_dir);
        let mut wal = WalWriter::open(&data_dir, durability)?;

        let (state, fresh) = match recovered {
            Some(recovered) => {
                if recovered.state.admin() != &configured_admin {
                    return Err(RegistryError::config(format!(
                        "{} names admin '{}' but the registry was created with admin '{}'",
                        CONFIG_FILE_NAME,
                        configured_admin,
                        recovered.state.admin()
                    )));
                }
                if let Some(valid_end) = recovered.torn_tail_at {
                    wal.truncate_to(valid_end)?;
                }
                info!(
                    target: "keyreg::engine",
                    path = ?data_dir,
                    snapshot_sequence = recovered.snapshot_sequence,
                    replayed = recovered.replayed,
                    entries = recovered.state.entry_count(),
                    "Recovery complete"
                );
                (recovered.state, false)
            }
            None => {
                let state = RegistryState::new(configured_admin);
                let payload = encode_state(&state)?;
                snapshots.write(state.last_sequence(), &payload)?;
                wal.reset()?;
                info!(target: "keyreg::engine", path = ?data_dir, admin = %state.admin(), "Created registry");
                (state, true)
            }
        };

        let config_path = data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            cfg.write_to_file(&config_path)?;
        }

        let clock: Arc<dyn Clock> = match clock {
            Some(clock) => clock,
            None => match cfg.clock_kind()? {
                ClockKind::Logical => Arc::new(LogicalClock::starting_after(state.last_timestamp())),
                ClockKind::System => Arc::new(SystemClock),
            },
        };

        let needs_checkpoint = !fresh && !durability.requires_wal();
        let inner = Arc::new(Mutex::new(Inner {
            state,
            wal: Some(wal),
            snapshots: Some(snapshots),
        }));

        let flush_shutdown = Arc::new(AtomicBool::new(false));
        let flush_handle = match durability {
            DurabilityMode::Standard { interval_ms, .. } => Some(spawn_flush_thread(
                Arc::clone(&inner),
                Arc::clone(&flush_shutdown),
                interval_ms,
            )?),
            _ => None,
        };

        let registry = Arc::new(Registry {
            inner,
            limits,
            clock,
            durability,
            data_dir: Some(data_dir),
            flush_shutdown,
            flush_handle: Mutex::new(flush_handle),
            _lock_file: Some(lock_file),
        });

        // Without a log, anything replayed from an older log must be folded
        // into the snapshot before new commits go unlogged.
        if needs_checkpoint {
            registry.checkpoint()?;
        }
        Ok(registry)
    }

    // ========================================================================
    // Commit path
    // ========================================================================

    /// Log and apply one validated mutation. Caller holds the lock.
    fn commit(&self, inner: &mut Inner, caller: &Identity, mutation: Mutation) -> RegistryResult<()> {
        let at = self.clock.now().max(inner.state.last_timestamp());
        let sequence = inner.state.last_sequence() + 1;

        if let Some(wal) = inner.wal.as_mut() {
            let payload = mutation
                .encode()
                .map_err(|e| RegistryError::storage(format!("failed to encode mutation: {}", e)))?;
            wal.append(&WalRecord::new(sequence, at.as_u64(), payload))
                .map_err(|e| RegistryError::storage(format!("WAL append failed: {}", e)))?;
        }

        inner
            .state
            .apply(sequence, at, &mutation)
            .map_err(|e| RegistryError::corruption(e.to_string()))?;

        debug!(
            target: "keyreg::engine",
            mutation = mutation.name(),
            key = mutation.key().unwrap_or(""),
            caller = %caller,
            sequence,
            at = at.as_u64(),
            "Committed"
        );
        Ok(())
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Force pending WAL records to disk. No-op for ephemeral registries.
    pub fn flush(&self) -> RegistryResult<()> {
        let mut inner = self.inner.lock();
        if let Some(wal) = inner.wal.as_mut() {
            wal.sync()?;
        }
        Ok(())
    }

    /// Write a snapshot of the full state and truncate the WAL.
    ///
    /// No-op for ephemeral registries.
    pub fn checkpoint(&self) -> RegistryResult<()> {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;
        let Some(snapshots) = inner.snapshots.as_ref() else {
            return Ok(());
        };

        let payload = encode_state(&inner.state)?;
        let bytes = snapshots.write(inner.state.last_sequence(), &payload)?;
        if let Some(wal) = inner.wal.as_mut() {
            wal.reset()?;
        }

        info!(
            target: "keyreg::engine",
            sequence = inner.state.last_sequence(),
            bytes,
            "Checkpoint written"
        );
        Ok(())
    }

    /// Cumulative WAL counters (all zero for ephemeral registries)
    pub fn wal_counters(&self) -> WalCounters {
        self.inner
            .lock()
            .wal
            .as_ref()
            .map(WalWriter::counters)
            .unwrap_or_default()
    }

    /// Data directory, if disk-backed
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Durability mode in effect
    pub fn durability(&self) -> DurabilityMode {
        self.durability
    }

    /// Key and value limits in effect
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Sequence number of the last committed mutation
    pub fn last_sequence(&self) -> u64 {
        self.inner.lock().state.last_sequence()
    }

    /// Marker of the last committed mutation
    pub fn last_timestamp(&self) -> Timestamp {
        self.inner.lock().state.last_timestamp()
    }

    /// Cross-check the primary map against the owner index
    pub fn check_invariants(&self) -> Result<(), String> {
        self.inner.lock().state.check_invariants()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.flush_shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.flush_handle.lock().take() {
            let _ = handle.join();
        }
        let _ = self.flush();
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("data_dir", &self.data_dir)
            .field("durability", &self.durability)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

fn encode_state(state: &RegistryState) -> RegistryResult<Vec<u8>> {
    state
        .to_bytes()
        .map_err(|e| RegistryError::storage(format!("failed to encode snapshot: {}", e)))
}

fn spawn_flush_thread(
    inner: Arc<Mutex<Inner>>,
    shutdown: Arc<AtomicBool>,
    interval_ms: u64,
) -> RegistryResult<JoinHandle<()>> {
    let interval = std::time::Duration::from_millis(interval_ms);
    std::thread::Builder::new()
        .name("keyreg-wal-flush".to_string())
        .spawn(move || {
            while !shutdown.load(Ordering::Relaxed) {
                std::thread::sleep(interval);
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                let mut inner = inner.lock();
                if let Some(wal) = inner.wal.as_mut() {
                    let _ = wal.sync_if_overdue();
                }
            }
        })
        .map_err(|e| RegistryError::storage(format!("failed to spawn WAL flush thread: {}", e)))
}
