//! WAL (Write-Ahead Log) module
//!
//! - `mode`: durability modes (Cache / Standard / Always)
//! - `writer`: append-side of the log (WalWriter)
//! - `reader`: recovery-side of the log (WalReader)

pub mod mode;
pub mod reader;
pub mod writer;

pub use mode::DurabilityMode;
pub use reader::{ReadStopReason, WalReadResult, WalReader, WalReaderError};
pub use writer::{wal_path, WalCounters, WalWriter, WAL_FILE_NAME};
