//! Core types for keyreg
//!
//! This crate defines the foundational types used throughout the registry:
//! - Identity: Opaque caller handle supplied by the host
//! - Entry: One key-value record with ownership, version and freeze metadata
//! - Timestamp / Version: Sequence markers and per-entry counters
//! - Limits: Key and value length bounds
//! - RegistryError: The call-rejection taxonomy plus persistence failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod key;
pub mod limits;
pub mod types;

pub use contract::{Timestamp, Version};
pub use error::{RegistryError, RegistryResult};
pub use key::{concat_keys, validate_key, KeyError};
pub use limits::{LimitError, Limits, DEFAULT_MAX_KEY_CHARS, DEFAULT_MAX_VALUE_CHARS};
pub use types::{Entry, Identity};
