//! Contract types shared by every layer
//!
//! - `timestamp`: host-supplied sequence/time marker
//! - `version`: per-entry mutation counter

pub mod timestamp;
pub mod version;

pub use timestamp::Timestamp;
pub use version::Version;
