//! Keyreg - access-controlled, versioned key registry
//!
//! Keyreg stores unique text keys, each owned by one identity, with a
//! per-owner enumeration index, moderator freezing and an admin pause
//! switch. Every call is atomic: it commits one state transition or is
//! rejected with nothing changed.
//!
//! # Quick Start
//!
//! ```
//! use keyreg::{Registry, Session};
//!
//! let registry = Registry::ephemeral("admin");
//! let alice = Session::new(registry, "alice");
//!
//! alice.create_entry("hotline:region1", "tel:123-456")?;
//! alice.update_entry("hotline:region1", "tel:999-000")?;
//! assert_eq!(alice.get_entry("hotline:region1")?.version, 2);
//! # Ok::<(), keyreg::Error>(())
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which dispatches typed
//! [`Command`]s on behalf of a caller identity. [`Session`] binds a caller
//! and offers typed helpers. Persistence (write-ahead log and snapshots)
//! lives behind [`Registry::open`] and is not exposed.

// Re-export the public API from keyreg-executor
pub use keyreg_executor::*;
