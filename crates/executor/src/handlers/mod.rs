//! Command handlers organized by category.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `entry` | CreateEntry, GetEntry, UpdateEntry, DeleteEntry, TransferEntry |
//! | `admin` | SetPaused, AddModerator, RemoveModerator, SetKeyFrozen, IsModerator, IsPaused |
//! | `index` | GetKeyCount, GetKeyByOwner, KeysByOwner, ConcatKeys |
//! | `registry` | Info, Flush, Checkpoint |

pub mod admin;
pub mod entry;
pub mod index;
pub mod registry;
