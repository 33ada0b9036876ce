//! Registry-level handlers: info and maintenance.

use std::sync::Arc;

use keyreg_engine::Registry;

use crate::convert::convert_result;
use crate::types::RegistryInfo;
use crate::{Output, Result};

/// Handle Info command.
pub fn info(reg: &Arc<Registry>) -> Result<Output> {
    Ok(Output::Info(RegistryInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        admin: reg.admin(),
        paused: reg.is_paused(),
        entry_count: reg.entry_count(),
        owner_count: reg.owner_count(),
        moderator_count: reg.moderators().len() as u64,
        last_sequence: reg.last_sequence(),
        durability: reg.durability().description().to_string(),
    }))
}

/// Handle Flush command.
pub fn flush(reg: &Arc<Registry>) -> Result<Output> {
    convert_result(reg.flush())?;
    Ok(Output::Unit)
}

/// Handle Checkpoint command.
pub fn checkpoint(reg: &Arc<Registry>) -> Result<Output> {
    convert_result(reg.checkpoint())?;
    Ok(Output::Unit)
}
