//! Error conversion from engine error types.
//!
//! This module provides conversions from [`RegistryError`] to the
//! executor's [`Error`] type.

use crate::{Error, Result};
use keyreg_core::{RegistryError, RegistryResult};

/// Convert a RegistryError to an executor Error.
///
/// Identities are flattened to their string handles; every other field is
/// carried over unchanged.
impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidArgument { reason } => Error::InvalidArgument { reason },
            RegistryError::DuplicateKey { key } => Error::DuplicateKey { key },
            RegistryError::NotFound { key } => Error::NotFound { key },
            RegistryError::Forbidden { caller, action } => Error::Forbidden {
                caller: caller.to_string(),
                action,
            },
            RegistryError::Frozen { key } => Error::Frozen { key },
            RegistryError::AlreadyPaused => Error::AlreadyPaused,
            RegistryError::OutOfRange {
                owner,
                index,
                count,
            } => Error::OutOfRange {
                owner: owner.to_string(),
                index,
                count,
            },
            RegistryError::Storage { message } => Error::Storage { message },
            RegistryError::Corruption { message } => Error::Corruption { message },
            RegistryError::Config { message } => Error::Config { message },
        }
    }
}

/// Convert an engine result into an executor result.
pub(crate) fn convert_result<T>(r: RegistryResult<T>) -> Result<T> {
    r.map_err(Error::from)
}
