//! Key validation and composition
//!
//! Keys are free-form text such as `hotline:region1` or
//! `counselor:slot:2025010109`. The registry enforces two rules:
//! - Keys must not be empty
//! - Keys must not exceed `max_key_chars`

use crate::error::{RegistryError, RegistryResult};
use crate::limits::Limits;
use thiserror::Error;

/// Validate a key against the given limits
///
/// # Examples
///
/// ```
/// use keyreg_core::key::validate_key;
/// use keyreg_core::Limits;
///
/// let limits = Limits::default();
/// assert!(validate_key("hotline:region1", &limits).is_ok());
/// assert!(validate_key("", &limits).is_err());
/// ```
pub fn validate_key(key: &str, limits: &Limits) -> Result<(), KeyError> {
    if key.is_empty() {
        return Err(KeyError::Empty);
    }
    let len = key.chars().count();
    if len > limits.max_key_chars {
        return Err(KeyError::TooLong {
            actual: len,
            max: limits.max_key_chars,
        });
    }
    Ok(())
}

/// Concatenate two key fragments into one key
///
/// The result is `a` immediately followed by `b`. It must itself be a valid
/// key, so two empty fragments or an over-long result are rejected.
pub fn concat_keys(a: &str, b: &str, limits: &Limits) -> RegistryResult<String> {
    let mut out = String::with_capacity(a.len() + b.len());
    out.push_str(a);
    out.push_str(b);
    validate_key(&out, limits)?;
    Ok(out)
}

/// Key validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Key is empty (length 0)
    #[error("key cannot be empty")]
    Empty,

    /// Key exceeds maximum length
    #[error("key too long: {actual} characters exceeds maximum {max}")]
    TooLong {
        /// Actual key length in characters
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },
}

impl From<KeyError> for RegistryError {
    fn from(e: KeyError) -> Self {
        RegistryError::invalid_argument(e.to_string())
    }
}
