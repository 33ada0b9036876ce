//! Size limits for keys and values
//!
//! Lengths are counted in characters (Unicode scalar values), not bytes, so a
//! bound means the same thing for ASCII and non-ASCII text. Custom limits are
//! set when a registry is opened and stay fixed for its lifetime.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum key length in characters
pub const DEFAULT_MAX_KEY_CHARS: usize = 128;

/// Default maximum value length in characters
pub const DEFAULT_MAX_VALUE_CHARS: usize = 256;

/// Size limits for keys and values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum key length in characters (default: 128)
    pub max_key_chars: usize,

    /// Maximum value length in characters (default: 256)
    pub max_value_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_key_chars: DEFAULT_MAX_KEY_CHARS,
            max_value_chars: DEFAULT_MAX_VALUE_CHARS,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_key_chars: 16,
            max_value_chars: 8,
        }
    }

    /// Validate a value length
    pub fn validate_value(&self, value: &str) -> Result<(), LimitError> {
        let len = value.chars().count();
        if len > self.max_value_chars {
            return Err(LimitError::ValueTooLong {
                actual: len,
                max: self.max_value_chars,
            });
        }
        Ok(())
    }
}

/// Limit validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitError {
    /// Value exceeds maximum length
    #[error("value too long: {actual} characters exceeds maximum {max}")]
    ValueTooLong {
        /// Actual value length in characters
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },
}

impl LimitError {
    /// Short machine-readable reason code
    pub fn reason_code(&self) -> &'static str {
        match self {
            LimitError::ValueTooLong { .. } => "value_too_long",
        }
    }
}

impl From<LimitError> for RegistryError {
    fn from(e: LimitError) -> Self {
        RegistryError::invalid_argument(e.to_string())
    }
}
