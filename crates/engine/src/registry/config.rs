//! Registry configuration via `keyreg.toml`
//!
//! The file lives in the data directory and is written on first open. To
//! change durability, clock, or limits, edit it and reopen. The admin can
//! never be changed: on reopen the admin recorded in the registry state
//! wins, and a config naming someone else is rejected.

use crate::clock::ClockKind;
use keyreg_core::{Identity, Limits, RegistryError, RegistryResult};
use keyreg_core::{DEFAULT_MAX_KEY_CHARS, DEFAULT_MAX_VALUE_CHARS};
use keyreg_durability::DurabilityMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name placed in the registry data directory.
pub const CONFIG_FILE_NAME: &str = "keyreg.toml";

/// Registry configuration loaded from `keyreg.toml`.
///
/// # Example
///
/// ```toml
/// admin = "wallet_1"
/// durability = "standard"
/// clock = "logical"
/// max_key_chars = 128
/// max_value_chars = 256
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Administrative identity, fixed for the registry's lifetime.
    pub admin: String,
    /// Durability mode: `"cache"`, `"standard"` or `"always"`.
    #[serde(default = "default_durability_str")]
    pub durability: String,
    /// Marker source: `"logical"` or `"system"`.
    #[serde(default = "default_clock_str")]
    pub clock: String,
    /// Maximum key length in characters.
    #[serde(default = "default_max_key_chars")]
    pub max_key_chars: usize,
    /// Maximum value length in characters.
    #[serde(default = "default_max_value_chars")]
    pub max_value_chars: usize,
}

fn default_durability_str() -> String {
    "standard".to_string()
}

fn default_clock_str() -> String {
    ClockKind::default().as_str().to_string()
}

fn default_max_key_chars() -> usize {
    DEFAULT_MAX_KEY_CHARS
}

fn default_max_value_chars() -> usize {
    DEFAULT_MAX_VALUE_CHARS
}

impl RegistryConfig {
    /// Defaults for everything except the admin
    pub fn new(admin: impl Into<String>) -> Self {
        RegistryConfig {
            admin: admin.into(),
            durability: default_durability_str(),
            clock: default_clock_str(),
            max_key_chars: DEFAULT_MAX_KEY_CHARS,
            max_value_chars: DEFAULT_MAX_VALUE_CHARS,
        }
    }

    /// Same config with a different durability string
    pub fn with_durability(mut self, durability: impl Into<String>) -> Self {
        self.durability = durability.into();
        self
    }

    /// Same config with different limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.max_key_chars = limits.max_key_chars;
        self.max_value_chars = limits.max_value_chars;
        self
    }

    /// The admin as an identity.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the admin is empty.
    pub fn admin_identity(&self) -> RegistryResult<Identity> {
        if self.admin.is_empty() {
            return Err(RegistryError::config("admin must not be empty"));
        }
        Ok(Identity::new(self.admin.clone()))
    }

    /// Parse the durability string into a `DurabilityMode`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the string is not `"cache"`, `"standard"` or `"always"`.
    pub fn durability_mode(&self) -> RegistryResult<DurabilityMode> {
        match self.durability.as_str() {
            "cache" => Ok(DurabilityMode::Cache),
            "standard" => Ok(DurabilityMode::standard_default()),
            "always" => Ok(DurabilityMode::Always),
            other => Err(RegistryError::config(format!(
                "invalid durability mode '{}' in {}. Expected \"cache\", \"standard\" or \"always\"",
                other, CONFIG_FILE_NAME
            ))),
        }
    }

    /// Parse the clock string.
    pub fn clock_kind(&self) -> RegistryResult<ClockKind> {
        ClockKind::parse(&self.clock)
    }

    /// Key and value limits.
    ///
    /// # Errors
    ///
    /// Returns `Config` if either limit is zero.
    pub fn limits(&self) -> RegistryResult<Limits> {
        if self.max_key_chars == 0 || self.max_value_chars == 0 {
            return Err(RegistryError::config(
                "max_key_chars and max_value_chars must be positive",
            ));
        }
        Ok(Limits {
            max_key_chars: self.max_key_chars,
            max_value_chars: self.max_value_chars,
        })
    }

    /// Check every field eagerly.
    pub fn validate(&self) -> RegistryResult<()> {
        self.admin_identity()?;
        self.durability_mode()?;
        self.clock_kind()?;
        self.limits()?;
        Ok(())
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> RegistryResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: RegistryConfig = toml::from_str(&content).map_err(|e| {
            RegistryError::config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> RegistryResult<()> {
        let body = toml::to_string_pretty(self)
            .map_err(|e| RegistryError::config(format!("failed to serialize config: {}", e)))?;
        let content = format!("{}{}", CONFIG_HEADER, body);
        std::fs::write(path, content).map_err(|e| {
            RegistryError::storage(format!(
                "failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

const CONFIG_HEADER: &str = r#"# keyreg registry configuration
#
# admin:      fixed at creation; changing it here makes the registry refuse to open
# durability: "cache" (no log), "standard" (batched fsync), "always" (fsync per commit)
# clock:      "logical" (commit counter) or "system" (wall-clock microseconds)

"#;
