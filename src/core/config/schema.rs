//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same file shape is used for both scopes: the global file and the
//! store file at `<root>/.patchbox/config.toml`.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Configuration keys accepted by `config get` / `config set`.
pub const KNOWN_KEYS: &[&str] = &["verify_blobs", "pretty_index"];

/// One configuration file.
///
/// # Example
///
/// ```toml
/// verify_blobs = true
/// pretty_index = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Re-read and compare existing blobs on a dedup hit
    pub verify_blobs: Option<bool>,

    /// Write the index as indented JSON
    pub pretty_index: Option<bool>,
}

impl ConfigFile {
    /// Look up a key's raw value.
    pub fn get(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match key {
            "verify_blobs" => Ok(self.verify_blobs),
            "pretty_index" => Ok(self.pretty_index),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a key from its textual value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unknown keys or values that
    /// are not `true`/`false`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let parsed = parse_bool(value)?;
        match key {
            "verify_blobs" => self.verify_blobs = Some(parsed),
            "pretty_index" => self.pretty_index = Some(parsed),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Overlay `other` on top of `self`; set values in `other` win.
    pub fn merged_with(&self, other: &ConfigFile) -> ConfigFile {
        ConfigFile {
            verify_blobs: other.verify_blobs.or(self.verify_blobs),
            pretty_index: other.pretty_index.or(self.pretty_index),
        }
    }
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::InvalidValue(format!(
        "unknown key '{}', must be one of: {}",
        key,
        KNOWN_KEYS.join(", ")
    ))
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ConfigError::InvalidValue(format!(
            "expected 'true' or 'false', got '{}'",
            other
        ))),
    }
}
