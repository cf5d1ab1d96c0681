//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! patchbox has two configuration scopes:
//! - **Global**: User-level settings
//! - **Store**: Settings for one store root
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Store config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$PATCHBOX_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/patchbox/config.toml`
//! 3. `~/.patchbox/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use patchbox::core::config::Config;
//! use patchbox::core::paths::StorePaths;
//! use std::path::PathBuf;
//!
//! let paths = StorePaths::new(PathBuf::from("."));
//! let config = Config::load(&paths).unwrap();
//! println!("Verify blobs: {}", config.verify_blobs());
//! ```

pub mod schema;

pub use schema::{ConfigFile, KNOWN_KEYS};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::paths::StorePaths;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Store configuration (if the store has one)
    pub store: Option<ConfigFile>,
    global_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for the store at `paths`.
    ///
    /// Missing config files are not an error (defaults are used).
    pub fn load(paths: &StorePaths) -> Result<Config, ConfigError> {
        let (global, global_path) = Self::load_global()?;

        let store_path = paths.config_path();
        let store = if store_path.exists() {
            Some(Self::read_config(&store_path)?)
        } else {
            None
        };

        Ok(Config {
            global,
            store,
            global_path,
        })
    }

    fn load_global() -> Result<(ConfigFile, Option<PathBuf>), ConfigError> {
        for path in Self::global_candidates() {
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }
        Ok((ConfigFile::default(), None))
    }

    fn global_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var("PATCHBOX_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("patchbox/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".patchbox/config.toml"));
        }
        candidates
    }

    /// Read and parse a config file.
    pub fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write the store config atomically.
    pub fn write_store(paths: &StorePaths, config: &ConfigFile) -> Result<PathBuf, ConfigError> {
        let path = paths.config_path();
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically (temp file, fsync, rename).
    fn write_config_atomic(path: &Path, config: &ConfigFile) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// The effective settings with store values layered over global ones.
    pub fn effective(&self) -> ConfigFile {
        match &self.store {
            Some(store) => self.global.merged_with(store),
            None => self.global.clone(),
        }
    }

    /// Path of the global config file, if one was loaded.
    pub fn global_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Check if blobs are re-verified on a dedup hit.
    ///
    /// Defaults to `false` (trust-on-exists).
    pub fn verify_blobs(&self) -> bool {
        self.effective().verify_blobs.unwrap_or(false)
    }

    /// Check if the index is written as indented JSON.
    ///
    /// Defaults to `true`.
    pub fn pretty_index(&self) -> bool {
        self.effective().pretty_index.unwrap_or(true)
    }
}
