//! cli
//!
//! Command-line interface layer for patchbox.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve the store root and configuration
//! - Delegate to command handlers, which call into [`crate::core`]
//!
//! The CLI layer is thin: it never touches `patches.json` or `blobs/`
//! directly; all storage goes through [`Registry`].

pub mod args;
pub mod commands;

pub use args::Cli;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::core::paths::StorePaths;
use crate::core::registry::{Registry, RegistryOptions};
use crate::ui::output::{self, Verbosity};

/// Execution context shared by every command handler.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Store root override.
    pub dir: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Forces blob verification on when set.
    pub verify_blobs: Option<bool>,
}

impl Context {
    /// Output verbosity for this invocation.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Resolve the store paths, defaulting to the current directory.
    pub fn paths(&self) -> Result<StorePaths> {
        let root = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        Ok(StorePaths::new(root))
    }

    /// Load configuration for the store.
    pub fn config(&self) -> Result<Config> {
        let paths = self.paths()?;
        Config::load(&paths).context("Failed to load config")
    }

    /// Open the registry with configuration and flag overrides applied.
    pub fn registry(&self) -> Result<Registry> {
        let paths = self.paths()?;
        let config = Config::load(&paths).context("Failed to load config")?;

        let mut options = RegistryOptions::from_config(&config);
        if let Some(verify) = self.verify_blobs {
            options.verify_blobs = verify;
        }

        let verbosity = self.verbosity();
        output::debug(format!("Store root: {}", paths.root().display()), verbosity);
        if let Some(path) = config.global_path() {
            output::debug(format!("Global config: {}", path.display()), verbosity);
        }
        output::debug(
            format!(
                "verify_blobs={} pretty_index={}",
                options.verify_blobs, options.pretty_index
            ),
            verbosity,
        );

        Ok(Registry::open(paths, options))
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        dir: cli.dir.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        verify_blobs: cli.verify_flag(),
    };

    commands::dispatch(cli.command, &ctx)
}
