//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands. `add` is the exception:
//! everything after `add` is message text, so global flags must come
//! before it (`patchbox --quiet add fix bug`).
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--dir <path>`: Use this directory as the store root
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--verify-blobs`: Compare bytes on blob dedup hits

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// patchbox - Record short text patches in a content-addressed store
#[derive(Parser, Debug)]
#[command(name = "patchbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store root (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Re-read and compare existing blobs instead of trusting them
    #[arg(long, global = true)]
    pub verify_blobs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The verify-blobs override, if the flag was given.
    pub fn verify_flag(&self) -> Option<bool> {
        self.verify_blobs.then_some(true)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new patch
    #[command(
        name = "add",
        long_about = "Record a new patch.\n\n\
            All words are joined with single spaces to form the message. The \
            message bytes are stored as a blob named by their SHA-1 digest, and a \
            record pointing at that blob is appended to the registry. Adding the \
            same text twice creates two records that share one blob.\n\n\
            Every word after `add` is message text, including words that look \
            like flags. Put global flags such as --quiet before `add`.",
        after_help = "\
EXAMPLES:
    patchbox add fix login bug
    patchbox add \"tighten session timeout\""
    )]
    Add {
        /// Patch message words
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// List recorded patches with position, timestamp and digest
    #[command(name = "list")]
    List,

    /// Remove the patch at a position
    #[command(
        name = "remove",
        long_about = "Remove the patch at a 1-based position.\n\n\
            Positions come from the current `list` output. Removing a patch \
            shifts every later patch down by one. The blob is kept.\n\n\
            The position must be a whole number. Text such as `2abc`, `1.5` or \
            `-1` is rejected as an invalid index rather than read as its \
            leading digits.",
        after_help = "\
EXAMPLES:
    patchbox list
    patchbox remove 2"
    )]
    Remove {
        /// 1-based position from `list`
        #[arg(allow_hyphen_values = true)]
        position: String,
    },

    /// Delete every patch record (blobs are kept)
    #[command(name = "clear")]
    Clear,

    /// Show patch messages only
    #[command(name = "preview")]
    Preview,

    /// Show patch messages only
    #[command(name = "snapshot")]
    Snapshot,

    /// Print the stored blob content of a patch
    #[command(name = "show")]
    Show {
        /// 1-based position from `list`
        #[arg(allow_hyphen_values = true)]
        position: String,
    },

    /// Verify that every patch's blob exists and matches its digest
    #[command(name = "check")]
    Check,

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        after_help = "\
KEYS:
    verify_blobs    Compare bytes on blob dedup hits (default: false)
    pretty_index    Write patches.json indented (default: true)

EXAMPLES:
    patchbox config list
    patchbox config set verify_blobs true"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value in the store config
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_collects_words() {
        let cli = Cli::try_parse_from(["patchbox", "add", "fix", "login", "bug"]).unwrap();
        match cli.command {
            Command::Add { words } => assert_eq!(words, vec!["fix", "login", "bug"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn remove_accepts_any_text() {
        let cli = Cli::try_parse_from(["patchbox", "remove", "x"]).unwrap();
        assert!(matches!(cli.command, Command::Remove { position } if position == "x"));
    }

    #[test]
    fn negative_position_reaches_handler() {
        let cli = Cli::try_parse_from(["patchbox", "remove", "-1"]).unwrap();
        assert!(matches!(cli.command, Command::Remove { position } if position == "-1"));

        let cli = Cli::try_parse_from(["patchbox", "show", "-1"]).unwrap();
        assert!(matches!(cli.command, Command::Show { position } if position == "-1"));
    }

    #[test]
    fn flags_after_add_are_message_words() {
        let cli = Cli::try_parse_from(["patchbox", "add", "fix", "bug", "--quiet"]).unwrap();
        assert!(!cli.quiet);
        match cli.command {
            Command::Add { words } => assert_eq!(words, vec!["fix", "bug", "--quiet"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["patchbox", "list", "--dir", "/tmp/store", "-q"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/store")));
        assert!(cli.quiet);
        assert_eq!(cli.verify_flag(), None);
    }
}
