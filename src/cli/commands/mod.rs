//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the registry for the resolved store root
//! 2. Calls one registry operation
//! 3. Formats and displays the result
//!
//! Handlers do NOT read or write store files directly.

mod add;
mod check;
mod clear;
mod config_cmd;
mod list;
mod preview;
mod remove;
mod show;

// Re-export command functions for testing and direct invocation
pub use add::add;
pub use check::check;
pub use clear::clear;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use list::list;
pub use preview::{preview, snapshot};
pub use remove::remove;
pub use show::show;

use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Add { words } => add::add(ctx, &words),
        Command::List => list::list(ctx),
        Command::Remove { position } => remove::remove(ctx, &position),
        Command::Clear => clear::clear(ctx),
        Command::Preview => preview::preview(ctx),
        Command::Snapshot => preview::snapshot(ctx),
        Command::Show { position } => show::show(ctx, &position),
        Command::Check => check::check(ctx),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
    }
}
