//! list command - Show every patch with its position, timestamp and digest

use crate::cli::Context;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// List recorded patches.
pub fn list(ctx: &Context) -> Result<()> {
    let registry = ctx.registry()?;
    let entries = registry.list().context("Failed to read patches")?;

    if entries.is_empty() {
        println!("No patches saved yet.");
        return Ok(());
    }

    println!("Patch list:");
    for entry in &entries {
        println!("{}", output::format_patch(entry));
    }

    Ok(())
}
