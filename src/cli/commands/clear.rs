//! clear command - Delete every patch record

use crate::cli::Context;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Delete every patch record. Blobs stay on disk.
pub fn clear(ctx: &Context) -> Result<()> {
    let verbosity = ctx.verbosity();
    let registry = ctx.registry()?;

    output::debug("Acquiring store lock", verbosity);
    registry.clear().context("Failed to clear patches")?;
    output::debug(
        format!("Index saved to {}", registry.paths().index_path().display()),
        verbosity,
    );

    output::print("All patches have been deleted.", verbosity);
    Ok(())
}
