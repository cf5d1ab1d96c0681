//! remove command - Remove the patch at a position

use crate::cli::Context;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Remove the patch at a 1-based position given as text.
pub fn remove(ctx: &Context, position: &str) -> Result<()> {
    let verbosity = ctx.verbosity();
    let registry = ctx.registry()?;

    output::debug("Acquiring store lock", verbosity);
    let removed = match registry.remove_at(position) {
        Ok(record) => record,
        Err(e) if e.is_invalid_position() => {
            output::debug(&e, verbosity);
            bail!("Invalid index. Try a number that exists in the list.");
        }
        Err(e) => return Err(e).context("Failed to remove patch"),
    };

    output::debug(
        format!("Index saved to {}", registry.paths().index_path().display()),
        verbosity,
    );
    output::print(format!("Patch removed: \"{}\"", removed.message), verbosity);
    Ok(())
}
