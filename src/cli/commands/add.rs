//! add command - Record a new patch

use crate::cli::Context;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Record a new patch whose message is `words` joined by single spaces.
pub fn add(ctx: &Context, words: &[String]) -> Result<()> {
    let verbosity = ctx.verbosity();
    let registry = ctx.registry()?;
    let message = words.join(" ");

    output::debug("Acquiring store lock", verbosity);
    let record = registry.add(&message).context("Failed to add patch")?;

    if let Some(digest) = &record.blob {
        output::debug(
            format!("Blob at {}", registry.blobs().path_for(digest).display()),
            verbosity,
        );
        output::debug(
            format!("Index saved to {}", registry.paths().index_path().display()),
            verbosity,
        );
        output::print(format!("Patch added! Blob saved as {}", digest), verbosity);
    }

    Ok(())
}
