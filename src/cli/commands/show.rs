//! show command - Print the blob content behind a patch

use std::io::Write;

use crate::cli::Context;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Write the stored blob bytes of the patch at `position` to stdout.
pub fn show(ctx: &Context, position: &str) -> Result<()> {
    let verbosity = ctx.verbosity();
    let registry = ctx.registry()?;

    let (entry, content) = match registry.show(position) {
        Ok(found) => found,
        Err(e) if e.is_invalid_position() => {
            output::debug(&e, verbosity);
            bail!("Invalid index. Try a number that exists in the list.");
        }
        Err(e) => return Err(e).context("Failed to read patch"),
    };
    output::debug(output::format_patch(&entry), verbosity);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&content)?;
    if !content.ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}
