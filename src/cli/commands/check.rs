//! check command - Verify every patch's blob

use crate::cli::Context;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Report patches whose blob is missing or no longer matches its digest.
///
/// Fails when any issue is found so scripts can rely on the exit status.
pub fn check(ctx: &Context) -> Result<()> {
    let registry = ctx.registry()?;
    let issues = registry.check().context("Failed to check patches")?;

    if issues.is_empty() {
        output::print("All patches verified.", ctx.verbosity());
        return Ok(());
    }

    for issue in &issues {
        println!("{}", issue);
    }
    bail!(
        "{} problem{} found",
        issues.len(),
        if issues.len() == 1 { "" } else { "s" }
    );
}
