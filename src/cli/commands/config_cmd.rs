//! config command - Get, set, or list configuration values

use crate::cli::Context;
use crate::core::config::{Config, KNOWN_KEYS};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the effective value of a configuration key.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let config = ctx.config()?;
    println!("{}", effective_value(&config, key)?);
    Ok(())
}

/// Set a configuration value in the store config file.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let paths = ctx.paths()?;
    let config = ctx.config()?;

    let mut store = config.store.unwrap_or_default();
    store.set(key, value).context("Invalid configuration")?;
    let path = Config::write_store(&paths, &store).context("Failed to write config")?;

    output::debug(format!("Wrote {}", path.display()), ctx.verbosity());
    output::print(format!("Set {} = {}", key, value), ctx.verbosity());
    Ok(())
}

/// List every configuration key with its effective value.
pub fn list(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;

    println!("# Effective Configuration");
    for key in KNOWN_KEYS {
        println!("{} = {}", key, effective_value(&config, key)?);
    }
    Ok(())
}

fn effective_value(config: &Config, key: &str) -> Result<bool> {
    // Validates the key even though the accessors below carry the defaults.
    config.effective().get(key)?;
    Ok(match key {
        "verify_blobs" => config.verify_blobs(),
        _ => config.pretty_index(),
    })
}
