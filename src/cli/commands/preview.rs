//! preview and snapshot commands - Show patch messages only

use crate::cli::Context;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print every patch message under a "Preview" heading.
pub fn preview(ctx: &Context) -> Result<()> {
    let messages = ctx
        .registry()?
        .preview()
        .context("Failed to read patches")?;
    print_messages("Preview", &messages);
    Ok(())
}

/// Print every patch message under a "Snapshot" heading.
pub fn snapshot(ctx: &Context) -> Result<()> {
    let messages = ctx
        .registry()?
        .snapshot()
        .context("Failed to read patches")?;
    print_messages("Snapshot", &messages);
    Ok(())
}

fn print_messages(title: &str, messages: &[String]) {
    println!("{} (patch messages):", title);
    if !messages.is_empty() {
        println!("{}", output::format_list(messages, "- "));
    }
}
