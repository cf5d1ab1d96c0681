//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! All output goes through this module so quiet and debug modes are
//! handled in one place.

pub mod output;
