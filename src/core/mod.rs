//! core
//!
//! Core domain types, storage, and operations for patchbox.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Digest, UtcTimestamp, Position
//! - [`paths`] - Centralized path routing for store locations
//! - [`blob`] - Content-addressed, sharded, deduplicated blob storage
//! - [`registry`] - Ordered patch registry and its on-disk index
//! - [`lock`] - Exclusive store lock for mutations
//! - [`config`] - Configuration schema and loading
//!
//! # Layering
//!
//! The registry depends on the blob store; the blob store depends on
//! nothing above it.

pub mod blob;
pub mod config;
pub mod lock;
pub mod paths;
pub mod registry;
pub mod types;
