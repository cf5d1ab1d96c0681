//! patchbox - a local patch registry backed by a content-addressed blob store
//!
//! Every patch is persisted twice: as a record in an ordered registry
//! (`patches.json`) and as an immutable blob addressed by the SHA-1 digest
//! of its bytes (`blobs/<ab>/<digest>.txt`).
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`core`] - Domain types, blob store, registry, locking, configuration
//! - [`ui`] - Output formatting and verbosity handling
//!
//! # Correctness Invariants
//!
//! 1. Equal digests imply equal blob bytes; blobs are never rewritten
//! 2. The index is replaced atomically, never edited in place
//! 3. Mutations are serialized by an exclusive store lock
//! 4. A corrupt index is reported, never silently discarded

pub mod cli;
pub mod core;
pub mod ui;
