//! core::blob
//!
//! Content-addressed blob storage.
//!
//! # Architecture
//!
//! A blob is an immutable byte sequence stored under the SHA-1 digest of
//! its exact bytes. Blobs are sharded by the first two hex characters of
//! the digest to bound directory fan-out:
//!
//! ```text
//! <root>/blobs/a9/a9993e364706816aba3e25717850c26c9cd0d89d.txt
//! ```
//!
//! # Deduplication
//!
//! `put` is trust-on-exists: if a file already sits at the digest path it
//! is assumed authentic and is neither rewritten nor re-read. A store
//! opened with `verify_on_hit` re-reads the existing bytes on a hit and
//! refuses to proceed if they differ.
//!
//! # Invariants
//!
//! - A stored blob is never modified or deleted by this module
//! - Equal digests imply equal bytes (collision-freedom is assumed)
//! - `put` returns the same digest for the same bytes, every time
//!
//! # Example
//!
//! ```no_run
//! use patchbox::core::blob::BlobStore;
//! use patchbox::core::paths::StorePaths;
//! use std::path::PathBuf;
//!
//! let store = BlobStore::new(StorePaths::new(PathBuf::from("/work")));
//! let digest = store.put(b"fix login bug")?;
//! assert_eq!(store.get(&digest)?, b"fix login bug");
//! # Ok::<(), patchbox::core::blob::BlobError>(())
//! ```

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::core::paths::StorePaths;
use crate::core::types::Digest;

/// Errors from blob storage operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// Filesystem error creating, writing, or reading a blob.
    #[error("blob i/o error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No blob is stored under the digest.
    #[error("blob not found: {0}")]
    Missing(Digest),

    /// An existing blob's bytes differ from the content being stored.
    #[error("blob {digest} at '{path}' does not match its content")]
    Mismatch { digest: Digest, path: PathBuf },
}

impl BlobError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BlobError::Io {
            path: path.into(),
            source,
        }
    }
}

/// The integrity status of a stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobStatus {
    /// The blob exists and its bytes hash to its digest.
    Ok,
    /// No file exists at the digest path.
    Missing,
    /// The blob exists but its bytes hash to `actual`.
    Corrupt { actual: Digest },
}

/// Content-addressed blob store.
#[derive(Debug, Clone)]
pub struct BlobStore {
    paths: StorePaths,
    verify_on_hit: bool,
}

impl BlobStore {
    /// Create a trust-on-exists blob store.
    pub fn new(paths: StorePaths) -> Self {
        Self {
            paths,
            verify_on_hit: false,
        }
    }

    /// Enable or disable byte comparison on dedup hits.
    pub fn with_verify_on_hit(mut self, verify: bool) -> Self {
        self.verify_on_hit = verify;
        self
    }

    /// Get the storage path for a digest.
    pub fn path_for(&self, digest: &Digest) -> PathBuf {
        self.paths.blob_path(digest)
    }

    /// Store `content` and return its digest.
    ///
    /// Creates the shard directory (and any missing ancestors) on first
    /// use. If a blob already exists at the digest path nothing is
    /// written. The caller cannot tell a fresh write from a dedup hit.
    ///
    /// # Errors
    ///
    /// - [`BlobError::Io`] if the shard directory or blob file cannot be
    ///   created or written; partial state is left as the filesystem left it
    /// - [`BlobError::Mismatch`] in verify mode when the existing bytes differ
    pub fn put(&self, content: &[u8]) -> Result<Digest, BlobError> {
        let digest = Digest::of(content);
        let path = self.path_for(&digest);

        if path.exists() {
            return self.on_hit(digest, path, content);
        }

        let shard = self.paths.shard_dir(&digest);
        fs::create_dir_all(&shard).map_err(|e| BlobError::io(&shard, e))?;

        // create_new so a concurrent writer that got there first wins cleanly
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return self.on_hit(digest, path, content);
            }
            Err(e) => return Err(BlobError::io(&path, e)),
        };
        file.write_all(content)
            .map_err(|e| BlobError::io(&path, e))?;

        Ok(digest)
    }

    fn on_hit(&self, digest: Digest, path: PathBuf, content: &[u8]) -> Result<Digest, BlobError> {
        if self.verify_on_hit {
            let existing = fs::read(&path).map_err(|e| BlobError::io(&path, e))?;
            if existing != content {
                return Err(BlobError::Mismatch { digest, path });
            }
        }
        Ok(digest)
    }

    /// Check whether a blob exists for `digest`.
    pub fn contains(&self, digest: &Digest) -> bool {
        self.path_for(digest).is_file()
    }

    /// Read the bytes stored under `digest`.
    ///
    /// The bytes are returned as stored; they are not re-hashed.
    pub fn get(&self, digest: &Digest) -> Result<Vec<u8>, BlobError> {
        let path = self.path_for(digest);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobError::Missing(digest.clone())),
            Err(e) => Err(BlobError::io(&path, e)),
        }
    }

    /// Re-hash the stored bytes and report whether they match `digest`.
    pub fn verify(&self, digest: &Digest) -> Result<BlobStatus, BlobError> {
        match self.get(digest) {
            Ok(bytes) => {
                let actual = Digest::of(&bytes);
                if &actual == digest {
                    Ok(BlobStatus::Ok)
                } else {
                    Ok(BlobStatus::Corrupt { actual })
                }
            }
            Err(BlobError::Missing(_)) => Ok(BlobStatus::Missing),
            Err(e) => Err(e),
        }
    }
}
