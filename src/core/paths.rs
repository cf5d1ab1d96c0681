//! core::paths
//!
//! Centralized path routing for patchbox storage locations.
//!
//! # Storage Layout
//!
//! Everything lives under a single store root:
//! - `patches.json` - Registry index
//! - `blobs/<ab>/<digest>.txt` - Content-addressed blobs, sharded by the
//!   first two hex characters of the digest
//! - `.patchbox/lock` - Exclusive lock file
//! - `.patchbox/config.toml` - Store configuration
//!
//! **Hard rule:** No code outside this module should compute
//! `*.join("blobs")` or `*.join(".patchbox")` paths.
//!
//! # Example
//!
//! ```
//! use patchbox::core::paths::StorePaths;
//! use std::path::PathBuf;
//!
//! let paths = StorePaths::new(PathBuf::from("/work"));
//!
//! assert_eq!(paths.index_path(), PathBuf::from("/work/patches.json"));
//! assert_eq!(paths.blobs_dir(), PathBuf::from("/work/blobs"));
//! ```

use std::path::{Path, PathBuf};

use crate::core::types::Digest;

/// Name of the registry index file.
pub const INDEX_FILE: &str = "patches.json";

/// Name of the blob storage directory.
pub const BLOBS_DIR: &str = "blobs";

/// Extension used for blob files.
pub const BLOB_EXTENSION: &str = "txt";

/// Centralized path routing for a patchbox store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// The store root directory.
    pub root: PathBuf,
}

impl StorePaths {
    /// Create paths for a store rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the path to the registry index.
    ///
    /// This is `<root>/patches.json`.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Get the temp path used for atomic index writes.
    pub fn index_temp_path(&self) -> PathBuf {
        self.root.join(format!("{}.tmp", INDEX_FILE))
    }

    /// Get the blob storage root.
    pub fn blobs_dir(&self) -> PathBuf {
        self.root.join(BLOBS_DIR)
    }

    /// Get the shard directory that holds `digest`.
    ///
    /// # Example
    ///
    /// ```
    /// use patchbox::core::paths::StorePaths;
    /// use patchbox::core::types::Digest;
    /// use std::path::PathBuf;
    ///
    /// let paths = StorePaths::new(PathBuf::from("/work"));
    /// let digest = Digest::of(b"abc");
    /// assert_eq!(paths.shard_dir(&digest), PathBuf::from("/work/blobs/a9"));
    /// ```
    pub fn shard_dir(&self, digest: &Digest) -> PathBuf {
        self.blobs_dir().join(digest.shard())
    }

    /// Get the blob file path for `digest`.
    ///
    /// This is `<root>/blobs/<shard>/<digest>.txt`.
    pub fn blob_path(&self, digest: &Digest) -> PathBuf {
        self.shard_dir(digest)
            .join(format!("{}.{}", digest.as_str(), BLOB_EXTENSION))
    }

    /// Get the tool-private directory.
    pub fn private_dir(&self) -> PathBuf {
        self.root.join(".patchbox")
    }

    /// Get the path to the store lock file.
    pub fn lock_path(&self) -> PathBuf {
        self.private_dir().join("lock")
    }

    /// Get the path to the store configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.private_dir().join("config.toml")
    }
}
