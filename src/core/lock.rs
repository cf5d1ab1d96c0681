//! core::lock
//!
//! Exclusive store lock for mutating registry operations.
//!
//! # Architecture
//!
//! The lock ensures only one patchbox process runs a load-mutate-save
//! sequence against a store at a time. Without it, two concurrent writers
//! race and the later save silently discards the earlier one's change.
//!
//! # Storage
//!
//! - `<root>/.patchbox/lock` - Lock file with OS-level exclusive lock
//!
//! # Invariants
//!
//! - Lock must be held for the entire load-mutate-save span
//! - Lock is automatically released on drop (RAII pattern)
//! - Lock acquisition is non-blocking (fails fast if locked)
//!
//! # Example
//!
//! ```no_run
//! use patchbox::core::lock::StoreLock;
//! use patchbox::core::paths::StorePaths;
//! use std::path::PathBuf;
//!
//! let paths = StorePaths::new(PathBuf::from("/work"));
//! let lock = StoreLock::acquire(&paths)?;
//!
//! // Perform operations while holding lock
//!
//! // Lock automatically released when dropped
//! drop(lock);
//! # Ok::<(), patchbox::core::lock::LockError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::core::paths::StorePaths;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("store is locked by another patchbox process")]
    AlreadyLocked,

    /// Failed to create lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// Failed to release the lock.
    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// An exclusive lock on a store.
///
/// The lock is automatically released when this guard is dropped, so every
/// exit path (including `?` propagation) gives it up.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
    /// When this is Some, we hold the lock.
    file: Option<File>,
}

impl StoreLock {
    /// Attempt to acquire the store lock.
    ///
    /// This uses OS-level advisory locking via `fs2`, which works across
    /// processes. The lock is non-blocking: if another process holds it,
    /// this returns `LockError::AlreadyLocked` immediately.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(paths: &StorePaths) -> Result<Self, LockError> {
        let private_dir = paths.private_dir();
        fs::create_dir_all(&private_dir).map_err(|e| {
            LockError::CreateFailed(format!("cannot create {}: {}", private_dir.display(), e))
        })?;

        let path = paths.lock_path();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly.
    ///
    /// Calling this more than once is a no-op.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // Best-effort release on drop
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}
