//! core::registry
//!
//! The ordered patch registry.
//!
//! # Architecture
//!
//! The registry is a single JSON index (`patches.json`) holding every
//! [`PatchRecord`] in insertion order, plus a [`BlobStore`] that holds the
//! content each record references. The index on disk is the sole source of
//! truth: every operation reads it in full, and every mutating operation
//! rewrites it in full.
//!
//! ```text
//! lock -> load -> mutate in memory -> save (temp + fsync + rename) -> unlock
//! ```
//!
//! # Positions
//!
//! Positions are 1-based and recomputed from the current array order on
//! every call. A position is a view, not an identity: removing record 2
//! makes the former record 3 the new record 2.
//!
//! # Invariants
//!
//! - Mutations hold the store lock for the entire load-mutate-save span
//! - A failed validation never writes
//! - `clear` never deletes blobs; orphaned blobs are expected
//! - An unreadable index is an error, never silently treated as empty
//!
//! # Example
//!
//! ```no_run
//! use patchbox::core::paths::StorePaths;
//! use patchbox::core::registry::{Registry, RegistryOptions};
//! use std::path::PathBuf;
//!
//! let registry = Registry::open(StorePaths::new(PathBuf::from(".")), RegistryOptions::default());
//! registry.add("fix login bug")?;
//! for entry in registry.list()? {
//!     println!("{}. {}", entry.position, entry.record.message);
//! }
//! # Ok::<(), patchbox::core::registry::RegistryError>(())
//! ```

pub mod schema;

pub use schema::PatchRecord;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::blob::{BlobError, BlobStatus, BlobStore};
use crate::core::config::Config;
use crate::core::lock::{LockError, StoreLock};
use crate::core::paths::StorePaths;
use crate::core::types::{Digest, Position, TypeError};

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The caller-supplied position does not name an existing record.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// The index exists but cannot be parsed as a record sequence.
    #[error("corrupt index '{path}': {message}")]
    CorruptIndex { path: PathBuf, message: String },

    /// Reading or writing the index or a blob failed.
    #[error("storage error at '{path}': {source}")]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Another process is mutating the store.
    #[error("store is locked by another patchbox process")]
    Locked,

    /// The lock could not be created or acquired.
    #[error("lock error: {0}")]
    Lock(LockError),

    /// The record predates blob storage and references no blob.
    #[error("patch {0} has no blob")]
    NoBlob(Position),

    /// A blob-level failure other than raw I/O.
    #[error(transparent)]
    Blob(BlobError),
}

impl RegistryError {
    /// Whether this error is a rejected position (as opposed to a storage failure).
    pub fn is_invalid_position(&self) -> bool {
        matches!(self, RegistryError::InvalidPosition(_))
    }
}

impl From<LockError> for RegistryError {
    fn from(e: LockError) -> Self {
        match e {
            LockError::AlreadyLocked => RegistryError::Locked,
            other => RegistryError::Lock(other),
        }
    }
}

impl From<BlobError> for RegistryError {
    fn from(e: BlobError) -> Self {
        match e {
            BlobError::Io { path, source } => RegistryError::Persistence { path, source },
            other => RegistryError::Blob(other),
        }
    }
}

/// Options controlling registry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Compare bytes on blob dedup hits instead of trusting the existing file.
    pub verify_blobs: bool,
    /// Write the index as indented JSON.
    pub pretty_index: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            verify_blobs: false,
            pretty_index: true,
        }
    }
}

impl RegistryOptions {
    /// Build options from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            verify_blobs: config.verify_blobs(),
            pretty_index: config.pretty_index(),
        }
    }
}

/// A record together with its current position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedPatch {
    /// 1-based position in the current order.
    pub position: Position,
    /// The stored record.
    pub record: PatchRecord,
}

/// A problem found by [`Registry::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIssue {
    /// The record's blob is not in the store.
    MissingBlob { position: Position, digest: Digest },
    /// The record's blob bytes no longer hash to its digest.
    CorruptBlob {
        position: Position,
        digest: Digest,
        actual: Digest,
    },
    /// The record has no blob reference at all.
    Unreferenced { position: Position },
}

impl std::fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckIssue::MissingBlob { position, digest } => {
                write!(f, "patch {}: blob {} is missing", position, digest)
            }
            CheckIssue::CorruptBlob {
                position,
                digest,
                actual,
            } => write!(
                f,
                "patch {}: blob {} hashes to {}",
                position, digest, actual
            ),
            CheckIssue::Unreferenced { position } => {
                write!(f, "patch {}: no blob reference", position)
            }
        }
    }
}

/// The patch registry for one store root.
#[derive(Debug, Clone)]
pub struct Registry {
    paths: StorePaths,
    blobs: BlobStore,
    pretty_index: bool,
}

impl Registry {
    /// Open the registry rooted at `paths`.
    ///
    /// Nothing is read or created until an operation runs.
    pub fn open(paths: StorePaths, options: RegistryOptions) -> Self {
        let blobs = BlobStore::new(paths.clone()).with_verify_on_hit(options.verify_blobs);
        Self {
            paths,
            blobs,
            pretty_index: options.pretty_index,
        }
    }

    /// Get the store paths.
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Get the underlying blob store.
    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Append a new patch.
    ///
    /// The message bytes are stored as a blob (or deduplicated against an
    /// existing one) before the index is rewritten with the new record at
    /// the end. If the index write fails the blob is left in place.
    pub fn add(&self, message: &str) -> Result<PatchRecord, RegistryError> {
        let _lock = StoreLock::acquire(&self.paths)?;

        let mut records = self.load()?;
        let digest = self.blobs.put(message.as_bytes())?;
        let record = PatchRecord::new(message, digest);
        records.push(record.clone());
        self.save(&records)?;

        Ok(record)
    }

    /// List every record with its current position.
    ///
    /// An empty vector means there are no records; that is not an error.
    pub fn list(&self) -> Result<Vec<ListedPatch>, RegistryError> {
        Ok(self
            .load()?
            .into_iter()
            .enumerate()
            .map(|(i, record)| ListedPatch {
                position: Position::from_index(i),
                record,
            })
            .collect())
    }

    /// Remove the record at a caller-supplied position.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidPosition`] when `position` is not a
    /// number, is below 1, or exceeds the record count. Nothing is written
    /// in that case.
    pub fn remove_at(&self, position: &str) -> Result<PatchRecord, RegistryError> {
        let position = parse_position(position)?;
        self.remove(position)
    }

    /// Remove the record at `position`.
    pub fn remove(&self, position: Position) -> Result<PatchRecord, RegistryError> {
        let _lock = StoreLock::acquire(&self.paths)?;

        let mut records = self.load()?;
        Self::check_range(position, records.len())?;
        let removed = records.remove(position.index());
        self.save(&records)?;

        Ok(removed)
    }

    /// Discard every record.
    ///
    /// The index is overwritten with an empty list without being read, so
    /// this also recovers from a corrupt index. Blobs are kept.
    pub fn clear(&self) -> Result<(), RegistryError> {
        let _lock = StoreLock::acquire(&self.paths)?;
        self.save(&[])
    }

    /// The message of every record, in order.
    pub fn preview(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.load()?.into_iter().map(|r| r.message).collect())
    }

    /// The message of every record, in order.
    ///
    /// Currently identical to [`Registry::preview`].
    pub fn snapshot(&self) -> Result<Vec<String>, RegistryError> {
        self.preview()
    }

    /// Resolve a position and read the blob its record references.
    pub fn show(&self, position: &str) -> Result<(ListedPatch, Vec<u8>), RegistryError> {
        let position = parse_position(position)?;

        let mut records = self.load()?;
        Self::check_range(position, records.len())?;
        let record = records.swap_remove(position.index());

        let digest = record.blob.as_ref().ok_or(RegistryError::NoBlob(position))?;
        let content = self.blobs.get(digest)?;

        Ok((ListedPatch { position, record }, content))
    }

    /// Verify that every record's blob exists and matches its digest.
    ///
    /// Read-only: problems are reported, never repaired.
    pub fn check(&self) -> Result<Vec<CheckIssue>, RegistryError> {
        let mut issues = Vec::new();
        for entry in self.list()? {
            let position = entry.position;
            let Some(digest) = entry.record.blob else {
                issues.push(CheckIssue::Unreferenced { position });
                continue;
            };
            match self.blobs.verify(&digest)? {
                BlobStatus::Ok => {}
                BlobStatus::Missing => issues.push(CheckIssue::MissingBlob { position, digest }),
                BlobStatus::Corrupt { actual } => issues.push(CheckIssue::CorruptBlob {
                    position,
                    digest,
                    actual,
                }),
            }
        }
        Ok(issues)
    }

    fn check_range(position: Position, len: usize) -> Result<(), RegistryError> {
        if position.get() > len {
            return Err(RegistryError::InvalidPosition(format!(
                "{} is out of range (registry has {} record{})",
                position,
                len,
                if len == 1 { "" } else { "s" }
            )));
        }
        Ok(())
    }

    /// Read the full index. A missing index is an empty registry.
    fn load(&self) -> Result<Vec<PatchRecord>, RegistryError> {
        let path = self.paths.index_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RegistryError::Persistence { path, source: e }),
        };

        schema::parse_index(&bytes).map_err(|e| RegistryError::CorruptIndex {
            path,
            message: e.to_string(),
        })
    }

    /// Overwrite the full index atomically (temp file, fsync, rename).
    fn save(&self, records: &[PatchRecord]) -> Result<(), RegistryError> {
        let path = self.paths.index_path();
        let temp_path = self.paths.index_temp_path();

        let contents = schema::render_index(records, self.pretty_index).map_err(|e| {
            RegistryError::Persistence {
                path: path.clone(),
                source: std::io::Error::other(e),
            }
        })?;

        let written = write_synced(&temp_path, contents.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &path).map_err(persistence(&path)));
        if written.is_err() {
            fs::remove_file(&temp_path).ok();
        }
        written
    }
}

fn write_synced(path: &Path, contents: &[u8]) -> Result<(), RegistryError> {
    let mut file = fs::File::create(path).map_err(persistence(path))?;
    file.write_all(contents).map_err(persistence(path))?;
    file.sync_all().map_err(persistence(path))
}

fn parse_position(text: &str) -> Result<Position, RegistryError> {
    Position::parse(text).map_err(|e| match e {
        TypeError::InvalidPosition(reason) | TypeError::InvalidDigest(reason) => {
            RegistryError::InvalidPosition(reason)
        }
    })
}

fn persistence(path: &Path) -> impl FnOnce(std::io::Error) -> RegistryError {
    let path = path.to_path_buf();
    move |source| RegistryError::Persistence { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry(dir: &TempDir) -> Registry {
        Registry::open(
            StorePaths::new(dir.path().to_path_buf()),
            RegistryOptions::default(),
        )
    }

    fn messages(registry: &Registry) -> Vec<String> {
        registry
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.record.message)
            .collect()
    }

    #[test]
    fn list_before_any_index_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        assert!(registry.list().unwrap().is_empty());
        assert!(!registry.paths().index_path().exists());
    }

    #[test]
    fn add_appends_in_order() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        registry.add("m1").unwrap();
        registry.add("m2").unwrap();

        let listed = registry.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].position.get(), 1);
        assert_eq!(listed[0].record.message, "m1");
        assert_eq!(listed[1].position.get(), 2);
        assert_eq!(listed[1].record.message, "m2");
        assert!(listed[0].record.timestamp <= listed[1].record.timestamp);
    }

    #[test]
    fn add_stores_blob_equal_to_message() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        let record = registry.add("fix login bug").unwrap();
        let digest = record.blob.unwrap();
        assert_eq!(digest, Digest::of(b"fix login bug"));
        assert_eq!(registry.blobs().get(&digest).unwrap(), b"fix login bug");
    }

    #[test]
    fn add_releases_lock() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        registry.add("m1").unwrap();
        let lock = StoreLock::acquire(registry.paths()).expect("lock should be free");
        assert!(lock.is_held());
    }

    #[test]
    fn add_fails_while_locked() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        let _lock = StoreLock::acquire(registry.paths()).unwrap();
        let err = registry.add("m1").unwrap_err();
        assert!(matches!(err, RegistryError::Locked));
        assert!(!registry.paths().index_path().exists());
    }

    #[test]
    fn remove_renumbers() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        registry.add("one").unwrap();
        registry.add("two").unwrap();
        registry.add("three").unwrap();

        let removed = registry.remove_at("2").unwrap();
        assert_eq!(removed.message, "two");

        let listed = registry.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].record.message, "one");
        assert_eq!(listed[1].position.get(), 2);
        assert_eq!(listed[1].record.message, "three");
    }

    #[test]
    fn invalid_positions_leave_registry_untouched() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        registry.add("one").unwrap();
        let before = fs::read(registry.paths().index_path()).unwrap();

        for bad in ["0", "2", "x", "", "-1"] {
            let err = registry.remove_at(bad).unwrap_err();
            assert!(err.is_invalid_position(), "{:?} gave {:?}", bad, err);
        }

        assert_eq!(fs::read(registry.paths().index_path()).unwrap(), before);
        assert_eq!(messages(&registry), vec!["one"]);
    }

    #[test]
    fn remove_from_empty_registry_is_invalid() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        let err = registry.remove_at("1").unwrap_err();
        assert!(err.is_invalid_position());
        assert!(!registry.paths().index_path().exists());
    }

    #[test]
    fn clear_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        registry.clear().unwrap();
        assert!(registry.list().unwrap().is_empty());

        registry.add("one").unwrap();
        registry.clear().unwrap();
        registry.clear().unwrap();
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn clear_keeps_blobs() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        let digest = registry.add("keep me").unwrap().blob.unwrap();
        registry.clear().unwrap();
        assert!(registry.blobs().contains(&digest));
    }

    #[test]
    fn clear_recovers_corrupt_index() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        fs::write(registry.paths().index_path(), "{{{").unwrap();
        registry.clear().unwrap();
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn corrupt_index_is_reported_not_emptied() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        fs::write(registry.paths().index_path(), "not json").unwrap();

        assert!(matches!(
            registry.list(),
            Err(RegistryError::CorruptIndex { .. })
        ));
        assert!(matches!(
            registry.add("m"),
            Err(RegistryError::CorruptIndex { .. })
        ));
        assert_eq!(
            fs::read_to_string(registry.paths().index_path()).unwrap(),
            "not json"
        );
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        registry.add("m").unwrap();
        assert!(registry.paths().index_path().exists());
        assert!(!registry.paths().index_temp_path().exists());
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        // a directory in the index's place makes the final rename fail
        fs::create_dir_all(registry.paths().index_path().join("blocker")).unwrap();

        let err = registry.clear().unwrap_err();
        assert!(matches!(err, RegistryError::Persistence { .. }));
        assert!(!registry.paths().index_temp_path().exists());
    }

    #[test]
    fn compact_index_option() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::open(
            StorePaths::new(temp.path().to_path_buf()),
            RegistryOptions {
                verify_blobs: false,
                pretty_index: false,
            },
        );

        registry.add("m").unwrap();
        let contents = fs::read_to_string(registry.paths().index_path()).unwrap();
        assert!(!contents.contains('\n'));
    }

    #[test]
    fn preview_and_snapshot_match() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        registry.add("a").unwrap();
        registry.add("b").unwrap();

        assert_eq!(registry.preview().unwrap(), vec!["a", "b"]);
        assert_eq!(registry.snapshot().unwrap(), registry.preview().unwrap());
    }

    #[test]
    fn show_returns_blob_content() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        registry.add("a").unwrap();
        registry.add("b").unwrap();

        let (entry, content) = registry.show("2").unwrap();
        assert_eq!(entry.position.get(), 2);
        assert_eq!(entry.record.message, "b");
        assert_eq!(content, b"b");
        assert!(registry.show("3").unwrap_err().is_invalid_position());
    }

    #[test]
    fn show_legacy_record_has_no_blob() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        fs::write(
            registry.paths().index_path(),
            r#"[{"message":"old","timestamp":"2024-05-01T12:30:00.000Z"}]"#,
        )
        .unwrap();

        assert!(matches!(
            registry.show("1"),
            Err(RegistryError::NoBlob(_))
        ));
    }

    #[test]
    fn check_reports_missing_and_corrupt_blobs() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        let a = registry.add("a").unwrap().blob.unwrap();
        let b = registry.add("b").unwrap().blob.unwrap();
        registry.add("c").unwrap();

        fs::remove_file(registry.blobs().path_for(&a)).unwrap();
        fs::write(registry.blobs().path_for(&b), "z").unwrap();

        let issues = registry.check().unwrap();
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            &issues[0],
            CheckIssue::MissingBlob { position, .. } if position.get() == 1
        ));
        assert!(matches!(
            &issues[1],
            CheckIssue::CorruptBlob { position, actual, .. }
                if position.get() == 2 && *actual == Digest::of(b"z")
        ));
    }

    #[test]
    fn check_clean_registry() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        registry.add("a").unwrap();
        assert!(registry.check().unwrap().is_empty());
    }

    #[test]
    fn lock_error_mapping() {
        assert!(matches!(
            RegistryError::from(LockError::AlreadyLocked),
            RegistryError::Locked
        ));
        assert!(matches!(
            RegistryError::from(LockError::CreateFailed("x".into())),
            RegistryError::Lock(_)
        ));
    }
}
