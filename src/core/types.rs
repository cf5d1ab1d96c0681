//! core::types
//!
//! Strong types for patchbox domain concepts.
//!
//! # Types
//!
//! - [`Digest`] - Validated content digest (SHA-1, 40 hex chars)
//! - [`UtcTimestamp`] - ISO-8601 creation timestamp
//! - [`Position`] - 1-based registry position parsed from caller text
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use patchbox::core::types::{Digest, Position};
//!
//! let digest = Digest::of(b"fix login bug");
//! assert_eq!(digest.as_str().len(), 40);
//!
//! assert!(Position::parse("2").is_ok());
//! assert!(Position::parse("x").is_err());
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha1::{Digest as _, Sha1};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),
}

/// A content digest: the lowercase hex SHA-1 of a byte sequence.
///
/// Two blobs with equal digests are assumed to hold equal bytes.
///
/// # Example
///
/// ```
/// use patchbox::core::types::Digest;
///
/// let digest = Digest::of(b"");
/// assert_eq!(digest.as_str(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
/// assert_eq!(digest.shard(), "da");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Length of a digest in hex characters.
    pub const HEX_LEN: usize = 40;

    /// Number of leading hex characters that name a shard directory.
    pub const SHARD_LEN: usize = 2;

    /// Compute the digest of the exact byte sequence given.
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);
        Self(hex::encode(hasher.finalize()))
    }

    /// Create a digest from existing hex text.
    ///
    /// The text is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidDigest` if the text is not 40 hex characters.
    pub fn new(text: impl Into<String>) -> Result<Self, TypeError> {
        let text = text.into().to_ascii_lowercase();
        Self::validate(&text)?;
        Ok(Self(text))
    }

    fn validate(text: &str) -> Result<(), TypeError> {
        if text.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidDigest(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                text.len()
            )));
        }
        if !text.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidDigest(
                "digest must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// The shard directory name for this digest.
    pub fn shard(&self) -> &str {
        &self.0[..Self::SHARD_LEN]
    }

    /// Get the digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Digest {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC timestamp, persisted as ISO-8601 text.
///
/// # Example
///
/// ```
/// use patchbox::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// assert!(now.to_string().ends_with('Z'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtcTimestamp(DateTime<Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// A 1-based position in the registry.
///
/// Positions are a view over the current record order, not an identity:
/// removing a record shifts every later record down by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(usize);

impl Position {
    /// Create a position from a 1-based number.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPosition` for zero.
    pub fn new(n: usize) -> Result<Self, TypeError> {
        if n == 0 {
            return Err(TypeError::InvalidPosition("positions start at 1".into()));
        }
        Ok(Self(n))
    }

    /// Parse a position from caller-supplied text.
    ///
    /// Surrounding whitespace is ignored. Anything other than a plain
    /// decimal number of at least 1 is rejected.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(TypeError::InvalidPosition(format!("'{}' is not a number", text)));
        }
        let n = trimmed
            .parse::<usize>()
            .map_err(|e| TypeError::InvalidPosition(format!("'{}': {}", text, e)))?;
        Self::new(n)
    }

    /// Build the position of a 0-based array index.
    pub fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    /// The 1-based number.
    pub fn get(&self) -> usize {
        self.0
    }

    /// The 0-based array index.
    pub fn index(&self) -> usize {
        self.0 - 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod digest {
        use super::*;

        #[test]
        fn known_vector() {
            let digest = Digest::of(b"abc");
            assert_eq!(digest.as_str(), "a9993e364706816aba3e25717850c26c9cd0d89d");
        }

        #[test]
        fn same_bytes_same_digest() {
            assert_eq!(Digest::of(b"fix login bug"), Digest::of(b"fix login bug"));
            assert_ne!(Digest::of(b"fix login bug"), Digest::of(b"fix login bug "));
        }

        #[test]
        fn new_lowercases() {
            let digest = Digest::new("A9993E364706816ABA3E25717850C26C9CD0D89D").unwrap();
            assert_eq!(digest.as_str(), "a9993e364706816aba3e25717850c26c9cd0d89d");
        }

        #[test]
        fn wrong_length_rejected() {
            assert!(Digest::new("abc").is_err());
            assert!(Digest::new("a".repeat(64)).is_err());
        }

        #[test]
        fn non_hex_rejected() {
            assert!(Digest::new("g".repeat(40)).is_err());
        }

        #[test]
        fn shard_is_prefix() {
            let digest = Digest::of(b"abc");
            assert_eq!(digest.shard(), "a9");
        }

        #[test]
        fn serde_as_plain_string() {
            let digest = Digest::of(b"abc");
            let json = serde_json::to_string(&digest).unwrap();
            assert_eq!(json, "\"a9993e364706816aba3e25717850c26c9cd0d89d\"");
            let parsed: Digest = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, digest);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<Digest, _> = serde_json::from_str("\"nope\"");
            assert!(result.is_err());
        }
    }

    mod timestamp {
        use super::*;
        use chrono::TimeZone;

        #[test]
        fn display_uses_millis_and_z() {
            let dt = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
            let ts = UtcTimestamp::from_datetime(dt);
            assert_eq!(ts.to_string(), "2024-05-01T12:30:00.000Z");
        }

        #[test]
        fn parses_javascript_iso_strings() {
            let ts: UtcTimestamp = serde_json::from_str("\"2024-05-01T12:30:00.123Z\"").unwrap();
            assert_eq!(ts.to_string(), "2024-05-01T12:30:00.123Z");
        }
    }

    mod position {
        use super::*;

        #[test]
        fn valid_positions() {
            assert_eq!(Position::parse("1").unwrap().get(), 1);
            assert_eq!(Position::parse(" 3 ").unwrap().index(), 2);
        }

        #[test]
        fn zero_rejected() {
            assert!(Position::parse("0").is_err());
            assert!(Position::new(0).is_err());
        }

        #[test]
        fn non_numeric_rejected() {
            assert!(Position::parse("x").is_err());
            assert!(Position::parse("").is_err());
            assert!(Position::parse("-1").is_err());
            assert!(Position::parse("2abc").is_err());
            assert!(Position::parse("1.5").is_err());
        }

        #[test]
        fn overflow_rejected() {
            assert!(Position::parse("99999999999999999999999999").is_err());
        }

        #[test]
        fn from_index_is_one_based() {
            assert_eq!(Position::from_index(0).get(), 1);
            assert_eq!(Position::from_index(4).to_string(), "5");
        }
    }
}
