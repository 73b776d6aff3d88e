//! Identifier newtypes: record ids and actor ids.
//!
//! Record ids are minted client-side at create time as
//! `dk-<millis-base36><4-char suffix>`. The random suffix exists because
//! wall-clock time alone is not a safe uniqueness source: two creates in the
//! same millisecond must still receive distinct ids. The store additionally
//! re-mints on the (rare) collision against its live collection.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix carried by every minted record id.
pub const ID_PREFIX: &str = "dk-";

const SUFFIX_LEN: usize = 4;
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque unique identifier for a registry record.
///
/// Assigned once at create time and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a trusted string without validation.
    ///
    /// Use for ids that already passed through [`RecordId::parse`] or were
    /// minted by this crate; test fixtures use it with short literals.
    #[must_use]
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse an id from untrusted input (CLI arguments, vault files).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRecordId`] when the input is empty or contains
    /// whitespace. The `dk-` prefix is not required: vaults migrated from
    /// other systems may carry foreign id schemes.
    pub fn parse(raw: &str) -> Result<Self, InvalidRecordId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidRecordId {
                raw: raw.to_string(),
                reason: "id is empty",
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidRecordId {
                raw: raw.to_string(),
                reason: "id contains whitespace",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Mint a fresh id from the current wall clock and a random suffix.
    #[must_use]
    pub fn mint() -> Self {
        let now_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        Self::mint_at(now_ms, &mut rand::thread_rng())
    }

    /// Mint from an explicit timestamp and RNG. Deterministic inputs make
    /// collision behavior testable.
    #[must_use]
    pub fn mint_at(now_ms: u64, rng: &mut impl Rng) -> Self {
        let mut id = String::from(ID_PREFIX);
        id.push_str(&to_base36(now_ms));
        for _ in 0..SUFFIX_LEN {
            let idx = rng.gen_range(0..SUFFIX_ALPHABET.len());
            id.push(char::from(SUFFIX_ALPHABET[idx]));
        }
        Self(id)
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Default for RecordId {
    /// The empty placeholder id carried by drafts before `create` mints one.
    fn default() -> Self {
        Self(String::new())
    }
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(SUFFIX_ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Error returned when parsing an invalid record id string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecordId {
    pub raw: String,
    pub reason: &'static str,
}

impl fmt::Display for InvalidRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid record id '{}': {}", self.raw, self.reason)
    }
}

impl std::error::Error for InvalidRecordId {}

/// Identifier of the user performing an operation.
///
/// Supplied by the caller on every mutating store operation; the core never
/// resolves identity itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
