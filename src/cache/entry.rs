//! The persisted users cache entry and its wire format
//!
//! The entry is stored as a single JSON string:
//! `{"timestamp": <ms since epoch>, "data": [<User>, ...]}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::User;

/// Fixed key the users entry is stored under
pub const CACHE_KEY: &str = "usersCache";

/// How long a cache entry counts as fresh, in milliseconds
pub const CACHE_TTL_MS: i64 = 60_000;

/// Errors that can occur when decoding a persisted cache entry
#[derive(Debug, Error)]
pub enum CacheParseError {
    /// The value is not JSON of the expected shape
    #[error("Malformed cache entry: {0}")]
    Json(#[from] serde_json::Error),

    /// The timestamp predates the epoch
    #[error("Invalid cache timestamp: {0}")]
    NegativeTimestamp(i64),
}

/// A snapshot of the user list as last fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Write time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Users in server order
    pub data: Vec<User>,
}

impl CacheEntry {
    /// Creates an entry stamped with `timestamp`
    pub fn new(timestamp: i64, data: Vec<User>) -> Self {
        Self { timestamp, data }
    }

    /// Milliseconds elapsed between the write and `now`
    pub fn age_ms(&self, now: i64) -> i64 {
        now.saturating_sub(self.timestamp)
    }

    /// Whether the entry is still inside the freshness window at `now`
    pub fn is_fresh_at(&self, now: i64) -> bool {
        self.age_ms(now) < CACHE_TTL_MS
    }

    /// Encodes the entry into its persisted form
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decodes a persisted value into a `CacheEntry`
///
/// Anything that is not an object with an integer `timestamp` and an array of
/// well-formed users under `data` is rejected.
pub fn parse_cache_entry(raw: &str) -> Result<CacheEntry, CacheParseError> {
    let entry: CacheEntry = serde_json::from_str(raw)?;
    if entry.timestamp < 0 {
        return Err(CacheParseError::NegativeTimestamp(entry.timestamp));
    }
    Ok(entry)
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
