//! Cache module for persisting the user list
//!
//! Provides the string stores the cache lives in and the single users entry
//! format written to them. Freshness is judged against a fixed TTL; anything
//! that fails to decode is treated by callers as absent.

mod entry;
mod store;

pub use entry::{
    now_millis, parse_cache_entry, CacheEntry, CacheParseError, CACHE_KEY, CACHE_TTL_MS,
};
pub use store::{CacheStore, FileStore, MemoryStore, StoreError};
