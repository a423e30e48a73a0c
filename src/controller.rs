//! Cache-aside controller for the user list
//!
//! `CachedFetchController` owns the single users cache entry. A load serves
//! the entry when it is younger than `CACHE_TTL_MS` and otherwise fetches from
//! the remote source and rewrites the entry.
//!
//! Both operations take `&mut self`, so one controller never runs two loads at
//! once. Callers that share a controller across tasks serialise through their
//! own lock, which makes the last completed load win.

use tracing::{debug, info, warn};

use crate::cache::{now_millis, parse_cache_entry, CacheEntry, CacheStore, CACHE_KEY};
use crate::data::{User, UserSource};

/// Hint shown when the users came from the cache
pub const CACHE_HINT: &str = "served from cache";

/// How a `load()` call was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A fresh cache entry was served; the remote source was not contacted
    Hit { count: usize },
    /// The remote source was queried and the cache rewritten
    Fetched { count: usize },
    /// The remote fetch failed; users and cache are unchanged
    Failed { message: String },
}

/// Mediates every read and write of the users cache entry and every call to
/// the remote source
pub struct CachedFetchController<S, R> {
    store: S,
    source: R,
    users: Vec<User>,
    is_loading: bool,
    error: Option<String>,
    cache_hint: Option<String>,
}

impl<S: CacheStore, R: UserSource> CachedFetchController<S, R> {
    pub fn new(store: S, source: R) -> Self {
        Self {
            store,
            source,
            users: Vec::new(),
            is_loading: false,
            error: None,
            cache_hint: None,
        }
    }

    /// Users currently on display, in server order
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// True only while waiting on the remote source
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the last failed load, cleared when a load starts
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Set when the last load was served from the cache
    pub fn cache_hint(&self) -> Option<&str> {
        self.cache_hint.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    /// Loads users from the cache if fresh, otherwise from the remote source
    ///
    /// Never fails: a corrupt or unreadable entry counts as a miss, and a
    /// failed fetch is reported through `error()` and the returned outcome.
    pub async fn load(&mut self) -> LoadOutcome {
        match self.try_cache() {
            Some(outcome) => outcome,
            None => self.fetch_remote().await,
        }
    }

    /// First half of `load()`: serves a fresh cache entry without suspending
    ///
    /// Returns `None` on a miss and leaves `is_loading()` true until
    /// `fetch_remote()` resolves it.
    pub fn try_cache(&mut self) -> Option<LoadOutcome> {
        self.error = None;
        self.cache_hint = None;

        match self.read_fresh_entry(now_millis()) {
            Some(entry) => {
                let count = entry.data.len();
                self.users = entry.data;
                self.cache_hint = Some(CACHE_HINT.to_string());
                info!(count, "Served users from cache");
                Some(LoadOutcome::Hit { count })
            }
            None => {
                self.is_loading = true;
                None
            }
        }
    }

    /// Second half of `load()`: queries the remote source and rewrites the cache
    pub async fn fetch_remote(&mut self) -> LoadOutcome {
        self.is_loading = true;
        let outcome = match self.source.fetch_users().await {
            Ok(users) => {
                let count = users.len();
                self.write_entry(&users);
                self.users = users;
                info!(count, "Fetched users from remote source");
                LoadOutcome::Fetched { count }
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch users");
                let message = e.user_message();
                self.error = Some(message.clone());
                LoadOutcome::Failed { message }
            }
        };
        self.is_loading = false;

        outcome
    }

    /// Deletes the cache entry and clears the cache hint
    ///
    /// Leaves the displayed users and any error untouched.
    pub fn clear(&mut self) {
        if let Err(e) = self.store.delete(CACHE_KEY) {
            warn!(error = %e, "Failed to delete users cache entry");
        }
        self.cache_hint = None;
        debug!("Cleared users cache");
    }

    /// Returns the stored entry if it parses and is fresh at `now`
    fn read_fresh_entry(&self, now: i64) -> Option<CacheEntry> {
        let raw = match self.store.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Users cache miss: no entry");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read users cache, treating as miss");
                return None;
            }
        };

        let entry = match parse_cache_entry(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "Users cache entry is corrupt, treating as miss");
                return None;
            }
        };

        if entry.is_fresh_at(now) {
            Some(entry)
        } else {
            debug!(age_ms = entry.age_ms(now), "Users cache entry is stale");
            None
        }
    }

    /// Replaces the cache entry with `users` stamped now
    ///
    /// Failures are logged and dropped; the caller still gets the users.
    fn write_entry(&self, users: &[User]) {
        let entry = CacheEntry::new(now_millis(), users.to_vec());
        let json = match entry.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to encode users cache entry");
                return;
            }
        };
        if let Err(e) = self.store.set(CACHE_KEY, &json) {
            warn!(error = %e, "Failed to write users cache entry");
        }
    }
}
