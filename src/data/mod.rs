//! Core data model for the user directory
//!
//! Contains the `User` record returned by the remote user service and the
//! client used to fetch it.

pub mod users;

pub use users::{FetchError, UserSource, UsersClient, DEFAULT_ENDPOINT, LOAD_FAILED_MESSAGE};

use serde::{Deserialize, Serialize};

/// A single user as returned by the remote user service
///
/// The service sends more fields than these (address, company, ...); they are
/// ignored on decode and never written to the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable unique identifier
    pub id: i64,
    /// Full display name
    pub name: String,
    /// Contact email address
    pub email: String,
    /// Phone number, free-form
    pub phone: String,
    /// Personal website, usually without scheme
    pub website: String,
}
