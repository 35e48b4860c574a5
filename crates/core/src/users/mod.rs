//! Known users. Only used for existence checks and admin statistics.

mod sqlite;

pub use sqlite::SqliteUserStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// User as reported by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub first_name: String,
    pub username: Option<String>,
    /// Time of the last registration.
    pub joined_at: DateTime<Utc>,
}

/// Trait for user storage.
pub trait UserStore: Send + Sync {
    /// Insert or refresh a user. Names and `joined_at` are overwritten.
    fn register(&self, profile: &UserProfile, at: DateTime<Utc>) -> Result<UserRecord, CatalogError>;

    fn exists(&self, user_id: i64) -> Result<bool, CatalogError>;

    fn get(&self, user_id: i64) -> Result<Option<UserRecord>, CatalogError>;

    fn count(&self) -> Result<u64, CatalogError>;
}
