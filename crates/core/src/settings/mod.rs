//! Generic key/value settings and the per-user ad cooldown gate.

mod sqlite;

pub use sqlite::SqliteSettingsStore;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::catalog::CatalogError;

/// Default minimum gap between two ads shown to the same user.
pub const DEFAULT_AD_COOLDOWN_SECS: u64 = 3600;

/// Trait for settings and cooldown storage.
pub trait SettingsStore: Send + Sync {
    /// Raw stored value, `None` if the key was never written.
    fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>, CatalogError>;

    /// Create or overwrite a setting.
    fn set_value(&self, key: &str, value: &serde_json::Value) -> Result<(), CatalogError>;

    /// Whether more than `window` has passed since the user's last ad.
    /// True when the user never saw one.
    fn cooldown_elapsed(
        &self,
        user_id: i64,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<bool, CatalogError>;

    /// Record that an ad was shown to the user at `now`.
    fn touch_cooldown(&self, user_id: i64, now: DateTime<Utc>) -> Result<(), CatalogError>;
}

/// Typed access on top of [`SettingsStore`].
pub trait SettingsStoreExt: SettingsStore {
    /// Decode a setting, falling back to `default` when it is absent or
    /// holds a value of another shape.
    fn get_setting<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, CatalogError> {
        let Some(value) = self.get_value(key)? else {
            return Ok(default);
        };

        match serde_json::from_value(value) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                warn!(key, error = %e, "stored setting has unexpected shape, using default");
                Ok(default)
            }
        }
    }

    fn set_setting<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CatalogError> {
        let value =
            serde_json::to_value(value).map_err(|e| CatalogError::Internal(e.to_string()))?;
        self.set_value(key, &value)
    }
}

impl<S: SettingsStore + ?Sized> SettingsStoreExt for S {}
