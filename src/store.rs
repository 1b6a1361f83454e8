//! Persistence for the [`Settings`] record.
//!
//! Stores hand back the raw stored record so it can be migrated before it is
//! parsed; see [`Settings::from_stored`].

pub mod json;
pub mod sqlite;

use crate::error::FolioResult;
use crate::settings::Settings;
use async_trait::async_trait;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the stored record, or `None` if nothing was saved yet.
    async fn load(&self) -> FolioResult<Option<serde_json::Value>>;

    async fn save(&self, settings: &Settings) -> FolioResult<()>;
}

/// Loads settings from `store`, falling back to defaults for a fresh store.
/// Records that needed migration or seeding are written back immediately.
pub async fn load_settings<S: SettingsStore + ?Sized>(store: &S) -> FolioResult<Settings> {
    let raw = store
        .load()
        .await?
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    let (settings, changed) = Settings::from_stored(raw)?;
    if changed {
        store.save(&settings).await?;
    }
    Ok(settings)
}
