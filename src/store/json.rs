use crate::error::{FolioError, FolioResult};
use crate::settings::Settings;
use crate::store::SettingsStore;
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Settings kept as a pretty-printed JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    /// Store at `{config_dir}/folio/settings.json`.
    ///
    /// Returns [`FolioError::Other`] if the platform has no config directory.
    pub fn default_location() -> FolioResult<Self> {
        let config = dirs::config_dir()
            .ok_or_else(|| FolioError::Other("config directory not found".into()))?;
        Ok(Self::new(config.join("folio").join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes to a temporary file beside the target and renames it in place,
    /// so a crash mid-write never leaves a truncated record.
    fn write_atomic(path: &Path, data: &[u8]) -> FolioResult<()> {
        let dir = path
            .parent()
            .ok_or_else(|| FolioError::Other(format!("invalid settings path {}", path.display())))?;
        std::fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.persist(path).map_err(|e| FolioError::Io(e.error))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn load(&self) -> FolioResult<Option<serde_json::Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, settings: &Settings) -> FolioResult<()> {
        let data = serde_json::to_vec_pretty(settings)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::write_atomic(&path, &data))
            .await
            .map_err(|e| FolioError::Other(e.to_string()))?
    }
}
