use crate::error::FolioResult;
use crate::settings::Settings;
use crate::store::SettingsStore;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::path::Path;

/// Settings kept as a single JSON row in a SQLite database.
pub struct SqliteStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) `.folio.db` inside `dir`.
    pub async fn new(dir: &Path) -> FolioResult<Self> {
        let db_path = dir.join(".folio.db");
        let connection_path = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePool::connect(&connection_path).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                data TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await?;

        Ok(SqliteStore { pool })
    }
}

#[async_trait]
impl SettingsStore for SqliteStore {
    async fn load(&self) -> FolioResult<Option<serde_json::Value>> {
        let row = sqlx::query("SELECT data FROM settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let data: String = row.get(0);
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, settings: &Settings) -> FolioResult<()> {
        let data = serde_json::to_string(settings)?;
        sqlx::query(
            "INSERT OR REPLACE INTO settings (id, data, updated_at)
            VALUES (1, ?, CURRENT_TIMESTAMP)",
        )
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
