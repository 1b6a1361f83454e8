mod common;

use common::Fixture;
use folio_core::error::FolioError;
use folio_core::order::OrderTable;
use folio_core::settings::{OutputTarget, Settings};
use folio_core::store::{JsonFileStore, SettingsStore, SqliteStore, load_settings};
use folio_core::workspace::Workspace;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn fresh_store_seeds_default_statuses() -> Result<(), FolioError> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path().join("settings.json"));

    let settings = load_settings(&store).await?;
    let names: Vec<_> = settings.statuses.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["idea", "writing", "done", "on-hold"]);
    assert_eq!(settings.completion_status_name, "done");
    assert_eq!(settings.default_status(), "idea");

    // Seeding is written back straight away.
    assert!(store.path().exists());
    Ok(())
}

#[tokio::test]
async fn json_store_round_trips() -> Result<(), FolioError> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path().join("nested").join("settings.json"));

    let mut settings = Settings::default();
    settings.ensure_default_statuses();
    settings.compile_output_path = OutputTarget::AskEveryTime;
    settings
        .order
        .set_order(OrderTable::Files, "Book", vec!["Book/b.md".into(), "Book/a.md".into()]);
    store.save(&settings).await?;

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path())?)?;
    assert_eq!(raw["compileOutputPath"], "ASK_EVERY_TIME");
    assert_eq!(raw["fileOrder"]["Book"], json!(["Book/b.md", "Book/a.md"]));

    assert_eq!(load_settings(&store).await?, settings);
    Ok(())
}

#[tokio::test]
async fn sqlite_store_round_trips() -> Result<(), FolioError> {
    let dir = TempDir::new()?;
    let store = SqliteStore::new(dir.path()).await?;
    assert!(store.load().await?.is_none());

    let mut settings = load_settings(&store).await?;
    settings.include_subfolder_files = true;
    settings.add_status("revising", "var(--color-orange)")?;
    store.save(&settings).await?;

    let reopened = SqliteStore::new(dir.path()).await?;
    let loaded = load_settings(&reopened).await?;
    assert!(loaded.include_subfolder_files);
    assert!(loaded.status("revising").is_some());
    assert!(dir.path().join(".folio.db").exists());
    Ok(())
}

#[tokio::test]
async fn legacy_records_are_migrated_and_saved() -> Result<(), FolioError> {
    let dir = TempDir::new()?;
    let store = JsonFileStore::new(dir.path().join("settings.json"));
    fs::write(
        store.path(),
        json!({
            "enableFolderSummaryNotes": false,
            "folderSummaryNoteFilename": "_{{folder_name}}.md",
            "displayableFields": ["pov", "location"],
            "subtitleField": "summary",
            "coreInfoField": "status",
            "statuses": [{ "key": "draft", "name": "draft", "color": "red" }],
            "completionStatusName": "draft"
        })
        .to_string(),
    )?;

    let settings = load_settings(&store).await?;
    assert!(!settings.enable_folder_representative_notes);
    assert_eq!(settings.folder_representative_note_filename, "_{{folder_name}}.md");
    let fields: Vec<_> = settings
        .metadata_fields
        .iter()
        .map(|f| (f.name.as_str(), f.is_tagline))
        .collect();
    assert_eq!(fields, vec![("pov", false), ("location", false), ("summary", true)]);
    // Existing statuses are not reseeded.
    assert_eq!(settings.statuses.len(), 1);

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path())?)?;
    assert!(saved.get("displayableFields").is_none());
    assert!(saved.get("coreInfoField").is_none());
    assert!(saved.get("enableFolderSummaryNotes").is_none());
    Ok(())
}

#[test]
fn renaming_a_status_carries_the_completion_name() -> Result<(), FolioError> {
    let mut settings = Settings::default();
    settings.ensure_default_statuses();

    settings.rename_status("done", "finished")?;
    assert_eq!(settings.completion_status_name, "finished");
    assert!(settings.status("done").is_none());

    let err = settings.rename_status("idea", "writing").unwrap_err();
    assert!(matches!(err, FolioError::DuplicateStatus(ref n) if n == "writing"));
    assert!(matches!(
        settings.add_status("finished", "green"),
        Err(FolioError::DuplicateStatus(_))
    ));
    assert!(matches!(
        settings.remove_status("missing"),
        Err(FolioError::UnknownStatus(_))
    ));
    Ok(())
}

#[test]
fn at_most_one_tagline() -> Result<(), FolioError> {
    let mut settings = Settings::default();
    settings.add_field("pov");
    settings.add_field("location");

    settings.toggle_tagline(2)?;
    let taglines: Vec<_> = settings.metadata_fields.iter().filter(|f| f.is_tagline).collect();
    assert_eq!(taglines.len(), 1);
    assert_eq!(settings.tagline_field().map(|f| f.name.as_str()), Some("location"));

    settings.toggle_tagline(2)?;
    assert!(settings.tagline_field().is_none());
    assert_eq!(settings.labelled_fields().count(), 3);

    assert!(matches!(settings.toggle_tagline(7), Err(FolioError::UnknownField(7))));
    Ok(())
}

#[tokio::test]
async fn unusable_store_or_rejected_change_commits_nothing() -> Result<(), FolioError> {
    let fx = Fixture::new();
    let blocker = fx.config_dir.path().join("blocker");
    fs::write(&blocker, "not a directory")?;
    let store = JsonFileStore::new(blocker.join("settings.json"));

    assert!(Workspace::open(&fx.vault, &fx.vault, &store).await.is_err());

    let mut ws = Workspace::open(&fx.vault, &fx.vault, &fx.store).await?;
    let before = ws.settings().clone();
    let err = ws
        .update(|s| {
            s.include_subfolder_files = true;
            Err::<(), _>(FolioError::Other("rejected".into()))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FolioError::Other(_)));
    assert_eq!(ws.settings(), &before);
    Ok(())
}
