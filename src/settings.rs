//! Persisted configuration.
//!
//! Everything the core persists lives in one [`Settings`] record: selection
//! state, compilation options, status and field definitions, and both order
//! tables. The record keeps camelCase keys and carries unknown
//! keys through untouched.

pub mod migrate;

use crate::domain::{MetadataFieldDefinition, StatusDefinition, join};
use crate::error::{FolioError, FolioResult};
use crate::order::OrderIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Sentinel stored in place of a folder when the output folder is chosen per
/// compilation.
pub const ASK_EVERY_TIME: &str = "ASK_EVERY_TIME";

/// Placeholder replaced by a folder's name when resolving its representative
/// note.
pub const FOLDER_NAME_PLACEHOLDER: &str = "{{folder_name}}";

/// Where compiled documents are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputTarget {
    Folder(String),
    AskEveryTime,
}

impl From<String> for OutputTarget {
    fn from(value: String) -> Self {
        if value == ASK_EVERY_TIME {
            OutputTarget::AskEveryTime
        } else {
            OutputTarget::Folder(value)
        }
    }
}

impl From<OutputTarget> for String {
    fn from(value: OutputTarget) -> Self {
        match value {
            OutputTarget::Folder(path) => path,
            OutputTarget::AskEveryTime => ASK_EVERY_TIME.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub base_folder_path: String,
    pub current_folder_path: String,
    pub compile_output_path: OutputTarget,
    pub include_subfolder_files: bool,
    pub enable_folder_representative_notes: bool,
    pub folder_representative_note_filename: String,
    #[serde(flatten)]
    pub order: OrderIndex,
    pub statuses: Vec<StatusDefinition>,
    pub completion_status_name: String,
    pub metadata_fields: Vec<MetadataFieldDefinition>,
    /// Keys this crate does not interpret, such as layout preferences of the
    /// host's UI.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_folder_path: "/".to_owned(),
            current_folder_path: "/".to_owned(),
            compile_output_path: OutputTarget::Folder("/".to_owned()),
            include_subfolder_files: false,
            enable_folder_representative_notes: true,
            folder_representative_note_filename: format!("{FOLDER_NAME_PLACEHOLDER}.md"),
            order: OrderIndex::default(),
            statuses: Vec::new(),
            completion_status_name: String::new(),
            metadata_fields: vec![MetadataFieldDefinition {
                name: "tagline".to_owned(),
                is_tagline: true,
            }],
            extra: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Parses a stored record, upgrading legacy keys first. The flag reports
    /// whether anything was changed and should be saved back.
    pub fn from_stored(mut raw: serde_json::Value) -> FolioResult<(Self, bool)> {
        let migrated = migrate::migrate(&mut raw);
        let mut settings: Settings = serde_json::from_value(raw)?;
        let seeded = settings.ensure_default_statuses();
        let normalized = settings.normalize_taglines();
        Ok((settings, migrated || seeded || normalized))
    }

    /// Seeds the stock statuses when none are defined.
    pub fn ensure_default_statuses(&mut self) -> bool {
        if !self.statuses.is_empty() {
            return false;
        }
        self.statuses = [
            ("idea", "idea", "var(--color-purple)"),
            ("writing", "writing", "var(--color-blue)"),
            ("done", "done", "var(--color-green)"),
            ("on-hold", "on-hold", "var(--text-muted)"),
        ]
        .into_iter()
        .map(|(key, name, color)| StatusDefinition {
            key: key.to_owned(),
            name: name.to_owned(),
            color: color.to_owned(),
        })
        .collect();
        self.completion_status_name = "done".to_owned();
        true
    }

    /// Status assumed for items that do not carry one.
    pub fn default_status(&self) -> &str {
        self.statuses.first().map_or("", |s| s.name.as_str())
    }

    pub fn status(&self, name: &str) -> Option<&StatusDefinition> {
        self.statuses.iter().find(|s| s.name == name)
    }

    pub fn add_status(&mut self, name: &str, color: &str) -> FolioResult<&StatusDefinition> {
        let name = name.trim();
        if self.status(name).is_some() {
            return Err(FolioError::DuplicateStatus(name.to_owned()));
        }
        self.statuses.push(StatusDefinition {
            key: format!("custom-{}", Uuid::new_v4()),
            name: name.to_owned(),
            color: color.to_owned(),
        });
        Ok(&self.statuses[self.statuses.len() - 1])
    }

    /// Renames the status identified by `key`.
    ///
    /// The completion status follows the rename. Items already marked with
    /// the old name keep it.
    pub fn rename_status(&mut self, key: &str, new_name: &str) -> FolioResult<()> {
        let new_name = new_name.trim();
        let index = self.status_index(key)?;
        if self
            .statuses
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.name == new_name)
        {
            return Err(FolioError::DuplicateStatus(new_name.to_owned()));
        }

        let old_name = std::mem::replace(&mut self.statuses[index].name, new_name.to_owned());
        if self.completion_status_name == old_name {
            self.completion_status_name = new_name.to_owned();
        }
        Ok(())
    }

    pub fn recolor_status(&mut self, key: &str, color: &str) -> FolioResult<()> {
        let index = self.status_index(key)?;
        self.statuses[index].color = color.to_owned();
        Ok(())
    }

    pub fn remove_status(&mut self, key: &str) -> FolioResult<StatusDefinition> {
        let index = self.status_index(key)?;
        Ok(self.statuses.remove(index))
    }

    fn status_index(&self, key: &str) -> FolioResult<usize> {
        self.statuses
            .iter()
            .position(|s| s.key == key)
            .ok_or_else(|| FolioError::UnknownStatus(key.to_owned()))
    }

    pub fn add_field(&mut self, name: &str) {
        self.metadata_fields.push(MetadataFieldDefinition {
            name: name.trim().to_owned(),
            is_tagline: false,
        });
    }

    pub fn rename_field(&mut self, index: usize, name: &str) -> FolioResult<()> {
        let field = self
            .metadata_fields
            .get_mut(index)
            .ok_or(FolioError::UnknownField(index))?;
        field.name = name.trim().to_owned();
        Ok(())
    }

    /// Makes the field at `index` the tagline, or clears it if it already is.
    /// At most one field is ever the tagline.
    pub fn toggle_tagline(&mut self, index: usize) -> FolioResult<()> {
        let was_tagline = self
            .metadata_fields
            .get(index)
            .ok_or(FolioError::UnknownField(index))?
            .is_tagline;
        for field in &mut self.metadata_fields {
            field.is_tagline = false;
        }
        self.metadata_fields[index].is_tagline = !was_tagline;
        Ok(())
    }

    pub fn remove_field(&mut self, index: usize) -> FolioResult<MetadataFieldDefinition> {
        if index >= self.metadata_fields.len() {
            return Err(FolioError::UnknownField(index));
        }
        Ok(self.metadata_fields.remove(index))
    }

    pub fn tagline_field(&self) -> Option<&MetadataFieldDefinition> {
        self.metadata_fields.iter().find(|f| f.is_tagline)
    }

    /// Fields shown with a label, in configured order.
    pub fn labelled_fields(&self) -> impl Iterator<Item = &MetadataFieldDefinition> {
        self.metadata_fields.iter().filter(|f| !f.is_tagline)
    }

    fn normalize_taglines(&mut self) -> bool {
        let mut seen = false;
        let mut changed = false;
        for field in &mut self.metadata_fields {
            if field.is_tagline {
                if seen {
                    field.is_tagline = false;
                    changed = true;
                }
                seen = true;
            }
        }
        changed
    }

    /// Pattern used to locate representative notes, or `None` when the
    /// feature is switched off.
    pub fn representative_pattern(&self) -> Option<&str> {
        if !self.enable_folder_representative_notes {
            return None;
        }
        if self.folder_representative_note_filename.is_empty() {
            Some("{{folder_name}}.md")
        } else {
            Some(&self.folder_representative_note_filename)
        }
    }
}

/// Path of the representative note for the folder at `container_path`.
pub fn representative_path(pattern: &str, container_path: &str, container_name: &str) -> String {
    let filename = pattern.replacen(FOLDER_NAME_PLACEHOLDER, container_name, 1);
    join(container_path, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_target_round_trips_sentinel() {
        let json = serde_json::to_value(OutputTarget::AskEveryTime).unwrap();
        assert_eq!(json, serde_json::json!("ASK_EVERY_TIME"));
        let parsed: OutputTarget = serde_json::from_value(serde_json::json!("Drafts")).unwrap();
        assert_eq!(parsed, OutputTarget::Folder("Drafts".into()));
    }

    #[test]
    fn representative_path_uses_folder_name() {
        assert_eq!(representative_path("{{folder_name}}.md", "Book/Part", "Part"), "Book/Part/Part.md");
        assert_eq!(representative_path("_{{folder_name}}.md", "/", "Vault"), "_Vault.md");
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let raw = serde_json::json!({ "paneLayout": "right-to-left", "fileOrder": { "/": ["a.md"] } });
        let (settings, _) = Settings::from_stored(raw).unwrap();
        let saved = serde_json::to_value(&settings).unwrap();
        assert_eq!(saved["paneLayout"], "right-to-left");
        assert_eq!(saved["fileOrder"]["/"][0], "a.md");
        assert!(saved.get("order").is_none());
    }
}
