use serde_json::{Map, Value, json};
use tracing::info;

/// Keys that were renamed in earlier releases, old name first.
const RENAMED_KEYS: &[(&str, &str)] = &[
    ("enableFolderSummaryNotes", "enableFolderRepresentativeNotes"),
    ("folderSummaryNoteFilename", "folderRepresentativeNoteFilename"),
    ("enableFolderNotes", "enableFolderRepresentativeNotes"),
    ("folderNoteFilename", "folderRepresentativeNoteFilename"),
];

/// Upgrades a stored record in place. Returns `true` if anything changed.
pub fn migrate(raw: &mut Value) -> bool {
    let Some(obj) = raw.as_object_mut() else {
        return false;
    };

    let mut changed = migrate_field_roles(obj);
    changed |= migrate_displayable_fields(obj);

    for (old, new) in RENAMED_KEYS {
        if let Some(value) = obj.remove(*old) {
            obj.insert((*new).to_owned(), value);
            changed = true;
        }
    }

    if changed {
        info!("migrated legacy settings record");
    }
    changed
}

/// `{name, role}` field entries become `{name, isTagline}`.
fn migrate_field_roles(obj: &mut Map<String, Value>) -> bool {
    let Some(Value::Array(fields)) = obj.get_mut("metadataFields") else {
        return false;
    };
    if !fields.iter().any(|f| f.get("role").is_some()) {
        return false;
    }

    for field in fields.iter_mut() {
        let name = field.get("name").cloned().unwrap_or(Value::String(String::new()));
        let is_tagline = field.get("role").and_then(Value::as_str) == Some("subtitle");
        *field = json!({ "name": name, "isTagline": is_tagline });
    }
    true
}

/// The old `displayableFields` list plus a separate `subtitleField` become
/// one `metadataFields` list.
fn migrate_displayable_fields(obj: &mut Map<String, Value>) -> bool {
    let Some(displayable) = obj.remove("displayableFields") else {
        return false;
    };
    let subtitle = obj
        .remove("subtitleField")
        .and_then(|v| v.as_str().map(str::to_owned));
    obj.remove("coreInfoField");

    let names: Vec<String> = displayable
        .as_array()
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_owned)).collect())
        .unwrap_or_default();

    let mut fields: Vec<Value> = names
        .iter()
        .map(|name| json!({ "name": name, "isTagline": subtitle.as_deref() == Some(name.as_str()) }))
        .collect();

    if let Some(subtitle) = subtitle.filter(|s| !s.is_empty() && s != "none") {
        if !names.contains(&subtitle) {
            fields.push(json!({ "name": subtitle, "isTagline": true }));
        }
    }

    obj.insert("metadataFields".to_owned(), Value::Array(fields));
    true
}
