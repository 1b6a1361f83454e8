use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::fmt;

/// Path of the vault root container.
pub const ROOT_PATH: &str = "/";

/// Extension that marks an item as a document.
pub const DOCUMENT_EXTENSION: &str = "md";

/// A folder in the host's file tree, addressed by its vault path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Container {
    pub path: String,
    pub name: String,
}

impl Container {
    /// Builds a container from its vault path. The root container takes the
    /// name the host gives the whole vault.
    pub fn new(path: &str, root_name: &str) -> Self {
        let path = normalize(path);
        let name = if path == ROOT_PATH {
            root_name.to_owned()
        } else {
            file_name(&path).to_owned()
        };
        Container { path, name }
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }
}

/// A file in the host's file tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    pub path: String,
    pub basename: String,
    pub extension: String,
}

impl Item {
    pub fn from_path(path: &str) -> Self {
        let path = normalize(path);
        let name = file_name(&path);
        let (basename, extension) = match name.rfind('.') {
            Some(dot) if dot > 0 => (&name[..dot], &name[dot + 1..]),
            _ => (name, ""),
        };
        Item {
            basename: basename.to_owned(),
            extension: extension.to_owned(),
            path,
        }
    }

    /// File name including its extension.
    pub fn name(&self) -> &str {
        file_name(&self.path)
    }

    pub fn is_document(&self) -> bool {
        self.extension == DOCUMENT_EXTENSION
    }

    pub fn parent_path(&self) -> String {
        parent_path(&self.path)
    }
}

/// Either side of the file tree, as carried by change notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Container(Container),
    Item(Item),
}

impl Entry {
    pub fn path(&self) -> &str {
        match self {
            Entry::Container(c) => &c.path,
            Entry::Item(i) => &i.path,
        }
    }
}

/// A single frontmatter value.
///
/// Strings, numbers and booleans are understood by the core; anything else
/// (lists, nested maps, null) is carried through untouched so a rewrite of
/// one field never loses another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Values that count as "no value": writing one removes the field.
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.as_f64() == Some(0.0),
            FieldValue::Flag(b) => !b,
            FieldValue::Other(v) => v.is_null(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Flag(b) => write!(f, "{b}"),
            FieldValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Key/value record parsed from an item's leading metadata block, in the
/// order the keys appear in the document.
pub type Frontmatter = IndexMap<String, FieldValue>;

/// Frontmatter key holding an item's status.
pub const STATUS_FIELD: &str = "status";

/// Derived view of an item's metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataRecord {
    pub status: String,
    pub properties: Frontmatter,
}

impl MetadataRecord {
    pub fn property(&self, field: &str) -> Option<&FieldValue> {
        self.properties.get(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDefinition {
    pub key: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataFieldDefinition {
    pub name: String,
    #[serde(default)]
    pub is_tagline: bool,
}

/// Collapses `""`, `"/"` and surrounding slashes so every vault path has a
/// single spelling.
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Last path component.
pub fn file_name(path: &str) -> &str {
    if path == ROOT_PATH {
        return "";
    }
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

pub fn parent_path(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) if idx > 0 => path[..idx].to_owned(),
        _ => ROOT_PATH.to_owned(),
    }
}

pub fn join(container: &str, name: &str) -> String {
    if container == ROOT_PATH {
        name.to_owned()
    } else {
        format!("{container}/{name}")
    }
}

/// True if `path` is `ancestor` itself or lies anywhere beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor == ROOT_PATH {
        return true;
    }
    path == ancestor
        || (path.len() > ancestor.len()
            && path.starts_with(ancestor)
            && path.as_bytes()[ancestor.len()] == b'/')
}

/// Rewrites the `old` prefix of `path` to `new`. Paths outside `old` are
/// returned as `None`.
pub fn rebase(path: &str, old: &str, new: &str) -> Option<String> {
    if path == old {
        return Some(new.to_owned());
    }
    if old == ROOT_PATH || !is_within(path, old) {
        return None;
    }
    Some(join(new, &path[old.len() + 1..]))
}

/// Heading depth of `path` below `root`: the number of separators left once
/// the root's prefix is cut off. Direct children of the vault root sit at
/// depth 0, direct children of any other root at depth 1.
pub fn depth_below(path: &str, root: &str) -> usize {
    if path == root {
        return 0;
    }
    let prefix = if root == ROOT_PATH { "" } else { root };
    path.strip_prefix(prefix)
        .map_or(0, |relative| relative.matches('/').count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_splits_basename_and_extension() {
        let item = Item::from_path("Book/Part 1/Scene.one.md");
        assert_eq!(item.basename, "Scene.one");
        assert_eq!(item.extension, "md");
        assert_eq!(item.name(), "Scene.one.md");
        assert_eq!(item.parent_path(), "Book/Part 1");
        assert!(item.is_document());
    }

    #[test]
    fn root_relative_paths() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/Book/"), "Book");
        assert_eq!(parent_path("Book"), "/");
        assert_eq!(join("/", "Book"), "Book");
        assert_eq!(join("Book", "Part"), "Book/Part");
    }

    #[test]
    fn within_respects_component_boundaries() {
        assert!(is_within("Book/Part", "Book"));
        assert!(is_within("Book", "Book"));
        assert!(!is_within("Bookshelf/Part", "Book"));
        assert!(is_within("Anything", "/"));
    }

    #[test]
    fn rebase_only_touches_the_prefix() {
        assert_eq!(rebase("Book/Part/Book", "Book", "Novel").as_deref(), Some("Novel/Part/Book"));
        assert_eq!(rebase("Book", "Book", "Archive/Book").as_deref(), Some("Archive/Book"));
        assert_eq!(rebase("Bookshelf", "Book", "Novel"), None);
    }

    #[test]
    fn depth_counts_levels_below_root() {
        assert_eq!(depth_below("Book", "Book"), 0);
        assert_eq!(depth_below("Book/Part", "Book"), 1);
        assert_eq!(depth_below("Book/Part/Act", "Book"), 2);
        assert_eq!(depth_below("Part", "/"), 0);
        assert_eq!(depth_below("Part/Scene", "/"), 1);
        assert_eq!(depth_below("/", "/"), 0);
    }

    #[test]
    fn falsy_values() {
        assert!(FieldValue::from("").is_falsy());
        assert!(!FieldValue::from("x").is_falsy());
        assert!(FieldValue::Flag(false).is_falsy());
        assert!(FieldValue::Other(serde_json::Value::Null).is_falsy());
    }
}
