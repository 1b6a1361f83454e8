//! Services the core consumes from the host application.
//!
//! The core never touches storage directly. It asks a [`FileStore`] about the
//! shape of the tree and a [`MetadataProvider`] about frontmatter, and it
//! reacts to [`TreeEvent`]s the host reports after the tree changed.

use crate::domain::{Container, Entry, Frontmatter, Item};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid frontmatter in {path}: {message}")]
    Frontmatter { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Direct children of a container, in whatever order the host enumerates them.
#[derive(Debug, Clone, Default)]
pub struct Children {
    pub containers: Vec<Container>,
    pub items: Vec<Item>,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    fn get_container(&self, path: &str) -> Option<Container>;

    fn get_item(&self, path: &str) -> Option<Item>;

    fn list_children(&self, container: &Container) -> Children;

    async fn read_content(&self, item: &Item) -> Result<String, HostError>;

    /// Creates a new file. Fails with [`HostError::AlreadyExists`] rather than
    /// overwriting.
    async fn create_item(&self, path: &str, text: &str) -> Result<Item, HostError>;
}

/// Edit applied to an item's frontmatter by [`MetadataProvider::mutate_frontmatter`].
pub type FrontmatterMutator = Box<dyn FnOnce(&mut Frontmatter) + Send>;

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Cached frontmatter of `item`; empty when it has none.
    fn frontmatter(&self, item: &Item) -> Frontmatter;

    async fn mutate_frontmatter(
        &self,
        item: &Item,
        mutator: FrontmatterMutator,
    ) -> Result<(), HostError>;
}

/// A structural change the host has already applied to its tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// `entry` now lives at its own path; it used to live at `old_path`.
    Renamed { entry: Entry, old_path: String },
    Deleted { entry: Entry },
}

impl TreeEvent {
    pub fn entry(&self) -> &Entry {
        match self {
            TreeEvent::Renamed { entry, .. } | TreeEvent::Deleted { entry } => entry,
        }
    }
}
