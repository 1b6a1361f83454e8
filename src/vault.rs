//! A directory on disk acting as the host.
//!
//! [`LocalVault`] implements [`FileStore`] and [`MetadataProvider`] over a
//! plain folder of Markdown files. Vault paths are `/`-separated and relative
//! to the vault root; `/` names the root itself. Dotfiles are invisible.
//!
//! Structural changes made through the vault return the [`TreeEvent`] the
//! caller should dispatch, mirroring how a host reports its own changes.

use crate::domain::{Container, Entry, Frontmatter, Item, ROOT_PATH, normalize, parent_path};
use crate::frontmatter;
use crate::host::{Children, FileStore, FrontmatterMutator, HostError, MetadataProvider, TreeEvent};
use async_trait::async_trait;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

pub struct LocalVault {
    pub root: PathBuf,
    pub name: String,
}

impl LocalVault {
    /// Opens an existing directory as a vault named after the directory.
    ///
    /// Returns [`HostError::NotFound`] if `root` does not exist, or
    /// [`HostError::InvalidName`] if it is not a directory.
    pub fn open(root: &Path) -> Result<Self, HostError> {
        if !root.exists() {
            return Err(HostError::NotFound(root.display().to_string()));
        }
        if !root.is_dir() {
            return Err(HostError::InvalidName(root.display().to_string()));
        }
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(LocalVault {
            root: root.to_path_buf(),
            name,
        })
    }

    /// Filesystem location of a vault path.
    pub fn absolute(&self, path: &str) -> PathBuf {
        let path = normalize(path);
        if path == ROOT_PATH {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }

    /// Creates a folder, including missing parents.
    pub async fn create_folder(&self, path: &str) -> Result<Container, HostError> {
        let path = normalize(path);
        Self::valid_path(&path)?;
        tokio::fs::create_dir_all(self.absolute(&path)).await?;
        Ok(Container::new(&path, &self.name))
    }

    /// Writes `text` to `path`, replacing any existing content.
    pub async fn write_item(&self, path: &str, text: &str) -> Result<Item, HostError> {
        let path = normalize(path);
        Self::valid_path(&path)?;
        let target = self.absolute(&path);
        let data = text.as_bytes().to_vec();
        tokio::task::spawn_blocking(move || Self::write_atomic(&target, &data, true))
            .await
            .map_err(|e| HostError::Io(std::io::Error::other(e)))??;
        Ok(Item::from_path(&path))
    }

    /// Moves a file or folder and reports the rename.
    pub async fn rename(&self, old_path: &str, new_path: &str) -> Result<TreeEvent, HostError> {
        let old_path = normalize(old_path);
        let new_path = normalize(new_path);
        Self::valid_path(&new_path)?;

        let from = self.absolute(&old_path);
        let to = self.absolute(&new_path);
        if !from.exists() {
            return Err(HostError::NotFound(old_path));
        }
        if to.exists() {
            return Err(HostError::AlreadyExists(new_path));
        }
        if !self.absolute(&parent_path(&new_path)).is_dir() {
            return Err(HostError::NotFound(parent_path(&new_path)));
        }

        tokio::fs::rename(&from, &to).await?;

        let entry = if to.is_dir() {
            Entry::Container(Container::new(&new_path, &self.name))
        } else {
            Entry::Item(Item::from_path(&new_path))
        };
        Ok(TreeEvent::Renamed { entry, old_path })
    }

    /// Deletes a file or a whole folder and reports the deletion.
    pub async fn delete(&self, path: &str) -> Result<TreeEvent, HostError> {
        let path = normalize(path);
        if path == ROOT_PATH {
            return Err(HostError::InvalidName(path));
        }
        let target = self.absolute(&path);
        let entry = if target.is_dir() {
            tokio::fs::remove_dir_all(&target).await?;
            Entry::Container(Container::new(&path, &self.name))
        } else if target.is_file() {
            tokio::fs::remove_file(&target).await?;
            Entry::Item(Item::from_path(&path))
        } else {
            return Err(HostError::NotFound(path));
        };
        Ok(TreeEvent::Deleted { entry })
    }

    fn is_hidden(name: &str) -> bool {
        name.starts_with('.')
    }

    /// Rejects path components that are empty, hidden, or contain characters
    /// not valid in file names (`\`, `:`, `"`, `*`, `?`, `<`, `>`, `|`).
    fn valid_path(path: &str) -> Result<(), HostError> {
        let bad = path.split('/').any(|component| {
            let trimmed = component.trim();
            trimmed.is_empty()
                || Self::is_hidden(trimmed)
                || trimmed.contains(&['\\', ':', '"', '*', '?', '<', '>', '|'][..])
        });
        if bad {
            return Err(HostError::InvalidName(path.to_owned()));
        }
        Ok(())
    }

    /// Writes data to a temporary file in the target directory and renames it
    /// in place, so the file is never left half-written.
    fn write_atomic(path: &Path, data: &[u8], overwrite: bool) -> Result<(), HostError> {
        let dir = path
            .parent()
            .ok_or_else(|| HostError::NotFound(path.display().to_string()))?;
        if !dir.is_dir() {
            return Err(HostError::NotFound(dir.display().to_string()));
        }
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        let persisted = if overwrite {
            tmp.persist(path)
        } else {
            tmp.persist_noclobber(path)
        };
        persisted.map_err(|e| match e.error.kind() {
            ErrorKind::AlreadyExists => HostError::AlreadyExists(path.display().to_string()),
            _ => HostError::Io(e.error),
        })?;
        Ok(())
    }
}

#[async_trait]
impl FileStore for LocalVault {
    fn get_container(&self, path: &str) -> Option<Container> {
        let path = normalize(path);
        if self.absolute(&path).is_dir() {
            Some(Container::new(&path, &self.name))
        } else {
            None
        }
    }

    fn get_item(&self, path: &str) -> Option<Item> {
        let path = normalize(path);
        if path != ROOT_PATH && self.absolute(&path).is_file() {
            Some(Item::from_path(&path))
        } else {
            None
        }
    }

    fn list_children(&self, container: &Container) -> Children {
        let mut children = Children::default();
        let entries = match fs::read_dir(self.absolute(&container.path)) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %container.path, error = %e, "failed to list folder");
                return children;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if Self::is_hidden(&name) {
                continue;
            }
            let path = crate::domain::join(&container.path, &name);
            match entry.file_type() {
                Ok(ft) if ft.is_dir() => children.containers.push(Container::new(&path, &self.name)),
                Ok(ft) if ft.is_file() => children.items.push(Item::from_path(&path)),
                _ => {}
            }
        }
        children
    }

    async fn read_content(&self, item: &Item) -> Result<String, HostError> {
        match tokio::fs::read_to_string(self.absolute(&item.path)).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(HostError::NotFound(item.path.clone())),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_item(&self, path: &str, text: &str) -> Result<Item, HostError> {
        let path = normalize(path);
        Self::valid_path(&path)?;
        let target = self.absolute(&path);
        let data = text.as_bytes().to_vec();
        tokio::task::spawn_blocking(move || Self::write_atomic(&target, &data, false))
            .await
            .map_err(|e| HostError::Io(std::io::Error::other(e)))??;
        Ok(Item::from_path(&path))
    }
}

#[async_trait]
impl MetadataProvider for LocalVault {
    fn frontmatter(&self, item: &Item) -> Frontmatter {
        let content = match fs::read_to_string(self.absolute(&item.path)) {
            Ok(content) => content,
            Err(_) => return Frontmatter::new(),
        };
        frontmatter::read(&content).unwrap_or_else(|e| {
            warn!(path = %item.path, error = %e, "ignoring unreadable frontmatter");
            Frontmatter::new()
        })
    }

    async fn mutate_frontmatter(
        &self,
        item: &Item,
        mutator: FrontmatterMutator,
    ) -> Result<(), HostError> {
        let content = self.read_content(item).await?;
        let invalid = |e: serde_yaml::Error| HostError::Frontmatter {
            path: item.path.clone(),
            message: e.to_string(),
        };

        let mut fields = frontmatter::read(&content).map_err(invalid)?;
        mutator(&mut fields);
        let updated = frontmatter::rewrite(&content, &fields).map_err(invalid)?;

        let target = self.absolute(&item.path);
        tokio::task::spawn_blocking(move || Self::write_atomic(&target, updated.as_bytes(), true))
            .await
            .map_err(|e| HostError::Io(std::io::Error::other(e)))?
    }
}
