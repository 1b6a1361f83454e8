#![allow(dead_code)]

use folio_core::store::JsonFileStore;
use folio_core::vault::LocalVault;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A vault in a temporary directory plus a settings file outside it.
pub struct Fixture {
    pub vault_dir: TempDir,
    pub config_dir: TempDir,
    pub vault: LocalVault,
    pub store: JsonFileStore,
}

impl Fixture {
    pub fn new() -> Self {
        let vault_dir = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();
        let vault = LocalVault::open(vault_dir.path()).unwrap();
        let store = JsonFileStore::new(config_dir.path().join("settings.json"));
        Fixture {
            vault_dir,
            config_dir,
            vault,
            store,
        }
    }

    pub fn root(&self) -> &Path {
        self.vault_dir.path()
    }

    pub fn folder(&self, path: &str) {
        fs::create_dir_all(self.root().join(path)).unwrap();
    }

    /// Writes a note, with a status block when `status` is given.
    pub fn note(&self, path: &str, status: Option<&str>, body: &str) {
        let full = self.root().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let content = match status {
            Some(status) => format!("---\nstatus: {status}\n---\n{body}"),
            None => body.to_string(),
        };
        fs::write(full, content).unwrap();
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.root().join(path)).unwrap()
    }
}

pub fn paths<T, F: Fn(&T) -> &str>(entries: &[T], path: F) -> Vec<String> {
    entries.iter().map(|e| path(e).to_string()).collect()
}
