use crate::compile::Compiler;
use crate::domain::{Container, FieldValue, Item, MetadataRecord, STATUS_FIELD, is_within, join};
use crate::error::{FolioError, FolioResult};
use crate::host::{FileStore, MetadataProvider, TreeEvent};
use crate::metadata::MetadataIndex;
use crate::reconcile::TreeReconciler;
use crate::settings::{OutputTarget, Settings, representative_path};
use crate::store::{SettingsStore, load_settings};
use crate::view::{Filter, Projection, ViewProjector};
use chrono::Local;
use tracing::{debug, info, warn};

/// Outcome of a successful [`Workspace::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub path: String,
    pub item_count: usize,
}

/// A manager providing the high-level operations of one vault.
///
/// Owns the loaded [`Settings`] and borrows the host services. Every
/// mutation is two-phase: it is applied to a copy, the copy is saved, and
/// only then does it replace the in-memory settings. A failed save leaves the
/// workspace exactly as it was.
///
/// Operations take `&mut self`, so structural changes are serialized by
/// construction.
pub struct Workspace<'a, F: ?Sized, M: ?Sized, S: ?Sized> {
    files: &'a F,
    metadata: &'a M,
    store: &'a S,
    settings: Settings,
}

impl<'a, F, M, S> Workspace<'a, F, M, S>
where
    F: FileStore + ?Sized,
    M: MetadataProvider + ?Sized,
    S: SettingsStore + ?Sized,
{
    /// Loads settings from `store` and makes sure the selected folder is
    /// still usable.
    pub async fn open(files: &'a F, metadata: &'a M, store: &'a S) -> FolioResult<Self> {
        let settings = load_settings(store).await?;
        let mut workspace = Workspace {
            files,
            metadata,
            store,
            settings,
        };
        workspace.ensure_valid_current_folder().await?;
        Ok(workspace)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Applies `change` to a copy of the settings and commits it once saved.
    pub async fn update<T>(
        &mut self,
        change: impl FnOnce(&mut Settings) -> FolioResult<T>,
    ) -> FolioResult<T> {
        let mut next = self.settings.clone();
        let out = change(&mut next)?;
        self.store.save(&next).await?;
        self.settings = next;
        Ok(out)
    }

    fn metadata_index(&self) -> MetadataIndex<'_, M> {
        MetadataIndex::new(self.metadata, self.settings.default_status())
    }

    fn projector(&self) -> ViewProjector<'_, F, M> {
        ViewProjector::new(
            self.files,
            self.metadata_index(),
            self.settings.representative_pattern(),
        )
    }

    /// The folder currently shown.
    pub fn current_container(&self) -> FolioResult<Container> {
        self.files
            .get_container(&self.settings.current_folder_path)
            .ok_or_else(|| FolioError::FolderNotFound(self.settings.current_folder_path.clone()))
    }

    /// Shows `path`, which must be a folder inside the base folder.
    pub async fn select_container(&mut self, path: &str) -> FolioResult<Container> {
        let container = self
            .files
            .get_container(path)
            .filter(|c| is_within(&c.path, &self.settings.base_folder_path))
            .ok_or_else(|| FolioError::FolderNotFound(path.to_owned()))?;
        let selected = container.path.clone();
        self.update(|s| {
            s.current_folder_path = selected;
            Ok(())
        })
        .await?;
        Ok(container)
    }

    /// Falls back to the base folder when the selected folder vanished or
    /// lies outside the base folder. Does nothing if the base folder itself
    /// is missing.
    pub async fn ensure_valid_current_folder(&mut self) -> FolioResult<()> {
        let base = self.settings.base_folder_path.clone();
        let Some(base) = self.files.get_container(&base) else {
            return Ok(());
        };
        let current = &self.settings.current_folder_path;
        let valid = self.files.get_container(current).is_some() && is_within(current, &base.path);
        if !valid {
            debug!(from = %current, to = %base.path, "resetting selected folder");
            self.update(|s| {
                s.current_folder_path = base.path;
                Ok(())
            })
            .await?;
        }
        Ok(())
    }

    /// Projects the selected folder through `filter`.
    pub fn project(&self, filter: &Filter) -> FolioResult<Projection> {
        let container = self.current_container()?;
        Ok(self.projector().project(
            &self.settings.order,
            &container,
            self.settings.include_subfolder_files,
            filter,
        ))
    }

    /// Moves one of the selected folder's own files from `from` to `to`.
    pub async fn reorder_item(&mut self, from: usize, to: usize) -> FolioResult<bool> {
        let container = self.current_container()?;
        let mut order = self.settings.order.clone();
        if !self.projector().reorder_item(&mut order, &container, from, to)? {
            return Ok(false);
        }
        self.update(|s| {
            s.order = order;
            Ok(true)
        })
        .await
    }

    /// Moves one of the selected folder's subfolders from `from` to `to`.
    pub async fn reorder_container(&mut self, from: usize, to: usize) -> FolioResult<bool> {
        let container = self.current_container()?;
        let mut order = self.settings.order.clone();
        if !self
            .projector()
            .reorder_container(&mut order, &container, from, to)?
        {
            return Ok(false);
        }
        self.update(|s| {
            s.order = order;
            Ok(true)
        })
        .await
    }

    pub fn metadata_of(&self, item: &Item) -> MetadataRecord {
        self.metadata_index().extract(item)
    }

    /// Writes one field of `item` and returns its refreshed record.
    ///
    /// On failure the error is returned and nothing cached is touched, so
    /// the previous value stays on display.
    pub async fn set_field(
        &self,
        item: &Item,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> FolioResult<MetadataRecord> {
        let index = self.metadata_index();
        if let Err(e) = index.write(item, field, value.into()).await {
            warn!(path = %item.path, field, error = %e, "metadata write failed");
            return Err(e);
        }
        Ok(index.extract(item))
    }

    pub async fn set_status(&self, item: &Item, status: &str) -> FolioResult<MetadataRecord> {
        self.set_field(item, STATUS_FIELD, status).await
    }

    /// Reconciles the order tables with a change the host already made.
    ///
    /// Never fails: a save error is logged and the in-memory settings stay
    /// as they were. Events that touch no recorded path are not saved.
    /// Returns whether anything was committed.
    pub async fn handle_event(&mut self, event: &TreeEvent) -> bool {
        let mut order = self.settings.order.clone();
        let mut selected = self.settings.current_folder_path.clone();
        let committed = if !TreeReconciler::new(&mut order, &mut selected).apply(event) {
            false
        } else {
            match self
                .update(|s| {
                    s.order = order;
                    s.current_folder_path = selected;
                    Ok(())
                })
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    warn!(path = %event.entry().path(), error = %e, "failed to persist reconciled order");
                    false
                }
            }
        };
        if let Err(e) = self.ensure_valid_current_folder().await {
            warn!(error = %e, "failed to persist selected folder");
        }
        committed
    }

    /// Whether a metadata change to `path` affects the selected folder's
    /// view: either its own representative note or anything below it.
    pub fn is_relevant(&self, path: &str) -> bool {
        let Ok(current) = self.current_container() else {
            return false;
        };
        if let Some(pattern) = self.settings.representative_pattern() {
            if representative_path(pattern, &current.path, &current.name) == path {
                return true;
            }
        }
        path != current.path && is_within(path, &current.path)
    }

    /// Compiles the selected folder into a new document.
    ///
    /// `output` overrides the configured output folder and is required when
    /// the configuration asks every time. Nothing is written unless the whole
    /// document could be assembled.
    pub async fn compile(&self, output: Option<&str>) -> FolioResult<CompileReport> {
        let root = self.current_container()?;

        let output_path = match (output, &self.settings.compile_output_path) {
            (Some(path), _) => path.to_owned(),
            (None, OutputTarget::Folder(path)) => path.clone(),
            (None, OutputTarget::AskEveryTime) => return Err(FolioError::OutputPathRequired),
        };
        let output_folder = self
            .files
            .get_container(&output_path)
            .ok_or(FolioError::OutputFolderNotFound(output_path))?;

        let compiler = Compiler::new(
            self.files,
            self.metadata_index(),
            self.settings.representative_pattern(),
        );
        let plan = compiler.plan(
            &self.settings.order,
            &root,
            self.settings.include_subfolder_files,
            &self.settings.completion_status_name,
        )?;
        let document = compiler.render(&plan).await?;

        let timestamp = Local::now().format("%Y-%m-%d %H%M%S");
        let filename = format!("{} ({timestamp}).md", root.name);
        let path = join(&output_folder.path, &filename);

        let created = self
            .files
            .create_item(&path, &document)
            .await
            .map_err(|source| FolioError::OutputCreate {
                path: path.clone(),
                source,
            })?;

        info!(path = %created.path, items = plan.item_count(), "wrote compiled document");
        Ok(CompileReport {
            path: created.path,
            item_count: plan.item_count(),
        })
    }
}
