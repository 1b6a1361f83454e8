//! Compiling a folder into a single document.
//!
//! Compilation runs in two steps. [`Compiler::plan`] resolves, synchronously,
//! which notes go into the document and in what order. [`Compiler::render`]
//! then reads their content. Only rendering awaits, so a plan is a fixed
//! snapshot: tree changes that arrive while content is being read do not
//! alter what gets compiled.

use crate::domain::{Container, Item, depth_below};
use crate::error::{FolioError, FolioResult};
use crate::frontmatter;
use crate::host::{FileStore, MetadataProvider};
use crate::metadata::MetadataIndex;
use crate::order::OrderIndex;
use crate::tree::TreeWalker;
use tracing::{debug, info};

/// The notes one folder contributes to a compiled document.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileGroup {
    pub container: Container,
    /// Folder levels between this folder and the compilation root.
    pub depth: usize,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompilePlan {
    pub root: Container,
    pub groups: Vec<CompileGroup>,
}

impl CompilePlan {
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

pub struct Compiler<'a, S: ?Sized, P: ?Sized> {
    store: &'a S,
    metadata: MetadataIndex<'a, P>,
    representative_pattern: Option<&'a str>,
}

impl<'a, S, P> Compiler<'a, S, P>
where
    S: FileStore + ?Sized,
    P: MetadataProvider + ?Sized,
{
    pub fn new(
        store: &'a S,
        metadata: MetadataIndex<'a, P>,
        representative_pattern: Option<&'a str>,
    ) -> Self {
        Compiler {
            store,
            metadata,
            representative_pattern,
        }
    }

    /// Selects the notes of `root` (and, if asked, its subfolders) whose
    /// status is `completion_status`, grouped by folder in display order.
    /// Folders contributing nothing are left out.
    pub fn plan(
        &self,
        order: &OrderIndex,
        root: &Container,
        include_descendants: bool,
        completion_status: &str,
    ) -> FolioResult<CompilePlan> {
        if completion_status.is_empty() {
            return Err(FolioError::NoCompletionStatus);
        }

        let walker = TreeWalker::new(self.store, order, self.representative_pattern);
        let groups: Vec<CompileGroup> = walker
            .scope(root, include_descendants)
            .into_iter()
            .filter_map(|container| {
                let items: Vec<Item> = walker
                    .items(&container)
                    .into_iter()
                    .filter(|item| self.metadata.extract(item).status == completion_status)
                    .collect();
                if items.is_empty() {
                    return None;
                }
                Some(CompileGroup {
                    depth: depth_below(&container.path, &root.path),
                    container,
                    items,
                })
            })
            .collect();

        let plan = CompilePlan {
            root: root.clone(),
            groups,
        };
        if plan.item_count() == 0 {
            return Err(FolioError::NothingToCompile(completion_status.to_owned()));
        }
        debug!(root = %root.path, items = plan.item_count(), "compile plan ready");
        Ok(plan)
    }

    /// Reads every planned note and assembles the document.
    pub async fn render(&self, plan: &CompilePlan) -> FolioResult<String> {
        let mut out = format!("# {}\n\n", plan.root.name);

        for group in &plan.groups {
            if group.container.path != plan.root.path {
                out.push_str(&heading(1 + group.depth, &group.container.name));
            }
            for item in &group.items {
                let content = self.store.read_content(item).await?;
                out.push_str(&heading(2 + group.depth, &item.basename));
                out.push_str(frontmatter::strip(&content));
                out.push_str("\n\n***\n\n");
            }
        }

        Ok(out.trim_end().to_owned())
    }

    /// Plans and renders in one go.
    pub async fn compile(
        &self,
        order: &OrderIndex,
        root: &Container,
        include_descendants: bool,
        completion_status: &str,
    ) -> FolioResult<String> {
        let plan = self.plan(order, root, include_descendants, completion_status)?;
        let document = self.render(&plan).await?;
        info!(root = %root.path, items = plan.item_count(), "compiled document");
        Ok(document)
    }
}

fn heading(level: usize, text: &str) -> String {
    format!("{} {}\n\n", "#".repeat(level), text)
}
