//! Ordered, filtered projections of a folder for display.

use crate::domain::{Container, Item, MetadataRecord};
use crate::error::FolioResult;
use crate::host::{FileStore, MetadataProvider};
use crate::metadata::MetadataIndex;
use crate::order::{OrderIndex, OrderTable};
use crate::tree::TreeWalker;
use tracing::debug;

/// Status half of a [`Filter`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Is(String),
}

impl StatusFilter {
    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Is(wanted) => wanted == status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    pub status: StatusFilter,
    /// Case-insensitive substring of the name; empty matches everything.
    pub text: String,
}

impl Filter {
    pub fn status(status: impl Into<String>) -> Self {
        Filter {
            status: StatusFilter::Is(status.into()),
            text: String::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Filter {
            status: StatusFilter::All,
            text: text.into(),
        }
    }

    fn matches_name(&self, name: &str) -> bool {
        self.text.is_empty() || name.to_lowercase().contains(&self.text.to_lowercase())
    }

    pub fn matches_item(&self, entry: &ProjectedItem) -> bool {
        self.status.matches(&entry.record.status) && self.matches_name(&entry.item.basename)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedItem {
    pub item: Item,
    pub record: MetadataRecord,
}

/// What a folder looks like once ordered and filtered.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub container: Container,
    /// The folder's own representative note, if it has one.
    pub representative: Option<ProjectedItem>,
    pub items: Vec<ProjectedItem>,
    pub containers: Vec<Container>,
}

pub struct ViewProjector<'a, S: ?Sized, P: ?Sized> {
    store: &'a S,
    metadata: MetadataIndex<'a, P>,
    representative_pattern: Option<&'a str>,
}

impl<'a, S, P> ViewProjector<'a, S, P>
where
    S: FileStore + ?Sized,
    P: MetadataProvider + ?Sized,
{
    pub fn new(
        store: &'a S,
        metadata: MetadataIndex<'a, P>,
        representative_pattern: Option<&'a str>,
    ) -> Self {
        ViewProjector {
            store,
            metadata,
            representative_pattern,
        }
    }

    fn walker<'o>(&self, order: &'o OrderIndex) -> TreeWalker<'o, S>
    where
        'a: 'o,
    {
        TreeWalker::new(self.store, order, self.representative_pattern)
    }

    fn annotate(&self, item: Item) -> ProjectedItem {
        let record = self.metadata.extract(&item);
        ProjectedItem { item, record }
    }

    /// Every candidate item of `container` in display order, before
    /// filtering. With `include_descendants` the items of each folder in the
    /// subtree follow one another, folder by folder, in pre-order.
    pub fn ordered_items(
        &self,
        order: &OrderIndex,
        container: &Container,
        include_descendants: bool,
    ) -> Vec<ProjectedItem> {
        let walker = self.walker(order);
        walker
            .scope(container, include_descendants)
            .iter()
            .flat_map(|c| walker.items(c))
            .map(|item| self.annotate(item))
            .collect()
    }

    /// Projects `container` through `filter`. Filtering only removes entries;
    /// the relative order of what remains is the unfiltered order.
    pub fn project(
        &self,
        order: &OrderIndex,
        container: &Container,
        include_descendants: bool,
        filter: &Filter,
    ) -> Projection {
        let walker = self.walker(order);
        let items: Vec<ProjectedItem> = self
            .ordered_items(order, container, include_descendants)
            .into_iter()
            .filter(|entry| filter.matches_item(entry))
            .collect();

        let containers: Vec<Container> = walker
            .subcontainers(container)
            .into_iter()
            .filter(|child| filter.matches_name(&child.name))
            .filter(|child| match &filter.status {
                StatusFilter::All => true,
                StatusFilter::Is(_) => walker
                    .representative(child)
                    .is_some_and(|note| filter.status.matches(&self.metadata.extract(&note).status)),
            })
            .collect();

        debug!(
            container = %container.path,
            items = items.len(),
            containers = containers.len(),
            "projected view"
        );

        Projection {
            container: container.clone(),
            representative: walker.representative(container).map(|note| self.annotate(note)),
            items,
            containers,
        }
    }

    /// Moves a direct file of `container` from `from` to `to`.
    ///
    /// Indices address the unfiltered list of the folder's own files, never
    /// descendants. The caller persists `order` and re-projects.
    pub fn reorder_item(
        &self,
        order: &mut OrderIndex,
        container: &Container,
        from: usize,
        to: usize,
    ) -> FolioResult<bool> {
        let current: Vec<String> = self
            .walker(order)
            .items(container)
            .into_iter()
            .map(|i| i.path)
            .collect();
        order.move_within(OrderTable::Files, &container.path, &current, from, to)
    }

    /// Moves a direct subfolder of `container` from `from` to `to`.
    pub fn reorder_container(
        &self,
        order: &mut OrderIndex,
        container: &Container,
        from: usize,
        to: usize,
    ) -> FolioResult<bool> {
        let current: Vec<String> = self
            .walker(order)
            .subcontainers(container)
            .into_iter()
            .map(|c| c.path)
            .collect();
        order.move_within(OrderTable::Folders, &container.path, &current, from, to)
    }
}
