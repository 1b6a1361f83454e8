use crate::domain::{Container, Item};
use crate::host::FileStore;
use crate::order::{OrderIndex, OrderTable};
use crate::settings::representative_path;

/// Walks the host's tree in the user's order.
///
/// Subfolders are visited in folder-order, files listed in file-order, and a
/// folder's representative note is never listed as one of its files.
pub struct TreeWalker<'a, S: ?Sized> {
    store: &'a S,
    order: &'a OrderIndex,
    representative_pattern: Option<&'a str>,
}

impl<'a, S: FileStore + ?Sized> TreeWalker<'a, S> {
    pub fn new(store: &'a S, order: &'a OrderIndex, representative_pattern: Option<&'a str>) -> Self {
        TreeWalker {
            store,
            order,
            representative_pattern,
        }
    }

    /// The representative note of `container`, if the feature is enabled and
    /// the note exists.
    pub fn representative(&self, container: &Container) -> Option<Item> {
        let pattern = self.representative_pattern?;
        let path = representative_path(pattern, &container.path, &container.name);
        self.store.get_item(&path).filter(Item::is_document)
    }

    /// Direct subfolders of `container`, sorted.
    pub fn subcontainers(&self, container: &Container) -> Vec<Container> {
        let mut containers = self.store.list_children(container).containers;
        self.order.sort(
            OrderTable::Folders,
            &container.path,
            &mut containers,
            |c| c.path.as_str(),
            |c| c.name.as_str(),
        );
        containers
    }

    /// Direct documents of `container` other than its representative note,
    /// sorted.
    pub fn items(&self, container: &Container) -> Vec<Item> {
        let representative = self.representative(container).map(|i| i.path);
        let mut items: Vec<Item> = self
            .store
            .list_children(container)
            .items
            .into_iter()
            .filter(|i| i.is_document() && Some(&i.path) != representative.as_ref())
            .collect();
        self.order.sort(
            OrderTable::Files,
            &container.path,
            &mut items,
            |i| i.path.as_str(),
            |i| i.path.as_str(),
        );
        items
    }

    /// `root` followed by all its descendants in depth-first pre-order, or
    /// just `root` when descendants are not wanted.
    pub fn scope(&self, root: &Container, include_descendants: bool) -> Vec<Container> {
        let mut out = vec![root.clone()];
        if include_descendants {
            self.collect_descendants(root, &mut out);
        }
        out
    }

    fn collect_descendants(&self, container: &Container, out: &mut Vec<Container>) {
        for child in self.subcontainers(container) {
            out.push(child.clone());
            self.collect_descendants(&child, out);
        }
    }
}
