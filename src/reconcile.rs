//! Keeps order tables pointing at live paths as the host's tree changes.
//!
//! Reconciliation is a pure function of the event and the tables: it never
//! fails, and paths it does not know about are ignored.

use crate::domain::{Entry, parent_path, rebase};
use crate::host::TreeEvent;
use crate::order::{OrderIndex, OrderTable};
use tracing::debug;

pub struct TreeReconciler<'a> {
    order: &'a mut OrderIndex,
    selected: &'a mut String,
}

impl<'a> TreeReconciler<'a> {
    /// `selected` is the path of the folder currently shown; it follows its
    /// folder through renames.
    pub fn new(order: &'a mut OrderIndex, selected: &'a mut String) -> Self {
        TreeReconciler { order, selected }
    }

    /// Applies `event`. Returns `true` if anything changed.
    pub fn apply(&mut self, event: &TreeEvent) -> bool {
        let changed = match event {
            TreeEvent::Renamed {
                entry: Entry::Container(container),
                old_path,
            } => self.container_renamed(old_path, &container.path),
            TreeEvent::Renamed {
                entry: Entry::Item(item),
                old_path,
            } => self.order.replace_first(OrderTable::Files, old_path, &item.path),
            TreeEvent::Deleted {
                entry: Entry::Container(container),
            } => self.container_deleted(&container.path),
            TreeEvent::Deleted {
                entry: Entry::Item(item),
            } => self.order.remove_everywhere(OrderTable::Files, &item.path),
        };
        debug!(path = %event.entry().path(), changed, "reconciled tree event");
        changed
    }

    fn container_renamed(&mut self, old: &str, new: &str) -> bool {
        if old == new {
            return false;
        }
        let old_parent = parent_path(old);
        let new_parent = parent_path(new);

        let mut changed = if old_parent != new_parent {
            let removed = self.order.remove_from(OrderTable::Folders, &old_parent, old);
            let appended = self.order.append(OrderTable::Folders, &new_parent, new);
            removed | appended
        } else {
            self.order.replace_in(OrderTable::Folders, &old_parent, old, new)
        };

        changed |= self.order.rebase(OrderTable::Files, old, new);
        changed |= self.order.rebase(OrderTable::Folders, old, new);

        if let Some(moved) = rebase(self.selected.as_str(), old, new) {
            *self.selected = moved;
            changed = true;
        }
        changed
    }

    fn container_deleted(&mut self, path: &str) -> bool {
        let files = self.order.prune(OrderTable::Files, path);
        let folders = self.order.prune(OrderTable::Folders, path);
        files | folders
    }
}
