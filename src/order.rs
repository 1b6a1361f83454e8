//! User-defined sibling ordering.
//!
//! Two tables map a container path to the ordered paths of its children: one
//! for files, one for subfolders. A table never has to be complete. Children
//! it does not mention sort after the ones it does, by name, and members that
//! no longer exist simply never match.

use crate::domain::{is_within, rebase};
use crate::error::{FolioError, FolioResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTable {
    Files,
    Folders,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIndex {
    #[serde(default)]
    file_order: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    folder_order: BTreeMap<String, Vec<String>>,
}

impl OrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, table: OrderTable) -> &BTreeMap<String, Vec<String>> {
        match table {
            OrderTable::Files => &self.file_order,
            OrderTable::Folders => &self.folder_order,
        }
    }

    fn table_mut(&mut self, table: OrderTable) -> &mut BTreeMap<String, Vec<String>> {
        match table {
            OrderTable::Files => &mut self.file_order,
            OrderTable::Folders => &mut self.folder_order,
        }
    }

    /// Recorded order of `container`'s children; empty when none was recorded.
    pub fn get_order(&self, table: OrderTable, container: &str) -> &[String] {
        self.table(table)
            .get(container)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replaces the recorded order of `container`. Repeated paths keep their
    /// first position; an empty sequence removes the record.
    pub fn set_order(&mut self, table: OrderTable, container: &str, sequence: Vec<String>) {
        let mut seen = std::collections::HashSet::new();
        let deduped: Vec<String> = sequence
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();

        if deduped.is_empty() {
            self.table_mut(table).remove(container);
        } else {
            self.table_mut(table).insert(container.to_owned(), deduped);
        }
    }

    pub fn containers(&self, table: OrderTable) -> impl Iterator<Item = &str> {
        self.table(table).keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.file_order.is_empty() && self.folder_order.is_empty()
    }

    /// Sorts `entries` by their recorded position under `container`, placing
    /// unrecorded entries last. Ties fall back to `name`, so the result does
    /// not depend on the order `entries` arrived in.
    ///
    /// Names compare by byte value, not by locale: `C.md` sorts before `b.md`.
    pub fn sort<T>(
        &self,
        table: OrderTable,
        container: &str,
        entries: &mut [T],
        path: impl Fn(&T) -> &str,
        name: impl Fn(&T) -> &str,
    ) {
        let ranks: HashMap<&str, usize> = self
            .get_order(table, container)
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();

        entries.sort_by(|a, b| {
            let ra = ranks.get(path(a)).copied().unwrap_or(usize::MAX);
            let rb = ranks.get(path(b)).copied().unwrap_or(usize::MAX);
            ra.cmp(&rb).then_with(|| name(a).cmp(name(b)))
        });
    }

    /// Moves the child at `from` to `to` and records the full resulting order.
    ///
    /// `current` is the container's children as currently displayed, i.e.
    /// already sorted by this index. Returns `false` when nothing moved.
    pub fn move_within(
        &mut self,
        table: OrderTable,
        container: &str,
        current: &[String],
        from: usize,
        to: usize,
    ) -> FolioResult<bool> {
        let len = current.len();
        if from >= len || to >= len {
            return Err(FolioError::InvalidMove { from, to, len });
        }
        if from == to {
            return Ok(false);
        }

        let mut sequence = current.to_vec();
        let moved = sequence.remove(from);
        sequence.insert(to, moved);
        self.set_order(table, container, sequence);
        Ok(true)
    }

    /// Replaces the first occurrence of `old` in any list of `table`.
    pub(crate) fn replace_first(&mut self, table: OrderTable, old: &str, new: &str) -> bool {
        for members in self.table_mut(table).values_mut() {
            if let Some(slot) = members.iter_mut().find(|p| p.as_str() == old) {
                *slot = new.to_owned();
                return true;
            }
        }
        false
    }

    /// Replaces `old` with `new` in place within `container`'s list.
    pub(crate) fn replace_in(
        &mut self,
        table: OrderTable,
        container: &str,
        old: &str,
        new: &str,
    ) -> bool {
        match self.table_mut(table).get_mut(container) {
            Some(members) => match members.iter_mut().find(|p| p.as_str() == old) {
                Some(slot) => {
                    *slot = new.to_owned();
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Appends `path` to `container`'s list unless it is already there.
    pub(crate) fn append(&mut self, table: OrderTable, container: &str, path: &str) -> bool {
        let members = self.table_mut(table).entry(container.to_owned()).or_default();
        if members.iter().any(|p| p == path) {
            return false;
        }
        members.push(path.to_owned());
        true
    }

    /// Removes `path` from `container`'s list, dropping the list if it empties.
    pub(crate) fn remove_from(&mut self, table: OrderTable, container: &str, path: &str) -> bool {
        let map = self.table_mut(table);
        let Some(members) = map.get_mut(container) else {
            return false;
        };
        let before = members.len();
        members.retain(|p| p != path);
        let changed = members.len() != before;
        if members.is_empty() {
            map.remove(container);
        }
        changed
    }

    /// Removes every member at or under `path` from every list of `table`,
    /// and every list keyed at or under `path`. Emptied lists are dropped.
    pub(crate) fn prune(&mut self, table: OrderTable, path: &str) -> bool {
        let map = self.table_mut(table);
        let before = map.clone();
        map.retain(|key, _| !is_within(key, path));
        for members in map.values_mut() {
            members.retain(|p| !is_within(p, path));
        }
        map.retain(|_, members| !members.is_empty());
        *map != before
    }

    /// Removes exactly `path` from every list of `table`, dropping emptied
    /// lists, plus the list keyed by `path` itself.
    pub(crate) fn remove_everywhere(&mut self, table: OrderTable, path: &str) -> bool {
        let map = self.table_mut(table);
        let mut changed = map.remove(path).is_some();
        map.retain(|_, members| {
            let before = members.len();
            members.retain(|p| p != path);
            changed |= members.len() != before;
            !members.is_empty()
        });
        changed
    }

    /// Rewrites every key and member at or under `old` to live under `new`.
    pub(crate) fn rebase(&mut self, table: OrderTable, old: &str, new: &str) -> bool {
        let map = self.table_mut(table);
        let mut changed = false;
        let rebased: BTreeMap<String, Vec<String>> = std::mem::take(map)
            .into_iter()
            .map(|(key, members)| {
                let key = match rebase(&key, old, new) {
                    Some(moved) => {
                        changed = true;
                        moved
                    }
                    None => key,
                };
                let members = members
                    .into_iter()
                    .map(|p| match rebase(&p, old, new) {
                        Some(moved) => {
                            changed = true;
                            moved
                        }
                        None => p,
                    })
                    .collect();
                (key, members)
            })
            .collect();
        *map = rebased;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unrecorded_children_sort_last_by_name() {
        let mut index = OrderIndex::new();
        index.set_order(OrderTable::Files, "Book", paths(&["Book/c.md", "Book/a.md"]));

        let mut children = paths(&["Book/d.md", "Book/a.md", "Book/b.md", "Book/c.md"]);
        index.sort(OrderTable::Files, "Book", &mut children, |p| p.as_str(), |p| p.as_str());

        assert_eq!(children, paths(&["Book/c.md", "Book/a.md", "Book/b.md", "Book/d.md"]));
    }

    #[test]
    fn unrecorded_names_compare_by_byte_value() {
        let index = OrderIndex::new();
        let mut children = paths(&["b.md", "C.md", "a.md"]);
        index.sort(OrderTable::Files, "/", &mut children, |p| p.as_str(), |p| p.as_str());
        assert_eq!(children, paths(&["C.md", "a.md", "b.md"]));
    }

    #[test]
    fn set_order_dedupes_and_empty_clears() {
        let mut index = OrderIndex::new();
        index.set_order(OrderTable::Folders, "/", paths(&["A", "B", "A"]));
        assert_eq!(index.get_order(OrderTable::Folders, "/"), paths(&["A", "B"]).as_slice());

        index.set_order(OrderTable::Folders, "/", Vec::new());
        assert!(index.is_empty());
    }

    #[test]
    fn move_within_rejects_out_of_range() {
        let mut index = OrderIndex::new();
        let err = index
            .move_within(OrderTable::Files, "/", &paths(&["a.md"]), 0, 3)
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidMove { len: 1, .. }));
    }

    #[test]
    fn remove_everywhere_drops_own_key_and_empty_lists() {
        let mut index = OrderIndex::new();
        index.set_order(OrderTable::Folders, "/", paths(&["A"]));
        index.set_order(OrderTable::Folders, "A", paths(&["A/x"]));
        assert!(index.remove_everywhere(OrderTable::Folders, "A"));
        assert!(index.is_empty());
    }
}
