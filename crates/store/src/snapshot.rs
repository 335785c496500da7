//! Immutable view of the whole tree.

use crate::entry::{Entry, EntryId};
use std::collections::{HashMap, HashSet, VecDeque};

/// The store's full state at one instant.
///
/// Entries live in an arena keyed by id. Parent/child membership is the
/// entries' `parent_id`; the adjacency index (`roots` plus `children`)
/// mirrors it so listing a folder doesn't scan every entry. The index also
/// carries display order: a sibling list is kept in the order it is shown.
///
/// Snapshots are never mutated once published by the
/// [`Store`](crate::Store); every transition builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub(crate) entries: HashMap<EntryId, Entry>,
    pub(crate) roots: Vec<EntryId>,
    // Invariant: no empty lists, so that equal trees compare equal.
    pub(crate) children: HashMap<EntryId, Vec<EntryId>>,
    pub(crate) recent: Vec<EntryId>,
    pub(crate) current_folder: Option<EntryId>,
}

impl Snapshot {
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// The folder new entries are added to; `None` is the root.
    pub fn current_folder(&self) -> Option<&EntryId> {
        self.current_folder.as_ref()
    }

    /// Ids of the children of `parent` (`None` for the root), in display order.
    pub fn child_ids(&self, parent: Option<&EntryId>) -> &[EntryId] {
        match parent {
            None => &self.roots,
            Some(parent) => self.children.get(parent).map(Vec::as_slice).unwrap_or_default(),
        }
    }

    /// Children of `parent` (`None` for the root), in display order.
    pub fn children(&self, parent: Option<&EntryId>) -> impl Iterator<Item = &Entry> {
        self.child_ids(parent).iter().filter_map(|id| self.entries.get(id))
    }

    /// Children of the current folder, in display order.
    pub fn current_children(&self) -> impl Iterator<Item = &Entry> {
        self.children(self.current_folder.as_ref())
    }

    /// Most recently created entries that still exist, newest first.
    pub fn recent(&self) -> impl Iterator<Item = &Entry> {
        self.recent.iter().filter_map(|id| self.entries.get(id))
    }

    /// Walk from the parent of `id` up to the root.
    ///
    /// Stops at the first parent that no longer exists. Bounded by the number
    /// of entries, so a corrupt (cyclic) chain cannot loop forever.
    pub fn ancestors(&self, id: &EntryId) -> impl Iterator<Item = &Entry> {
        let start = self.entries.get(id).and_then(|entry| entry.parent_id.as_ref());
        std::iter::successors(start.and_then(|parent| self.entries.get(parent)), |entry| {
            entry.parent_id.as_ref().and_then(|parent| self.entries.get(parent))
        })
        .take(self.entries.len())
    }

    /// Whether `candidate` sits anywhere beneath `ancestor`.
    pub fn is_descendant(&self, candidate: &EntryId, ancestor: &EntryId) -> bool {
        self.ancestors(candidate).any(|entry| &entry.id == ancestor)
    }

    /// `id` and every entry beneath it, breadth first.
    pub fn subtree(&self, id: &EntryId) -> Vec<EntryId> {
        if !self.entries.contains_key(id) {
            return Vec::new();
        }
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([id.clone()]);
        let mut found = Vec::new();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            queue.extend(self.child_ids(Some(&next)).iter().cloned());
            found.push(next);
        }
        found
    }

    // =========================================================================
    // Index maintenance
    // =========================================================================

    pub(crate) fn siblings_mut(&mut self, parent: Option<&EntryId>) -> &mut Vec<EntryId> {
        match parent {
            None => &mut self.roots,
            Some(parent) => self.children.entry(parent.clone()).or_default(),
        }
    }

    pub(crate) fn attach(&mut self, parent: Option<&EntryId>, id: EntryId) {
        self.siblings_mut(parent).push(id);
    }

    pub(crate) fn detach(&mut self, parent: Option<&EntryId>, id: &EntryId) {
        self.siblings_mut(parent).retain(|sibling| sibling != id);
        if let Some(parent) = parent
            && self.children.get(parent).is_some_and(Vec::is_empty)
        {
            self.children.remove(parent);
        }
    }

    /// Rebuild the adjacency index from `parent_id` alone and check that it
    /// agrees with the maintained one (ignoring sibling order).
    #[cfg(test)]
    pub(crate) fn assert_index_consistent(&self) {
        let mut expected: HashMap<Option<EntryId>, HashSet<EntryId>> = HashMap::new();
        for entry in self.entries.values() {
            expected.entry(entry.parent_id.clone()).or_default().insert(entry.id.clone());
        }
        let mut actual: HashMap<Option<EntryId>, HashSet<EntryId>> = HashMap::new();
        if !self.roots.is_empty() {
            actual.insert(None, self.roots.iter().cloned().collect());
        }
        for (parent, ids) in &self.children {
            assert!(!ids.is_empty(), "empty sibling list kept for {parent}");
            actual.insert(Some(parent.clone()), ids.iter().cloned().collect());
        }
        assert_eq!(expected, actual);
    }
}
