//! Pure state transitions.
//!
//! Each transition reads the current [`Snapshot`] and returns either a new
//! one (`Ok(Some(next))`) or `Ok(None)` when the action changes nothing, most
//! commonly because it references an id that doesn't exist.

use crate::action::Action;
use crate::entry::{EntryId, EntryUpdate, NewEntry};
use crate::error::{ErrorKind, Result};
use crate::snapshot::Snapshot;
use std::collections::HashSet;
use time::UtcDateTime;

/// Default bound on [`Snapshot::recent`].
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Inputs to a transition that don't come from the action itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub now: UtcDateTime,
    pub recent_limit: usize,
}
impl Context {
    pub fn new(now: UtcDateTime) -> Self {
        Self { now, recent_limit: DEFAULT_RECENT_LIMIT }
    }
}

impl Snapshot {
    /// Apply `action` to this snapshot.
    ///
    /// Returns `Ok(None)` when nothing changes. Errors are reserved for
    /// transitions that would corrupt the tree (see [`ErrorKind`]).
    pub fn reduce(&self, action: Action, ctx: &Context) -> Result<Option<Snapshot>> {
        match action {
            Action::AddEntry(new) => self.add(new, ctx).map(Some),
            Action::UpdateEntry { id, update } => Ok(self.update(&id, update, ctx)),
            Action::DeleteEntry(id) => Ok(self.delete(&id)),
            Action::ToggleShare(id) => Ok(self.toggle_share(&id, ctx)),
            Action::ReorderEntries { id, new_index } => Ok(self.reorder(&id, new_index, ctx)),
            Action::MoveEntry { id, destination } => self.move_entry(&id, destination, ctx),
            Action::SetCurrentFolder(folder) => Ok(self.set_current_folder(folder)),
        }
    }

    fn add(&self, new: NewEntry, ctx: &Context) -> Result<Snapshot> {
        let id = new.id.clone().unwrap_or_else(EntryId::generate);
        if self.entries.contains_key(&id) {
            exn::bail!(ErrorKind::DuplicateId(id));
        }
        let mut next = self.clone();
        let entry = new.into_entry(id.clone(), self.current_folder.clone(), ctx.now);
        next.attach(entry.parent_id.as_ref(), id.clone());
        next.entries.insert(id.clone(), entry);
        next.recent.insert(0, id);
        next.recent.truncate(ctx.recent_limit);
        Ok(next)
    }

    fn update(&self, id: &EntryId, update: EntryUpdate, ctx: &Context) -> Option<Snapshot> {
        if !self.entries.contains_key(id) {
            tracing::debug!(%id, "Ignoring update of unknown entry");
            return None;
        }
        let mut next = self.clone();
        let entry = next.entries.get_mut(id)?;
        update.apply_to(entry);
        // Stamped even when the update is empty.
        entry.touch(ctx.now);
        Some(next)
    }

    fn delete(&self, id: &EntryId) -> Option<Snapshot> {
        let Some(entry) = self.entries.get(id) else {
            tracing::debug!(%id, "Ignoring delete of unknown entry");
            return None;
        };
        let removed: HashSet<EntryId> = self.subtree(id).into_iter().collect();
        let mut next = self.clone();
        next.detach(entry.parent_id.as_ref(), id);
        for removed_id in &removed {
            next.entries.remove(removed_id);
            next.children.remove(removed_id);
        }
        next.recent.retain(|recent| !removed.contains(recent));
        if next.current_folder.as_ref().is_some_and(|current| removed.contains(current)) {
            next.current_folder = entry.parent_id.clone();
        }
        tracing::info!(%id, removed = removed.len(), "Deleted entry and its subtree");
        Some(next)
    }

    fn toggle_share(&self, id: &EntryId, ctx: &Context) -> Option<Snapshot> {
        if !self.entries.contains_key(id) {
            tracing::debug!(%id, "Ignoring share toggle of unknown entry");
            return None;
        }
        let mut next = self.clone();
        let entry = next.entries.get_mut(id)?;
        entry.shared = !entry.shared;
        entry.touch(ctx.now);
        Some(next)
    }

    fn reorder(&self, id: &EntryId, new_index: usize, ctx: &Context) -> Option<Snapshot> {
        let parent = self.current_folder.as_ref();
        let mut siblings = self.child_ids(parent).to_vec();
        let Some(old_index) = siblings.iter().position(|sibling| sibling == id) else {
            tracing::debug!(%id, "Ignoring reorder of entry outside the current folder");
            return None;
        };
        let moved = siblings.remove(old_index);
        siblings.insert(new_index.min(siblings.len()), moved);

        let mut next = self.clone();
        let mut changed = old_index != new_index.min(siblings.len() - 1);
        for (position, sibling) in siblings.iter().enumerate() {
            if let Some(entry) = next.entries.get_mut(sibling)
                && entry.order != Some(position)
            {
                entry.order = Some(position);
                entry.touch(ctx.now);
                changed = true;
            }
        }
        if !changed {
            return None;
        }
        *next.siblings_mut(parent) = siblings;
        Some(next)
    }

    fn move_entry(&self, id: &EntryId, destination: Option<EntryId>, ctx: &Context) -> Result<Option<Snapshot>> {
        let Some(entry) = self.entries.get(id) else {
            tracing::debug!(%id, "Ignoring move of unknown entry");
            return Ok(None);
        };
        if let Some(destination) = &destination {
            let Some(folder) = self.entries.get(destination) else {
                tracing::debug!(%id, %destination, "Ignoring move into unknown folder");
                return Ok(None);
            };
            if !folder.is_folder() {
                tracing::warn!(%id, %destination, "Rejected move into a file");
                exn::bail!(ErrorKind::NotAFolder(destination.clone()));
            }
            if destination == id || self.is_descendant(destination, id) {
                tracing::warn!(%id, %destination, "Rejected move into own subtree");
                exn::bail!(ErrorKind::Cycle { entry: id.clone(), destination: destination.clone() });
            }
        }
        if entry.parent_id == destination {
            return Ok(None);
        }

        let mut next = self.clone();
        next.detach(entry.parent_id.as_ref(), id);
        next.attach(destination.as_ref(), id.clone());
        if let Some(moved) = next.entries.get_mut(id) {
            moved.parent_id = destination;
            // Its position belonged to the old sibling set.
            moved.order = None;
            moved.touch(ctx.now);
        }
        Ok(Some(next))
    }

    fn set_current_folder(&self, folder: Option<EntryId>) -> Option<Snapshot> {
        if self.current_folder == folder {
            return None;
        }
        Some(Snapshot { current_folder: folder, ..self.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use rstest::{fixture, rstest};
    use time::Duration;

    fn ctx() -> Context {
        Context::new(UtcDateTime::now())
    }

    fn apply(snapshot: &Snapshot, action: Action) -> Snapshot {
        let next = snapshot.reduce(action, &ctx()).unwrap().expect("action should change the snapshot");
        next.assert_index_consistent();
        next
    }

    fn at(snapshot: Snapshot, folder: Option<&str>) -> Snapshot {
        Snapshot { current_folder: folder.map(EntryId::from), ..snapshot }
    }

    fn ids<'a>(entries: impl Iterator<Item = &'a crate::Entry>) -> Vec<&'a str> {
        entries.map(|entry| entry.id.as_str()).collect()
    }

    /// Root: `f1/` (containing `a`, `b`, `c` and `f2/` containing `d`) and `x1`.
    #[fixture]
    fn tree() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot = apply(&snapshot, Action::AddEntry(NewEntry::folder("Documents").with_id("f1")));
        snapshot = apply(&snapshot, Action::AddEntry(NewEntry::file("loose.txt").with_id("x1")));
        snapshot = at(snapshot, Some("f1"));
        for id in ["a", "b", "c"] {
            snapshot = apply(&snapshot, Action::AddEntry(NewEntry::file(format!("{id}.txt")).with_id(id)));
        }
        snapshot = apply(&snapshot, Action::AddEntry(NewEntry::folder("Nested").with_id("f2")));
        snapshot = at(snapshot, Some("f2"));
        snapshot = apply(&snapshot, Action::AddEntry(NewEntry::file("deep.txt").with_id("d")));
        at(snapshot, None)
    }

    #[test]
    fn test_add_attaches_to_current_folder() {
        let snapshot = at(Snapshot::default(), Some("f1"));
        let next = apply(&snapshot, Action::AddEntry(NewEntry::file("report.txt").with_id("a1")));
        let entry = next.get(&EntryId::from("a1")).unwrap();
        assert_eq!(entry.parent_id, Some(EntryId::from("f1")));
        assert_eq!(entry.kind, EntryKind::File);
        assert!(entry.modified_at.is_none());
    }

    #[test]
    fn test_add_generates_id() {
        let next = apply(&Snapshot::default(), Action::AddEntry(NewEntry::folder("Photos")));
        assert_eq!(next.len(), 1);
        assert_eq!(next.recent().count(), 1);
    }

    #[rstest]
    fn test_add_duplicate_id_rejected(tree: Snapshot) {
        let err = tree.reduce(Action::AddEntry(NewEntry::file("again").with_id("x1")), &ctx()).unwrap_err();
        assert_eq!(*err, ErrorKind::DuplicateId(EntryId::from("x1")));
    }

    #[test]
    fn test_recent_is_bounded_newest_first() {
        let mut snapshot = Snapshot::default();
        for i in 0..7 {
            snapshot = apply(&snapshot, Action::AddEntry(NewEntry::file(format!("{i}.txt")).with_id(i.to_string())));
        }
        assert_eq!(ids(snapshot.recent()), ["6", "5", "4", "3", "2"]);
    }

    #[test]
    fn test_recent_limit_from_context() {
        let ctx = Context { recent_limit: 2, ..ctx() };
        let mut snapshot = Snapshot::default();
        for i in 0..3 {
            let action = Action::AddEntry(NewEntry::file(format!("{i}.txt")).with_id(i.to_string()));
            snapshot = snapshot.reduce(action, &ctx).unwrap().unwrap();
        }
        assert_eq!(ids(snapshot.recent()), ["2", "1"]);
    }

    #[rstest]
    fn test_empty_update_still_stamps(tree: Snapshot) {
        let next = apply(&tree, Action::UpdateEntry { id: EntryId::from("x1"), update: EntryUpdate::default() });
        assert!(next.get(&EntryId::from("x1")).unwrap().modified_at.is_some());
    }

    #[rstest]
    #[case(Action::UpdateEntry { id: EntryId::from("nope"), update: EntryUpdate::rename("x") })]
    #[case(Action::DeleteEntry(EntryId::from("nope")))]
    #[case(Action::ToggleShare(EntryId::from("nope")))]
    #[case(Action::ReorderEntries { id: EntryId::from("nope"), new_index: 0 })]
    #[case(Action::MoveEntry { id: EntryId::from("nope"), destination: None })]
    #[case(Action::MoveEntry { id: EntryId::from("x1"), destination: Some(EntryId::from("nope")) })]
    #[case(Action::SetCurrentFolder(None))]
    fn test_unknown_references_are_noops(tree: Snapshot, #[case] action: Action) {
        assert!(tree.reduce(action, &ctx()).unwrap().is_none());
    }

    #[rstest]
    fn test_delete_removes_whole_subtree(tree: Snapshot) {
        let next = apply(&tree, Action::DeleteEntry(EntryId::from("f1")));
        assert_eq!(ids(next.children(None)), ["x1"]);
        assert_eq!(next.len(), 1);
        for gone in ["f1", "a", "b", "c", "f2", "d"] {
            assert!(!next.contains(&EntryId::from(gone)), "{gone} should be deleted");
        }
        // x1 was already pushed out of the bounded list by the later adds.
        assert_eq!(next.recent().count(), 0);
    }

    #[rstest]
    fn test_delete_keeps_surviving_recent_entries(tree: Snapshot) {
        assert_eq!(ids(tree.recent()), ["d", "f2", "c", "b", "a"]);
        let next = apply(&tree, Action::DeleteEntry(EntryId::from("f2")));
        assert_eq!(ids(next.recent()), ["c", "b", "a"]);
        assert_eq!(ids(next.children(Some(&EntryId::from("f1")))), ["a", "b", "c"]);
    }

    #[rstest]
    fn test_delete_moves_cursor_out_of_removed_subtree(tree: Snapshot) {
        let inside = at(tree, Some("f2"));
        let next = apply(&inside, Action::DeleteEntry(EntryId::from("f1")));
        assert_eq!(next.current_folder(), None);

        let next = apply(&inside, Action::DeleteEntry(EntryId::from("f2")));
        assert_eq!(next.current_folder(), Some(&EntryId::from("f1")));
    }

    #[rstest]
    fn test_toggle_share(tree: Snapshot) {
        let once = apply(&tree, Action::ToggleShare(EntryId::from("x1")));
        assert!(once.get(&EntryId::from("x1")).unwrap().shared);
        let twice = apply(&once, Action::ToggleShare(EntryId::from("x1")));
        assert!(!twice.get(&EntryId::from("x1")).unwrap().shared);
        assert!(twice.get(&EntryId::from("x1")).unwrap().modified_at.is_some());
    }

    #[rstest]
    #[case("a", 2, ["b", "c", "a", "f2"])]
    #[case("c", 0, ["c", "a", "b", "f2"])]
    #[case("f2", 1, ["a", "f2", "b", "c"])]
    #[case("a", 99, ["b", "c", "f2", "a"])]
    fn test_reorder(tree: Snapshot, #[case] id: &str, #[case] new_index: usize, #[case] expected: [&str; 4]) {
        let folder = at(tree, Some("f1"));
        let next = apply(&folder, Action::ReorderEntries { id: EntryId::from(id), new_index });
        assert_eq!(ids(next.current_children()), expected);
        let orders: Vec<_> = next.current_children().map(|entry| entry.order).collect();
        assert_eq!(orders, [Some(0), Some(1), Some(2), Some(3)]);
        // Nothing outside the sibling set is touched.
        assert_eq!(next.get(&EntryId::from("x1")), folder.get(&EntryId::from("x1")));
        assert_eq!(next.get(&EntryId::from("d")), folder.get(&EntryId::from("d")));
    }

    #[rstest]
    fn test_reorder_only_within_current_folder(tree: Snapshot) {
        // `a` lives in f1 but the cursor is at the root.
        assert!(tree.reduce(Action::ReorderEntries { id: EntryId::from("a"), new_index: 0 }, &ctx()).unwrap().is_none());
    }

    #[rstest]
    fn test_reorder_in_place_after_reorder_is_noop(tree: Snapshot) {
        let folder = at(tree, Some("f1"));
        let next = apply(&folder, Action::ReorderEntries { id: EntryId::from("b"), new_index: 0 });
        assert!(next.reduce(Action::ReorderEntries { id: EntryId::from("b"), new_index: 0 }, &ctx()).unwrap().is_none());
    }

    #[rstest]
    fn test_move_to_folder(tree: Snapshot) {
        let next = apply(&tree, Action::MoveEntry { id: EntryId::from("x1"), destination: Some(EntryId::from("f2")) });
        assert_eq!(ids(next.children(Some(&EntryId::from("f2")))), ["d", "x1"]);
        assert_eq!(ids(next.children(None)), ["f1"]);
        let moved = next.get(&EntryId::from("x1")).unwrap();
        assert_eq!(moved.parent_id, Some(EntryId::from("f2")));
        assert!(moved.modified_at.is_some());
    }

    #[rstest]
    fn test_move_to_root(tree: Snapshot) {
        let next = apply(&tree, Action::MoveEntry { id: EntryId::from("d"), destination: None });
        assert_eq!(ids(next.children(None)), ["f1", "x1", "d"]);
        // f2 is now empty; its sibling list is dropped from the index.
        assert_eq!(next.children(Some(&EntryId::from("f2"))).count(), 0);
    }

    #[rstest]
    fn test_move_clears_stale_order(tree: Snapshot) {
        let folder = at(tree, Some("f1"));
        let next = apply(&folder, Action::ReorderEntries { id: EntryId::from("c"), new_index: 0 });
        let next = apply(&next, Action::MoveEntry { id: EntryId::from("c"), destination: None });
        assert_eq!(next.get(&EntryId::from("c")).unwrap().order, None);
    }

    #[rstest]
    #[case("f1", "f1")]
    #[case("f1", "f2")]
    fn test_move_into_own_subtree_rejected(tree: Snapshot, #[case] id: &str, #[case] destination: &str) {
        let action = Action::MoveEntry { id: EntryId::from(id), destination: Some(EntryId::from(destination)) };
        let err = tree.reduce(action, &ctx()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Cycle { .. }));
    }

    #[rstest]
    fn test_move_into_file_rejected(tree: Snapshot) {
        let action = Action::MoveEntry { id: EntryId::from("a"), destination: Some(EntryId::from("x1")) };
        let err = tree.reduce(action, &ctx()).unwrap_err();
        assert_eq!(*err, ErrorKind::NotAFolder(EntryId::from("x1")));
    }

    #[rstest]
    fn test_move_to_same_parent_is_noop(tree: Snapshot) {
        let action = Action::MoveEntry { id: EntryId::from("a"), destination: Some(EntryId::from("f1")) };
        assert!(tree.reduce(action, &ctx()).unwrap().is_none());
    }

    #[rstest]
    fn test_set_current_folder_is_unvalidated(tree: Snapshot) {
        let next = apply(&tree, Action::SetCurrentFolder(Some(EntryId::from("missing"))));
        assert_eq!(next.current_folder(), Some(&EntryId::from("missing")));
        assert_eq!(next.current_children().count(), 0);
    }

    #[rstest]
    fn test_stamps_move_forward(tree: Snapshot) {
        let id = EntryId::from("x1");
        let created = tree.get(&id).unwrap().created_at;
        let later = Context::new(created + Duration::hours(1));
        let next = tree.reduce(Action::ToggleShare(id.clone()), &later).unwrap().unwrap();
        let first = next.get(&id).unwrap().modified_at.unwrap();
        // An earlier clock reading doesn't rewind it.
        let earlier = Context::new(created);
        let next = next.reduce(Action::ToggleShare(id.clone()), &earlier).unwrap().unwrap();
        let entry = next.get(&id).unwrap();
        assert_eq!(entry.created_at, created);
        assert_eq!(entry.modified_at, Some(first));
    }
}
