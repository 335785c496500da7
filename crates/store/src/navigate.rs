//! Read-only views used for folder navigation and the move picker.

use crate::entry::{Entry, EntryId};
use crate::search::search;
use crate::snapshot::Snapshot;

/// Which half of the current folder a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Entries that are not shared.
    #[default]
    MyFiles,
    /// Entries that are shared.
    Shared,
}
impl Tab {
    pub fn includes(&self, entry: &Entry) -> bool {
        match self {
            Tab::MyFiles => !entry.shared,
            Tab::Shared => entry.shared,
        }
    }
}

impl Snapshot {
    /// Children of the current folder shown under `tab`, narrowed by `query`.
    pub fn listing(&self, tab: Tab, query: &str) -> Vec<&Entry> {
        search(self.current_children().filter(|entry| tab.includes(entry)), query)
    }

    /// Folders from the root down to (and including) the current folder.
    ///
    /// Empty at the root. If the chain reaches an id that no longer exists,
    /// the trail starts below it.
    pub fn breadcrumbs(&self) -> Vec<&Entry> {
        let Some(current) = self.current_folder.as_ref().and_then(|id| self.get(id)) else {
            return Vec::new();
        };
        let mut trail: Vec<&Entry> = self.ancestors(&current.id).collect();
        trail.reverse();
        trail.push(current);
        trail
    }

    /// Where "navigate up" leads: the current folder's parent, or the root.
    pub fn parent_of_current(&self) -> Option<&EntryId> {
        self.current_folder.as_ref().and_then(|id| self.get(id)).and_then(|folder| folder.parent_id.as_ref())
    }

    /// Folders `id` can be moved into, sorted by name.
    ///
    /// Excludes the entry itself, its current parent and anything beneath it.
    /// The root is always a valid destination (unless the entry is already
    /// there) and is not part of the list.
    pub fn move_candidates(&self, id: &EntryId) -> Vec<&Entry> {
        let Some(entry) = self.get(id) else {
            return Vec::new();
        };
        let mut folders: Vec<&Entry> = self
            .entries()
            .filter(|folder| folder.is_folder())
            .filter(|folder| &folder.id != id && Some(&folder.id) != entry.parent_id.as_ref())
            .filter(|folder| !self.is_descendant(&folder.id, id))
            .collect();
        folders.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.id.cmp(&b.id)));
        folders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::entry::NewEntry;
    use crate::reduce::Context;
    use rstest::{fixture, rstest};
    use time::UtcDateTime;

    fn apply(snapshot: Snapshot, action: Action) -> Snapshot {
        snapshot.reduce(action, &Context::new(UtcDateTime::now())).unwrap().unwrap_or(snapshot)
    }

    fn cd(snapshot: Snapshot, folder: Option<&str>) -> Snapshot {
        apply(snapshot, Action::SetCurrentFolder(folder.map(EntryId::from)))
    }

    fn names(entries: Vec<&Entry>) -> Vec<&str> {
        entries.into_iter().map(|entry| entry.name.as_str()).collect()
    }

    /// `Work/` > `Projects/` > `Archive/`, plus `Personal/` and files.
    #[fixture]
    fn tree() -> Snapshot {
        let mut s = Snapshot::default();
        s = apply(s, Action::AddEntry(NewEntry::folder("Work").with_id("work")));
        s = apply(s, Action::AddEntry(NewEntry::folder("Personal").with_id("personal")));
        s = cd(s, Some("work"));
        s = apply(s, Action::AddEntry(NewEntry::folder("Projects").with_id("projects")));
        s = apply(s, Action::AddEntry(NewEntry::file("budget.xlsx").with_id("budget")));
        s = apply(s, Action::AddEntry(NewEntry::file("plan.txt").with_id("plan")));
        s = apply(s, Action::ToggleShare(EntryId::from("plan")));
        s = cd(s, Some("projects"));
        s = apply(s, Action::AddEntry(NewEntry::folder("Archive").with_id("archive")));
        cd(s, None)
    }

    #[rstest]
    #[case(Tab::MyFiles, "", &["Projects", "budget.xlsx"])]
    #[case(Tab::Shared, "", &["plan.txt"])]
    #[case(Tab::MyFiles, "BUD", &["budget.xlsx"])]
    #[case(Tab::Shared, "budget", &[])]
    fn test_listing(tree: Snapshot, #[case] tab: Tab, #[case] query: &str, #[case] expected: &[&str]) {
        let work = cd(tree, Some("work"));
        assert_eq!(names(work.listing(tab, query)), expected);
    }

    #[rstest]
    fn test_breadcrumbs(tree: Snapshot) {
        assert!(tree.breadcrumbs().is_empty());
        let deep = cd(tree, Some("archive"));
        assert_eq!(names(deep.breadcrumbs()), ["Work", "Projects", "Archive"]);
        assert_eq!(deep.parent_of_current(), Some(&EntryId::from("projects")));
    }

    #[rstest]
    fn test_breadcrumbs_for_dangling_cursor(tree: Snapshot) {
        let lost = cd(tree, Some("deleted-folder"));
        assert!(lost.breadcrumbs().is_empty());
        assert_eq!(lost.parent_of_current(), None);
    }

    #[rstest]
    fn test_parent_of_top_level_folder_is_root(tree: Snapshot) {
        let work = cd(tree, Some("work"));
        assert_eq!(work.parent_of_current(), None);
    }

    #[rstest]
    #[case("budget", &["Archive", "Personal", "Projects"])]
    #[case("work", &["Personal"])]
    #[case("projects", &["Personal"])]
    #[case("archive", &["Personal", "Work"])]
    #[case("unknown", &[])]
    fn test_move_candidates(tree: Snapshot, #[case] id: &str, #[case] expected: &[&str]) {
        assert_eq!(names(tree.move_candidates(&EntryId::from(id))), expected);
    }
}
