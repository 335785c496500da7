use crate::entry::{EntryId, EntryUpdate, NewEntry};

/// A state transition request, applied with [`Store::dispatch`](crate::Store::dispatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Add a new entry to the current folder.
    AddEntry(NewEntry),
    /// Merge a partial update into an entry; always stamps `modified_at`.
    UpdateEntry { id: EntryId, update: EntryUpdate },
    /// Remove an entry and everything beneath it.
    DeleteEntry(EntryId),
    /// Flip an entry's `shared` flag.
    ToggleShare(EntryId),
    /// Move an entry to `new_index` among the current folder's children.
    ReorderEntries { id: EntryId, new_index: usize },
    /// Re-parent an entry; `None` moves it to the root.
    MoveEntry { id: EntryId, destination: Option<EntryId> },
    /// Change the folder new entries are added to and listings are read from.
    SetCurrentFolder(Option<EntryId>),
}
impl Action {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddEntry(_) => "add_entry",
            Action::UpdateEntry { .. } => "update_entry",
            Action::DeleteEntry(_) => "delete_entry",
            Action::ToggleShare(_) => "toggle_share",
            Action::ReorderEntries { .. } => "reorder_entries",
            Action::MoveEntry { .. } => "move_entry",
            Action::SetCurrentFolder(_) => "set_current_folder",
        }
    }
}
