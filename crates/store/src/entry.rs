//! Entry models.
//!
//! An [`Entry`] is either a file or a folder; the two share one record and
//! are told apart by [`EntryKind`]. Folders don't own a list of children:
//! membership is the entry's `parent_id`, indexed by the
//! [`Snapshot`](crate::Snapshot).

use derive_more::Display;
use filebox_content::{DataUri, EMPTY_FILE_SIZE_LABEL, FOLDER_SIZE_LABEL, FileType};
use time::UtcDateTime;

/// Placeholder owner; there is no identity model.
pub const DEFAULT_OWNER: &str = "You";
/// Cosmetic permissions label given to new entries. Never enforced.
pub const DEFAULT_PERMISSIONS: &str = "Read/Write";

/// Opaque, immutable entry identifier.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(String);
impl EntryId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    #[display("file")]
    File,
    #[display("folder")]
    Folder,
}

/// A file or folder record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub kind: EntryKind,
    /// Human-readable size; [`FOLDER_SIZE_LABEL`] for folders.
    pub size_label: String,
    pub permissions_label: String,
    pub owner: String,
    pub shared: bool,
    /// Owning folder, or `None` at the root.
    pub parent_id: Option<EntryId>,
    /// Position among siblings as of the last reorder in their folder.
    pub order: Option<usize>,
    pub file_type: Option<FileType>,
    pub description: Option<String>,
    pub content_ref: Option<DataUri>,
    /// Set once, when the entry is added.
    pub created_at: UtcDateTime,
    /// `None` until the entry is first mutated; never moves backwards.
    pub modified_at: Option<UtcDateTime>,
}
impl Entry {
    #[inline]
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Record a mutation at `now`, without ever moving the stamp backwards.
    pub(crate) fn touch(&mut self, now: UtcDateTime) {
        let floor = self.modified_at.unwrap_or(self.created_at);
        self.modified_at = Some(now.max(floor));
    }
}

/// Payload of [`Action::AddEntry`](crate::Action::AddEntry).
///
/// The parent and timestamps are not part of the payload: the store attaches
/// new entries to the current folder and stamps them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Leave empty to let the store generate an id.
    pub id: Option<EntryId>,
    pub name: String,
    pub kind: EntryKind,
    pub size_label: String,
    pub permissions_label: String,
    pub owner: String,
    pub shared: bool,
    pub file_type: Option<FileType>,
    pub description: Option<String>,
    pub content_ref: Option<DataUri>,
}
impl NewEntry {
    fn new(name: impl Into<String>, kind: EntryKind, size_label: &str) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            size_label: size_label.to_string(),
            permissions_label: DEFAULT_PERMISSIONS.to_string(),
            owner: DEFAULT_OWNER.to_string(),
            shared: false,
            file_type: None,
            description: None,
            content_ref: None,
        }
    }

    /// An empty file, assumed to be plain text until content is uploaded.
    pub fn file(name: impl Into<String>) -> Self {
        Self { file_type: Some(FileType::plain_text()), ..Self::new(name, EntryKind::File, EMPTY_FILE_SIZE_LABEL) }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::Folder, FOLDER_SIZE_LABEL)
    }

    pub fn with_id(mut self, id: impl Into<EntryId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_permissions(mut self, permissions: impl Into<String>) -> Self {
        self.permissions_label = permissions.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach uploaded content along with its classification and size label.
    pub fn with_content(mut self, content_ref: DataUri, file_type: FileType, size_label: impl Into<String>) -> Self {
        self.content_ref = Some(content_ref);
        self.file_type = Some(file_type);
        self.size_label = size_label.into();
        self
    }

    pub(crate) fn into_entry(self, id: EntryId, parent_id: Option<EntryId>, now: UtcDateTime) -> Entry {
        Entry {
            id,
            name: self.name,
            kind: self.kind,
            size_label: self.size_label,
            permissions_label: self.permissions_label,
            owner: self.owner,
            shared: self.shared,
            parent_id,
            order: None,
            file_type: self.file_type,
            description: self.description,
            content_ref: self.content_ref,
            created_at: now,
            modified_at: None,
        }
    }
}

/// Per-field partial update for [`Action::UpdateEntry`](crate::Action::UpdateEntry).
///
/// Every `Some` field replaces the entry's value; `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub name: Option<String>,
    pub size_label: Option<String>,
    pub permissions_label: Option<String>,
    pub description: Option<String>,
    pub file_type: Option<FileType>,
    pub content_ref: Option<DataUri>,
}
impl EntryUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the entry's content along with its classification and size label.
    pub fn with_content(mut self, content_ref: DataUri, file_type: FileType, size_label: impl Into<String>) -> Self {
        self.content_ref = Some(content_ref);
        self.file_type = Some(file_type);
        self.size_label = Some(size_label.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(self, entry: &mut Entry) {
        let Self { name, size_label, permissions_label, description, file_type, content_ref } = self;
        if let Some(name) = name {
            entry.name = name;
        }
        if let Some(size_label) = size_label {
            entry.size_label = size_label;
        }
        if let Some(permissions_label) = permissions_label {
            entry.permissions_label = permissions_label;
        }
        if description.is_some() {
            entry.description = description;
        }
        if file_type.is_some() {
            entry.file_type = file_type;
        }
        if content_ref.is_some() {
            entry.content_ref = content_ref;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::Duration;

    fn entry(now: UtcDateTime) -> Entry {
        NewEntry::file("report.txt").into_entry(EntryId::from("a1"), None, now)
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: Vec<_> = (0..100).map(|_| EntryId::generate()).collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[rstest]
    #[case(EntryKind::File, "file")]
    #[case(EntryKind::Folder, "folder")]
    fn test_entry_kind_display(#[case] kind: EntryKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[test]
    fn test_new_entry_defaults() {
        let folder = NewEntry::folder("Photos");
        assert_eq!(folder.size_label, "--");
        assert_eq!(folder.owner, "You");
        assert_eq!(folder.permissions_label, "Read/Write");
        assert!(folder.file_type.is_none());
        let file = NewEntry::file("notes.txt");
        assert_eq!(file.size_label, "0 KB");
        assert_eq!(file.file_type.unwrap().display_name, "Text File");
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let now = UtcDateTime::now();
        let mut entry = entry(now);
        assert!(entry.modified_at.is_none());
        entry.touch(now + Duration::seconds(10));
        assert_eq!(entry.modified_at, Some(now + Duration::seconds(10)));
        // A clock that went backwards doesn't rewind the stamp.
        entry.touch(now - Duration::seconds(10));
        assert_eq!(entry.modified_at, Some(now + Duration::seconds(10)));
    }

    #[test]
    fn test_update_only_replaces_present_fields() {
        let mut entry = entry(UtcDateTime::now());
        EntryUpdate::rename("final.txt").apply_to(&mut entry);
        assert_eq!(entry.name, "final.txt");
        assert_eq!(entry.size_label, "0 KB");
        assert!(entry.description.is_none());

        EntryUpdate::default().with_description("Quarterly numbers").apply_to(&mut entry);
        assert_eq!(entry.name, "final.txt");
        assert_eq!(entry.description.as_deref(), Some("Quarterly numbers"));
    }

    #[test]
    fn test_empty_update() {
        assert!(EntryUpdate::default().is_empty());
        assert!(!EntryUpdate::rename("x").is_empty());
    }
}
