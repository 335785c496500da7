//! File content helpers shared by the store and the upload pipeline.
//!
//! - **Classification** of an uploaded blob from its file name and declared
//!   MIME type ([`FileType::classify`]).
//! - **Data URIs** ([`DataUri`]), the in-memory representation of file
//!   content, used for previews and downloads.
//! - **Size labels** ([`size_label`]), the human-readable sizes shown next
//!   to entries.
//!
//! Everything in this crate is pure and total except decoding a data URI,
//! which can fail on malformed input.

mod classify;
mod datauri;
pub mod error;
mod size;

pub use crate::datauri::DataUri;
pub use crate::size::{EMPTY_FILE_SIZE_LABEL, FOLDER_SIZE_LABEL, size_label};

/// MIME type used when a blob does not declare one.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Descriptive classification of a file's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileType {
    /// Declared MIME type, or [`OCTET_STREAM`] when none was declared.
    pub mime_type: String,
    /// Lowercase text after the last `.` of the file name; empty if there is none.
    pub extension: String,
    /// Human-readable name, e.g. "PNG Image".
    pub display_name: String,
}
impl FileType {
    /// Classification assumed for a file created without uploaded content.
    #[must_use]
    pub fn plain_text() -> Self {
        Self {
            mime_type: "text/plain".to_string(),
            extension: "txt".to_string(),
            display_name: "Text File".to_string(),
        }
    }

    /// Whether a preview can render this content as an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}
