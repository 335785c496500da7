/// Size label shown for folders, which have no meaningful size.
pub const FOLDER_SIZE_LABEL: &str = "--";
/// Size label shown for files created without any uploaded content.
pub const EMPTY_FILE_SIZE_LABEL: &str = "0 KB";

/// Human-readable size of uploaded content, always in kilobytes with two
/// decimal places (`"1.50 KB"`).
#[inline]
#[must_use]
pub fn size_label(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}
