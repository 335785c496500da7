use crate::{FileType, OCTET_STREAM};

impl FileType {
    /// Classify a blob from its file name and declared MIME type.
    ///
    /// Well-known MIME types get a fixed display name; anything else is
    /// described by its extension (`"MD File"`). Never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use filebox_content::FileType;
    ///
    /// let report = FileType::classify("Report.PDF", Some("application/pdf"));
    /// assert_eq!(report.extension, "pdf");
    /// assert_eq!(report.display_name, "PDF Document");
    ///
    /// let notes = FileType::classify("notes.md", None);
    /// assert_eq!(notes.mime_type, "application/octet-stream");
    /// assert_eq!(notes.display_name, "Binary File");
    /// ```
    #[must_use]
    pub fn classify(file_name: impl AsRef<str>, declared_mime: Option<&str>) -> Self {
        let extension = extension_of(file_name.as_ref());
        let mime_type = match declared_mime.map(str::trim) {
            Some(mime) if !mime.is_empty() => mime.to_string(),
            _ => OCTET_STREAM.to_string(),
        };
        let display_name = match known_display_name(&mime_type) {
            Some(name) => name.to_string(),
            None => format!("{} File", extension.to_uppercase()),
        };
        Self { mime_type, extension, display_name }
    }
}

fn extension_of(file_name: &str) -> String {
    file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()).unwrap_or_default()
}

fn known_display_name(mime_type: &str) -> Option<&'static str> {
    Some(match mime_type {
        // Images
        "image/jpeg" => "JPEG Image",
        "image/png" => "PNG Image",
        "image/gif" => "GIF Image",
        "image/svg+xml" => "SVG Image",
        // Documents
        "application/pdf" => "PDF Document",
        "application/msword" | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
            "Word Document"
        },
        // Text
        "text/plain" => "Text File",
        "text/html" => "HTML File",
        "text/css" => "CSS File",
        "text/javascript" => "JavaScript File",
        // Archives
        "application/zip" => "ZIP Archive",
        "application/x-rar-compressed" => "RAR Archive",
        OCTET_STREAM => "Binary File",
        _ => return None,
    })
}
