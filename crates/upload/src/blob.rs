//! Sources of uploaded bytes.

use async_trait::async_trait;
use std::io::Result as IoResult;

/// A file picked for upload: a name, an optionally declared MIME type, a
/// size known up front, and bytes that may take a while to arrive.
///
/// # Examples
///
/// ```
/// use filebox_upload::{Blob, MemoryBlob};
///
/// async fn describe(blob: &dyn Blob) -> std::io::Result<String> {
///     let bytes = blob.read().await?;
///     Ok(format!("{} ({} bytes)", blob.name(), bytes.len()))
/// }
/// ```
#[async_trait]
pub trait Blob: Send + Sync {
    /// File name as chosen by the user, extension included.
    fn name(&self) -> &str;

    /// MIME type declared by whatever produced the blob, if any.
    fn mime_type(&self) -> Option<&str>;

    /// Size in bytes, as reported before reading.
    fn size(&self) -> u64;

    /// Read the full contents.
    async fn read(&self) -> IoResult<Vec<u8>>;
}

/// A blob whose bytes are already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlob {
    name: String,
    mime_type: Option<String>,
    data: Vec<u8>,
}

impl MemoryBlob {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            data: data.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

#[async_trait]
impl Blob for MemoryBlob {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read(&self) -> IoResult<Vec<u8>> {
        Ok(self.data.clone())
    }
}
