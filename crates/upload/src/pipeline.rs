use crate::blob::Blob;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use filebox_content::{DataUri, FileType, size_label};
use filebox_store::{EntryUpdate, NewEntry};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::instrument;

/// Content read from a blob, ready to be attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// The blob's file name.
    pub name: String,
    pub content_ref: DataUri,
    pub file_type: FileType,
    pub size_label: String,
}
impl Upload {
    /// Replace an existing file's content. The file also takes the blob's name.
    pub fn into_update(self) -> EntryUpdate {
        EntryUpdate::rename(self.name).with_content(self.content_ref, self.file_type, self.size_label)
    }

    /// A new file named after the blob, carrying its content.
    pub fn into_new_entry(self) -> NewEntry {
        NewEntry::file(self.name).with_content(self.content_ref, self.file_type, self.size_label)
    }
}

/// What the upload form currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pending {
    pub content_ref: Option<DataUri>,
    pub file_type: Option<FileType>,
    /// A blob is being read.
    pub is_processing: bool,
}

/// Turns selected blobs into [`Upload`]s while publishing progress.
///
/// Every [`select`](Self::select) and [`reset`](Self::reset) starts a new
/// generation. A read that finishes after its generation has been replaced
/// is discarded with [`ErrorKind::Superseded`] and leaves the pending state
/// to whoever replaced it.
#[derive(Debug)]
pub struct UploadPipeline {
    pending: watch::Sender<Pending>,
    generation: AtomicU64,
    initial_file_type: Option<FileType>,
    max_bytes: Option<u64>,
}

impl Default for UploadPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadPipeline {
    pub fn new() -> Self {
        Self {
            pending: watch::Sender::new(Pending::default()),
            generation: AtomicU64::new(0),
            initial_file_type: None,
            max_bytes: None,
        }
    }

    /// Start from (and [`reset`](Self::reset) back to) an existing file's
    /// classification, as when replacing that file's content.
    pub fn with_initial_file_type(mut self, file_type: FileType) -> Self {
        self.pending.send_modify(|pending| pending.file_type = Some(file_type.clone()));
        self.initial_file_type = Some(file_type);
        self
    }

    /// Reject blobs larger than `max_bytes` before reading them.
    pub fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Current pending state.
    pub fn pending(&self) -> Pending {
        self.pending.borrow().clone()
    }

    /// Watch the pending state for changes.
    pub fn subscribe(&self) -> watch::Receiver<Pending> {
        self.pending.subscribe()
    }

    /// Read `blob`, classify it and encode its content.
    ///
    /// On success the pending state shows the new content. A failed read is
    /// logged and clears `is_processing`; the previous content stays. So does
    /// dropping the returned future before it completes.
    #[instrument(skip_all, fields(name = blob.name(), size = blob.size(), generation))]
    pub async fn select(&self, blob: &dyn Blob) -> Result<Upload> {
        let size = blob.size();
        if let Some(max) = self.max_bytes
            && size > max
        {
            tracing::warn!(max, "Blob exceeds the upload limit");
            exn::bail!(ErrorKind::TooLarge { name: blob.name().to_string(), size, max });
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("generation", generation);
        self.pending.send_modify(|pending| pending.is_processing = true);
        let _processing = ProcessingGuard { pipeline: self, generation };

        let read = blob.read().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding read from a superseded selection");
            exn::bail!(ErrorKind::Superseded);
        }
        let bytes = match read.or_raise(|| ErrorKind::Read(blob.name().to_string())) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(error = ?err, "Error processing file");
                return Err(err);
            },
        };

        let file_type = FileType::classify(blob.name(), blob.mime_type());
        let content_ref = DataUri::encode(&file_type.mime_type, &bytes);
        tracing::debug!(mime_type = %file_type.mime_type, "Blob encoded");
        self.pending.send_replace(Pending {
            content_ref: Some(content_ref.clone()),
            file_type: Some(file_type.clone()),
            is_processing: false,
        });
        Ok(Upload {
            name: blob.name().to_string(),
            content_ref,
            file_type,
            size_label: size_label(size),
        })
    }

    /// Forget the current selection and abandon any read in flight.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.pending.send_replace(Pending {
            file_type: self.initial_file_type.clone(),
            ..Pending::default()
        });
    }
}

/// Clears `is_processing` when a selection ends without publishing content,
/// unless a newer selection or a reset has taken over the pending state.
struct ProcessingGuard<'a> {
    pipeline: &'a UploadPipeline,
    generation: u64,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if self.pipeline.generation.load(Ordering::SeqCst) == self.generation {
            self.pipeline
                .pending
                .send_if_modified(|pending| std::mem::replace(&mut pending.is_processing, false));
        }
    }
}
