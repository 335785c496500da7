use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use filebox_config::Config;
use filebox_store::{Action, Clock, Entry, EntryId, EntryUpdate, NewEntry, Snapshot, Store, Tab};
use filebox_upload::{Blob, Upload, UploadPipeline};
use std::sync::Arc;
use tracing::instrument;

/// A file's content, decoded and ready to be saved somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// The application root: one store and the configuration it was opened with.
///
/// Every mutating method dispatches at most one [`Action`] and returns the
/// snapshot that is current afterwards. Methods that take an id treat
/// unknown ids as no-ops, exactly like the store.
///
/// # Examples
///
/// ```
/// use filebox::Session;
/// use filebox_config::Config;
/// use filebox_store::Tab;
///
/// let mut session = Session::new(Config::default());
/// let photos = session.create_folder("Photos").unwrap();
/// session.open(&photos).unwrap();
/// session.create_file("beach.txt", "", None).unwrap();
///
/// let names: Vec<_> = session.state().listing(Tab::MyFiles, "").iter().map(|e| e.name.clone()).collect();
/// assert_eq!(names, ["beach.txt"]);
/// ```
#[derive(Debug)]
pub struct Session {
    store: Store,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let store = Store::default().with_recent_limit(config.recent_limit);
        Self { store, config }
    }

    /// Open a session with configuration loaded from the usual sources.
    pub fn load(explicit_config: Option<&std::path::Path>) -> Result<Self> {
        let config = Config::load(explicit_config).or_raise(|| ErrorKind::Config)?;
        Ok(Self::new(config))
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.store = std::mem::take(&mut self.store).with_clock(clock).with_recent_limit(self.config.recent_limit);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    pub fn state(&self) -> &Snapshot {
        self.store.state()
    }

    fn dispatch(&mut self, action: Action) -> Result<Arc<Snapshot>> {
        self.store.dispatch(action).or_raise(|| ErrorKind::Store)
    }

    fn stamp_owner(&self, entry: NewEntry) -> NewEntry {
        entry.with_owner(self.config.owner.clone()).with_permissions(self.config.permissions.clone())
    }

    /// Create a folder inside the current folder.
    #[instrument(skip(self))]
    pub fn create_folder(&mut self, name: &str) -> Result<EntryId> {
        let name = valid_name(name)?;
        let id = EntryId::generate();
        let folder = self.stamp_owner(NewEntry::folder(name).with_id(id.clone()));
        self.dispatch(Action::AddEntry(folder))?;
        tracing::info!(%id, "Folder created");
        Ok(id)
    }

    /// Create a file inside the current folder, with uploaded content if any.
    ///
    /// Without content the file is an empty text file.
    #[instrument(skip(self, upload), fields(has_content = upload.is_some()))]
    pub fn create_file(&mut self, name: &str, description: &str, upload: Option<Upload>) -> Result<EntryId> {
        let name = valid_name(name)?;
        let id = EntryId::generate();
        let mut file = upload.map_or_else(|| NewEntry::file(name), Upload::into_new_entry);
        file.name = name.to_string();
        if !description.is_empty() {
            file = file.with_description(description);
        }
        let file = self.stamp_owner(file.with_id(id.clone()));
        self.dispatch(Action::AddEntry(file))?;
        tracing::info!(%id, "File created");
        Ok(id)
    }

    pub fn rename(&mut self, id: &EntryId, name: &str) -> Result<Arc<Snapshot>> {
        let name = valid_name(name)?;
        self.dispatch(Action::UpdateEntry { id: id.clone(), update: EntryUpdate::rename(name) })
    }

    pub fn describe(&mut self, id: &EntryId, description: &str) -> Result<Arc<Snapshot>> {
        let update = EntryUpdate::default().with_description(description);
        self.dispatch(Action::UpdateEntry { id: id.clone(), update })
    }

    /// Swap a file's content for an upload. The file takes the upload's name.
    ///
    /// Folders are left alone.
    pub fn replace_content(&mut self, id: &EntryId, upload: Upload) -> Result<Arc<Snapshot>> {
        if !self.state().get(id).is_some_and(Entry::is_file) {
            tracing::debug!(%id, "Ignoring content replacement for a non-file");
            return Ok(self.snapshot());
        }
        self.dispatch(Action::UpdateEntry { id: id.clone(), update: upload.into_update() })
    }

    /// A pipeline for picking a new file, limited by the configured maximum size.
    pub fn upload_pipeline(&self) -> UploadPipeline {
        UploadPipeline::new().with_max_bytes(self.config.upload.max_bytes)
    }

    /// A pipeline for replacing `id`'s content, starting from its current classification.
    pub fn replacement_pipeline(&self, id: &EntryId) -> UploadPipeline {
        let pipeline = self.upload_pipeline();
        match self.state().get(id).and_then(|entry| entry.file_type.clone()) {
            Some(file_type) => pipeline.with_initial_file_type(file_type),
            None => pipeline,
        }
    }

    /// Read `blob` and create a file from it in the current folder.
    pub async fn upload_file(&mut self, blob: &dyn Blob, description: &str) -> Result<EntryId> {
        let upload = self.upload_pipeline().select(blob).await.or_raise(|| ErrorKind::Upload)?;
        let name = upload.name.clone();
        self.create_file(&name, description, Some(upload))
    }

    /// Read `blob` and make it the new content of `id`.
    pub async fn upload_replacement(&mut self, id: &EntryId, blob: &dyn Blob) -> Result<Arc<Snapshot>> {
        let upload = self.replacement_pipeline(id).select(blob).await.or_raise(|| ErrorKind::Upload)?;
        self.replace_content(id, upload)
    }

    pub fn toggle_share(&mut self, id: &EntryId) -> Result<Arc<Snapshot>> {
        self.dispatch(Action::ToggleShare(id.clone()))
    }

    /// Delete an entry along with everything inside it.
    pub fn delete(&mut self, id: &EntryId) -> Result<Arc<Snapshot>> {
        self.dispatch(Action::DeleteEntry(id.clone()))
    }

    /// Move an entry into `destination`, or to the root when `None`.
    pub fn move_to(&mut self, id: &EntryId, destination: Option<&EntryId>) -> Result<Arc<Snapshot>> {
        self.dispatch(Action::MoveEntry { id: id.clone(), destination: destination.cloned() })
    }

    /// Open an entry: folders become the current folder, files are returned
    /// for display.
    pub fn open(&mut self, id: &EntryId) -> Result<Option<Entry>> {
        let Some(entry) = self.state().get(id) else {
            return Ok(None);
        };
        if entry.is_file() {
            return Ok(Some(entry.clone()));
        }
        self.dispatch(Action::SetCurrentFolder(Some(id.clone())))?;
        Ok(None)
    }

    /// Go to the current folder's parent (the root from a top-level folder).
    pub fn navigate_up(&mut self) -> Result<Arc<Snapshot>> {
        let parent = self.state().parent_of_current().cloned();
        self.dispatch(Action::SetCurrentFolder(parent))
    }

    pub fn navigate_home(&mut self) -> Result<Arc<Snapshot>> {
        self.dispatch(Action::SetCurrentFolder(None))
    }

    /// Resolve a drag of `active` released over `over` in the listing shown
    /// for `tab` and `query`.
    ///
    /// Dropping onto another folder moves the entry into it. Otherwise the
    /// entry takes `over`'s position among the current folder's children.
    /// Dropping onto itself, or over something that isn't visible, does
    /// nothing.
    #[instrument(skip(self))]
    pub fn drop_on(&mut self, active: &EntryId, over: &EntryId, tab: Tab, query: &str) -> Result<Arc<Snapshot>> {
        let snapshot = self.snapshot();
        if active == over {
            return Ok(snapshot);
        }
        let listing = snapshot.listing(tab, query);
        let Some(target) = listing.iter().find(|entry| &entry.id == over) else {
            tracing::debug!("Drop target is not in the listing");
            return Ok(Arc::clone(&snapshot));
        };
        if target.is_folder() {
            return self.move_to(active, Some(over));
        }
        let siblings = snapshot.child_ids(snapshot.current_folder());
        let Some(new_index) = siblings.iter().position(|sibling| sibling == over) else {
            return Ok(Arc::clone(&snapshot));
        };
        self.dispatch(Action::ReorderEntries { id: active.clone(), new_index })
    }

    /// Decode a file's content for saving. `None` for folders, unknown ids
    /// and files that never had content uploaded.
    pub fn download(&self, id: &EntryId) -> Result<Option<Download>> {
        let Some(entry) = self.state().get(id).filter(|entry| entry.is_file()) else {
            return Ok(None);
        };
        let Some(content) = &entry.content_ref else {
            return Ok(None);
        };
        let bytes = content.decode().or_raise(|| ErrorKind::Content)?;
        Ok(Some(Download {
            file_name: entry.name.clone(),
            bytes,
            mime_type: content.mime_type().to_string(),
        }))
    }
}

fn valid_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        exn::bail!(ErrorKind::InvalidName);
    }
    Ok(name)
}
