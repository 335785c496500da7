use crate::action::Action;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::reduce::{Context, DEFAULT_RECENT_LIMIT};
use crate::snapshot::Snapshot;
use std::sync::Arc;
use tracing::instrument;

/// Owner of the current [`Snapshot`] and the only way to change it.
///
/// [`dispatch`](Self::dispatch) takes `&mut self`, so transitions are
/// serialized by whoever owns the store. Published snapshots are shared via
/// [`Arc`] and never mutated; an action that changes nothing hands back the
/// very same `Arc`, so callers can detect change with [`Arc::ptr_eq`].
///
/// # Examples
///
/// ```
/// use filebox_store::{Action, EntryId, NewEntry, Store};
/// use std::sync::Arc;
///
/// let mut store = Store::default();
/// let before = store.snapshot();
/// let after = store.dispatch(Action::AddEntry(NewEntry::file("report.txt").with_id("a1"))).unwrap();
/// assert!(!Arc::ptr_eq(&before, &after));
///
/// // Unknown ids are ignored.
/// let unchanged = store.dispatch(Action::DeleteEntry(EntryId::from("missing"))).unwrap();
/// assert!(Arc::ptr_eq(&after, &unchanged));
/// ```
pub struct Store {
    snapshot: Arc<Snapshot>,
    clock: Box<dyn Clock>,
    recent_limit: usize,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("entries", &self.snapshot.len())
            .field("current_folder", &self.snapshot.current_folder())
            .field("recent_limit", &self.recent_limit)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Start from an existing snapshot, using wall-clock time.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(initial),
            clock: Box::new(SystemClock),
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Bound the number of entries kept in [`Snapshot::recent`] (at least one).
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit.max(1);
        self
    }

    /// The current snapshot, shared.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// The current snapshot, borrowed.
    pub fn state(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Apply `action` and publish the resulting snapshot.
    ///
    /// On error the current snapshot is left as it was.
    #[instrument(skip_all, fields(action = action.name(), changed))]
    pub fn dispatch(&mut self, action: Action) -> Result<Arc<Snapshot>> {
        let ctx = Context { now: self.clock.now(), recent_limit: self.recent_limit };
        let changed = match self.snapshot.reduce(action, &ctx)? {
            Some(next) => {
                self.snapshot = Arc::new(next);
                true
            },
            None => false,
        };
        tracing::Span::current().record("changed", changed);
        Ok(self.snapshot())
    }
}
