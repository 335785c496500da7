//! In-memory file/folder tree.
//!
//! The [`Store`] owns the current [`Snapshot`] of the tree and changes it
//! only through [`Store::dispatch`], which applies one [`Action`] at a time
//! as a pure transition ([`Snapshot::reduce`]) and publishes the result.
//!
//! # Architecture
//! - **Entries** live in an arena keyed by [`EntryId`]. Each entry points at
//!   its parent; the snapshot keeps an adjacency index (parent → ordered
//!   children) in step with those pointers, so listing a folder never scans
//!   the whole tree.
//! - **Failures are quiet**: actions that reference an unknown id leave the
//!   snapshot as it was. Only moves that would corrupt the tree and duplicate
//!   ids are rejected with an [`error::ErrorKind`].
//! - **Deletes cascade** through the whole subtree.
//! - **Views** ([`search`], [`Snapshot::listing`], [`Snapshot::breadcrumbs`],
//!   [`Snapshot::move_candidates`]) are computed from a snapshot on demand.

mod action;
mod clock;
mod entry;
pub mod error;
mod navigate;
mod reduce;
mod search;
mod snapshot;
mod store;

pub use crate::action::Action;
#[cfg(any(test, feature = "mock"))]
pub use crate::clock::ManualClock;
pub use crate::clock::{Clock, SystemClock, format_timestamp};
pub use crate::entry::{DEFAULT_OWNER, DEFAULT_PERMISSIONS, Entry, EntryId, EntryKind, EntryUpdate, NewEntry};
pub use crate::navigate::Tab;
pub use crate::reduce::{Context, DEFAULT_RECENT_LIMIT};
pub use crate::search::search;
pub use crate::snapshot::Snapshot;
pub use crate::store::Store;
