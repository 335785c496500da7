//! An in-memory virtual file manager.
//!
//! [`Session`] is the entry point: it owns the file tree
//! ([`filebox_store`]) and the configuration it was opened with
//! ([`filebox_config`]), validates user input, turns picked files into
//! content ([`filebox_upload`]) and decodes stored content back for
//! downloads.

pub mod error;
mod session;

pub use crate::session::{Download, Session};
