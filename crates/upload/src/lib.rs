//! Reading picked files into entry content.
//!
//! A [`Blob`] is read asynchronously by the [`UploadPipeline`], which
//! classifies it, encodes it as a data URI and hands back an [`Upload`]
//! that folds into either a new file or a content replacement. While the
//! read is in flight the pipeline publishes a [`Pending`] state that a form
//! can watch.

mod blob;
pub mod error;
mod pipeline;

pub use crate::blob::{Blob, MemoryBlob};
pub use crate::pipeline::{Pending, Upload, UploadPipeline};
