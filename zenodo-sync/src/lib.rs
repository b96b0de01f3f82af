//! # zenodo-sync
//!
//! Runs one `.zenodo.json` update: load, stamp the version, merge the person
//! lists, then write the result back only if it changed.
//!
//! Call [`pipeline::run`] from the project root, or [`pipeline::run_at`] with
//! an explicit root.

pub mod error;
pub mod pipeline;
pub mod writer;

pub use error::SyncError;
pub use pipeline::{run, run_at, ListMerge, UpdateOptions, UpdateResult};
pub use writer::{write_document, WriteResult};
