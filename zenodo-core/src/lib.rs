//! zenodo-core — the `.zenodo.json` document model and person-list merging.
//!
//! - [`document`] — [`MetadataDocument`]: order-preserving load / save / set_version
//! - [`person`] — [`PersonRecord`]: one line of an `AUTHORS` / `CONTRIBUTORS` file
//! - [`merge`] — reconcile parsed records into `creators` / `contributors`
//! - [`error`] — [`MetadataError`]

pub mod document;
pub mod error;
pub mod merge;
pub mod person;

pub use document::{write_atomic, MetadataDocument, ZENODO_FILE, ZENODO_INDENT};
pub use error::MetadataError;
pub use merge::{
    merge_person_file, merge_records, MergeOutcome, MergeReport, PersonListSource,
    AUTHORS_SOURCE, CONTRIBUTORS_SOURCE,
};
pub use person::{parse_person_list, MalformedLine, ParseLineError, PersonRecord};
