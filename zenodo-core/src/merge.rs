//! Merge person lists into the document's `creators` / `contributors` arrays.
//!
//! # Identity
//!
//! A parsed record matches an existing entry when
//! 1. both carry a non-empty `orcid` and the values are equal, or else
//! 2. the entry's `name` equals the record's name exactly.
//!
//! # Ordering
//!
//! Matched entries are updated where they stand. Records without a match are
//! appended to the end of the array in file order, so a file that interleaves
//! known and new people never reshuffles the existing list.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::document::MetadataDocument;
use crate::error::{io_err, MetadataError};
use crate::person::{parse_person_list, MalformedLine, PersonRecord};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where a person list comes from and which document field it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonListSource {
    /// File name relative to the project root.
    pub file_name: &'static str,
    /// Target array in the document.
    pub field: &'static str,
    /// `type` written into newly created entries, if any.
    pub contributor_type: Option<&'static str>,
}

pub const AUTHORS_SOURCE: PersonListSource = PersonListSource {
    file_name: "AUTHORS",
    field: "creators",
    contributor_type: None,
};

pub const CONTRIBUTORS_SOURCE: PersonListSource = PersonListSource {
    file_name: "CONTRIBUTORS",
    field: "contributors",
    contributor_type: Some("Other"),
};

impl PersonListSource {
    /// Both built-in sources, in the order they are merged.
    pub fn all() -> &'static [PersonListSource] {
        &[AUTHORS_SOURCE, CONTRIBUTORS_SOURCE]
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Summary of one merged person list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub field: String,
    /// Entries appended because no existing entry matched.
    pub added: usize,
    /// Matched entries whose fields changed.
    pub updated: usize,
    /// Matched entries that already carried every parsed value.
    pub unchanged: usize,
    /// Lines that were skipped.
    pub malformed: Vec<MalformedLine>,
}

/// Result of [`merge_person_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The person list does not exist; the document was left untouched.
    MissingFile { path: PathBuf },
    Merged(MergeReport),
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

fn entry_str<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str)
}

/// Index of the entry `record` refers to, if any.
pub fn find_person(list: &[Value], record: &PersonRecord) -> Option<usize> {
    if let Some(orcid) = record.orcid.as_deref().filter(|o| !o.is_empty()) {
        let by_orcid = list.iter().position(|entry| {
            entry_str(entry, "orcid").is_some_and(|o| !o.is_empty() && o == orcid)
        });
        if by_orcid.is_some() {
            return by_orcid;
        }
    }
    list.iter()
        .position(|entry| entry_str(entry, "name") == Some(record.name.as_str()))
}

/// Overwrite the entry's person fields with the values present in `record`.
///
/// Keys absent from the record are left alone. Returns `true` if anything
/// changed.
pub fn apply_record(entry: &mut Map<String, Value>, record: &PersonRecord) -> bool {
    let mut changed = false;
    for (key, value) in record.fields() {
        if entry.get(key).and_then(Value::as_str) != Some(value) {
            entry.insert(key.to_string(), Value::String(value.to_string()));
            changed = true;
        }
    }
    changed
}

fn new_entry(record: &PersonRecord, contributor_type: Option<&str>) -> Map<String, Value> {
    let mut entry = Map::new();
    if let Some(kind) = contributor_type {
        entry.insert("type".to_string(), Value::String(kind.to_string()));
    }
    apply_record(&mut entry, record);
    entry
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge parsed records into `list`.
pub fn merge_records(
    list: &mut Vec<Value>,
    records: &[PersonRecord],
    source: &PersonListSource,
) -> MergeReport {
    let mut report = MergeReport {
        field: source.field.to_string(),
        ..MergeReport::default()
    };

    for record in records {
        match find_person(list, record).and_then(|i| list[i].as_object_mut()) {
            Some(entry) => {
                if apply_record(entry, record) {
                    tracing::debug!("{}: updated {}", source.field, record);
                    report.updated += 1;
                } else {
                    report.unchanged += 1;
                }
            }
            None => {
                tracing::debug!("{}: added {}", source.field, record);
                list.push(Value::Object(new_entry(record, source.contributor_type)));
                report.added += 1;
            }
        }
    }

    report
}

/// Read `<root>/<source.file_name>` and merge it into `document`.
///
/// A missing file is not an error: the document is left untouched and
/// [`MergeOutcome::MissingFile`] is returned. Malformed lines are logged and
/// skipped.
pub fn merge_person_file(
    document: &mut MetadataDocument,
    root: &Path,
    source: &PersonListSource,
) -> Result<MergeOutcome, MetadataError> {
    let path = root.join(source.file_name);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("{} not found, skipping {}", path.display(), source.field);
            return Ok(MergeOutcome::MissingFile { path });
        }
        Err(e) => return Err(io_err(&path, e)),
    };

    let mut records = Vec::new();
    let mut malformed = Vec::new();
    for parsed in parse_person_list(&text) {
        match parsed {
            Ok(record) => records.push(record),
            Err(line) => {
                tracing::warn!("{}: could not analyze {}", path.display(), line);
                malformed.push(line);
            }
        }
    }

    let list = document.person_list_mut(source.field)?;
    let mut report = merge_records(list, &records, source);
    report.malformed = malformed;
    Ok(MergeOutcome::Merged(report))
}
