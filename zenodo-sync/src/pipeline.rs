//! The update pipeline shared by the CLI and tests.
//!
//! load → set version → merge `AUTHORS` → merge `CONTRIBUTORS` → save.
//!
//! Only a document that cannot be parsed aborts the run. Missing person lists,
//! malformed lines, unusable target fields and save failures are logged and
//! recorded in the [`UpdateResult`].

use std::path::{Path, PathBuf};

use zenodo_core::{
    merge_person_file, MergeOutcome, MetadataDocument, MetadataError, PersonListSource,
    ZENODO_FILE, ZENODO_INDENT,
};

use crate::error::{io_err, SyncError};
use crate::writer::{write_document, WriteResult};

/// What to do during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Overwrite the document's `version` field with this value.
    pub new_version: Option<String>,
}

/// The outcome of merging one person list.
#[derive(Debug)]
pub struct ListMerge {
    pub source: PersonListSource,
    pub outcome: Result<MergeOutcome, MetadataError>,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct UpdateResult {
    pub document: PathBuf,
    /// The version written, if one was requested.
    pub version: Option<String>,
    pub merges: Vec<ListMerge>,
    pub write: WriteResult,
}

/// Run the update in the current working directory.
pub fn run(options: &UpdateOptions) -> Result<UpdateResult, SyncError> {
    let root = std::env::current_dir().map_err(|e| io_err(".", e))?;
    run_at(&root, options)
}

/// Run the update for the project rooted at `root`.
pub fn run_at(root: &Path, options: &UpdateOptions) -> Result<UpdateResult, SyncError> {
    let path = root.join(ZENODO_FILE);
    let mut document = MetadataDocument::load_or_default(&path)?;

    if let Some(version) = &options.new_version {
        tracing::info!("setting version to {version}");
        document.set_version(version.clone());
    }

    let mut merges = Vec::new();
    for source in PersonListSource::all() {
        let outcome = merge_person_file(&mut document, root, source);
        match &outcome {
            Ok(MergeOutcome::Merged(report)) => tracing::info!(
                "{}: {} added, {} updated, {} unchanged, {} skipped",
                report.field,
                report.added,
                report.updated,
                report.unchanged,
                report.malformed.len()
            ),
            Ok(MergeOutcome::MissingFile { .. }) => {}
            Err(e) => tracing::error!("skipping {}: {e}", source.field),
        }
        merges.push(ListMerge {
            source: *source,
            outcome,
        });
    }

    let rendered = document.to_json_string(ZENODO_INDENT)?;

    let write = match write_document(&path, &rendered) {
        Ok(write) => write,
        Err(e) => {
            tracing::error!("error saving {}: {e}", path.display());
            WriteResult::Failed {
                path: path.clone(),
                message: e.to_string(),
            }
        }
    };

    Ok(UpdateResult {
        document: path,
        version: options.new_version.clone(),
        merges,
        write,
    })
}
