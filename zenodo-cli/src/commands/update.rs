//! `update-zenodo [--set-version <VERSION>]`

use anyhow::{Error, Result};
use clap::Args;
use colored::Colorize;

use zenodo_core::{MergeOutcome, ZENODO_FILE};
use zenodo_sync::{pipeline, ListMerge, UpdateOptions, UpdateResult, WriteResult};

/// Arguments for the update run.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Set the `version` field to this value.
    #[arg(long = "set-version", value_name = "VERSION")]
    pub set_version: Option<String>,
}

impl UpdateArgs {
    pub fn run(self) -> Result<()> {
        let options = UpdateOptions {
            new_version: self.set_version,
        };

        // A document that cannot be loaded is abandoned, not fatal.
        let result = match pipeline::run(&options) {
            Ok(result) => result,
            Err(err) => {
                let err = Error::new(err).context(format!("*** Error loading {ZENODO_FILE}"));
                tracing::error!("{err:#}");
                return Ok(());
            }
        };

        print_summary(&result);
        Ok(())
    }
}

fn print_summary(result: &UpdateResult) {
    let name = ZENODO_FILE;

    match &result.write {
        WriteResult::Written { .. } => println!("{} {name} updated", "✓".green()),
        WriteResult::Unchanged { .. } => {
            println!("{} {name} already up to date", "·".bright_black())
        }
        WriteResult::Failed { message, .. } => {
            println!("{} {name} could not be saved: {message}", "✗".red())
        }
    }

    if let Some(version) = &result.version {
        println!("  version       {version}");
    }
    for merge in &result.merges {
        println!("  {:<13} {}", merge.source.field, describe(merge));
    }
}

fn describe(merge: &ListMerge) -> String {
    match &merge.outcome {
        Ok(MergeOutcome::Merged(report)) => {
            let mut line = format!(
                "{} added, {} updated, {} unchanged",
                report.added, report.updated, report.unchanged
            );
            if !report.malformed.is_empty() {
                line.push_str(&format!(", {} skipped", report.malformed.len()));
            }
            line
        }
        Ok(MergeOutcome::MissingFile { .. }) => {
            format!("{} not found, skipped", merge.source.file_name)
        }
        Err(err) => format!("not merged: {err}"),
    }
}
