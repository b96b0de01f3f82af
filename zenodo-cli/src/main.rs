//! update-zenodo — keep `.zenodo.json` in sync with `AUTHORS` and `CONTRIBUTORS`.
//!
//! # Usage
//!
//! ```text
//! update-zenodo [--set-version <VERSION>]
//! ```
//!
//! Run from the project root. Diagnostics go to stderr (filter with
//! `RUST_LOG`); the summary goes to stdout.

mod commands;

use anyhow::Result;
use clap::Parser;

use commands::update::UpdateArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "update-zenodo",
    version,
    about = "Update .zenodo.json from the AUTHORS and CONTRIBUTORS files",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    update: UpdateArgs,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    cli.update.run()
}
