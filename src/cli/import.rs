//! smith import command implementation
//!
//! Merges an ID-to-task document from a file, stdin, or a URL into the
//! store. Colliding IDs are overwritten. A failing source is skipped with
//! a diagnostic; it never aborts the invocation.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::store::{ImportSource, TaskStore};

/// Options for the import command
pub struct ImportOptions {
    pub source: String,
    pub file: Option<PathBuf>,
    pub scripts_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct ImportReport {
    source: String,
    imported: usize,
    skipped: bool,
}

pub fn run(options: ImportOptions) -> Result<()> {
    let config = Config::resolve(options.file, options.scripts_dir)?;
    config.ensure_dirs()?;

    let source: ImportSource = options
        .source
        .parse()
        .unwrap_or(ImportSource::Path(PathBuf::from(&options.source)));

    let (imported, skipped) = match source.read() {
        Ok(incoming) => {
            let count = TaskStore::update(&config.list_file, |store| Ok(store.merge(incoming)))?;
            (count, false)
        }
        Err(err) => {
            // optional supplementary step: skip, keep going
            tracing::warn!(source = %options.source, error = %err, "import source skipped");
            eprintln!("Cannot import from '{}': {err}", options.source);
            (0, true)
        }
    };

    if options.output.json {
        let report = ImportReport {
            source: options.source.clone(),
            imported,
            skipped,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !options.output.quiet && !skipped {
        println!("Imported {imported} task(s) from {}", options.source);
    }

    Ok(())
}
