//! smith show command implementation
//!
//! Renders the selected tasks and records the selection for relative
//! references next invocation.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{self, OutputOptions};
use crate::recency::RecencyCache;
use crate::resolver;
use crate::store::TaskStore;

/// Options for the show command
pub struct ShowOptions {
    pub ids: Vec<String>,
    pub file: Option<PathBuf>,
    pub scripts_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct ShowReport<'a> {
    tasks: Vec<output::TaskView<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved: Vec<String>,
}

pub fn run(options: ShowOptions) -> Result<()> {
    let config = Config::resolve(options.file, options.scripts_dir)?;
    let store = TaskStore::load(&config.list_file)?;
    let cache = RecencyCache::new(config.recency_file.clone());
    let previous = cache.load();

    let mut selection = resolver::resolve(&store, &options.ids, &previous)?;
    output::report_unresolved(&selection.unresolved);

    // Nothing picked: fall back to the recent listing.
    if selection.ids.is_empty() {
        let recent = ["recent".to_string()];
        selection.ids = resolver::resolve(&store, &recent, &previous)?.ids;
    }

    if options.output.json {
        let report = ShowReport {
            tasks: output::task_views(&store, &selection.ids),
            unresolved: selection.unresolved.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !options.output.quiet {
        print_or_note_empty(&store, &selection.ids, options.output);
    }

    cache.store(&selection.ids)?;
    Ok(())
}

fn print_or_note_empty(store: &TaskStore, ids: &[String], output: OutputOptions) {
    if ids.is_empty() {
        println!("No tasks. Create one with 'smith edit'.");
        return;
    }
    output::print_tasks(store, ids, output);
}
