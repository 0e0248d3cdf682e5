//! smith remove command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{self, OutputOptions};
use crate::recency::RecencyCache;
use crate::resolver;
use crate::store::TaskStore;

/// Options for the remove command
pub struct RemoveOptions {
    pub ids: Vec<String>,
    pub file: Option<PathBuf>,
    pub scripts_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct RemoveReport {
    removed: Vec<RemovedTask>,
}

#[derive(Serialize)]
struct RemovedTask {
    id: String,
    title: String,
}

pub fn run(options: RemoveOptions) -> Result<()> {
    let config = Config::resolve(options.file, options.scripts_dir)?;
    let cache = RecencyCache::new(config.recency_file.clone());
    let previous = cache.load();

    let removed = TaskStore::update(&config.list_file, |store| {
        let selection = resolver::resolve(store, &options.ids, &previous)?;
        output::report_unresolved(&selection.unresolved);

        let mut removed = Vec::new();
        for id in &selection.ids {
            if let Some(task) = store.remove(id) {
                removed.push(RemovedTask {
                    id: id.clone(),
                    title: task.title,
                });
            }
        }
        Ok(removed)
    })?;

    // Removed tasks cannot be re-addressed; the slot is cleared.
    cache.store(&[])?;

    if options.output.json {
        let report = RemoveReport { removed };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !options.output.quiet {
        if removed.is_empty() {
            println!("Nothing removed.");
        }
        for task in &removed {
            println!("Removed [{}] {}", task.id, task.title);
        }
    }

    Ok(())
}
