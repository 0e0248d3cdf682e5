//! smith export command implementation
//!
//! Prints the selected subset of the store in the same document shape the
//! importer reads, so the output round-trips.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::output::{self, OutputOptions};
use crate::recency::RecencyCache;
use crate::resolver;
use crate::store::TaskStore;

/// Options for the export command
pub struct ExportOptions {
    pub ids: Vec<String>,
    pub file: Option<PathBuf>,
    pub scripts_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

pub fn run(options: ExportOptions) -> Result<()> {
    let config = Config::resolve(options.file, options.scripts_dir)?;
    let store = TaskStore::load(&config.list_file)?;
    let cache = RecencyCache::new(config.recency_file.clone());
    let previous = cache.load();

    let selection = resolver::resolve(&store, &options.ids, &previous)?;
    output::report_unresolved(&selection.unresolved);

    let subset = store.subset(&selection.ids);
    println!("{}", serde_json::to_string(&subset)?);

    cache.store(&selection.ids)?;
    Ok(())
}
