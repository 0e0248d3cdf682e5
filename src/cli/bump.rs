//! smith bump command implementation
//!
//! Adjusts task progress by a signed amount, saturating into `[0, limit]`.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{self, OutputOptions};
use crate::recency::RecencyCache;
use crate::resolver;
use crate::store::TaskStore;

/// Options for the bump command
pub struct BumpOptions {
    pub ids: Vec<String>,
    pub by: i64,
    pub file: Option<PathBuf>,
    pub scripts_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct BumpReport {
    by: i64,
    tasks: Vec<BumpedTask>,
}

#[derive(Serialize)]
struct BumpedTask {
    id: String,
    title: String,
    progress: u32,
    limit: u32,
}

pub fn run(options: BumpOptions) -> Result<()> {
    let config = Config::resolve(options.file, options.scripts_dir)?;
    config.ensure_dirs()?;
    let cache = RecencyCache::new(config.recency_file.clone());
    let previous = cache.load();

    let now = Utc::now();
    let (ids, tasks) = TaskStore::update(&config.list_file, |store| {
        let selection = resolver::resolve(store, &options.ids, &previous)?;
        output::report_unresolved(&selection.unresolved);

        let mut tasks = Vec::new();
        for id in &selection.ids {
            if let Some(task) = store.get_mut(id) {
                task.advance(options.by, now);
                tasks.push(BumpedTask {
                    id: id.clone(),
                    title: task.title.clone(),
                    progress: task.progress,
                    limit: task.limit,
                });
            }
        }
        Ok((selection.ids, tasks))
    })?;

    cache.store(&ids)?;

    if options.output.json {
        let report = BumpReport {
            by: options.by,
            tasks,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !options.output.quiet {
        for task in &tasks {
            println!(
                "[{}] {} {}/{}",
                task.id, task.title, task.progress, task.limit
            );
        }
    }

    Ok(())
}
