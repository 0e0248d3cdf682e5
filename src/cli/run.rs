//! smith do command implementation
//!
//! Runs each selected task's action script and advances progress for the
//! tasks whose script confirms (exits zero). Skips and declines are
//! per-task diagnostics, never batch failures.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{self, OutputOptions};
use crate::recency::RecencyCache;
use crate::resolver;
use crate::runner::{ActionRunner, Outcome, SkipReason};
use crate::store::TaskStore;

/// Options for the do command
pub struct DoOptions {
    pub ids: Vec<String>,
    pub file: Option<PathBuf>,
    pub scripts_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct DoReport {
    tasks: Vec<ActionResult>,
}

#[derive(Serialize)]
struct ActionResult {
    id: String,
    title: String,
    outcome: &'static str,
    progress: u32,
    limit: u32,
}

pub fn run(options: DoOptions) -> Result<()> {
    let config = Config::resolve(options.file, options.scripts_dir)?;
    config.ensure_dirs()?;
    let cache = RecencyCache::new(config.recency_file.clone());
    let previous = cache.load();

    let runner = ActionRunner::new(config.scripts_dir.clone());

    let (ids, results) = TaskStore::update(&config.list_file, |store| {
        let selection = resolver::resolve(store, &options.ids, &previous)?;
        output::report_unresolved(&selection.unresolved);

        let mut results = Vec::new();
        for id in &selection.ids {
            let task = match store.get_mut(id) {
                Some(task) => task,
                None => continue,
            };
            let outcome = runner.run(task);
            match outcome {
                Outcome::Skipped(SkipReason::MissingScript) => {
                    eprintln!("No script for {id}: ignoring");
                }
                Outcome::Skipped(SkipReason::AlreadyFinished) => {
                    eprintln!("Task {id} is already finished: ignoring");
                }
                Outcome::Declined { .. } | Outcome::Confirmed => {}
            }
            results.push(ActionResult {
                id: id.clone(),
                title: task.title.clone(),
                outcome: outcome_label(outcome),
                progress: task.progress,
                limit: task.limit,
            });
        }
        Ok((selection.ids, results))
    })?;

    cache.store(&ids)?;

    if options.output.json {
        let report = DoReport { tasks: results };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !options.output.quiet {
        for result in &results {
            println!(
                "[{}] {} {} {}/{}",
                result.id, result.title, result.outcome, result.progress, result.limit
            );
        }
    }

    Ok(())
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Confirmed => "confirmed",
        Outcome::Declined { .. } => "declined",
        Outcome::Skipped(SkipReason::MissingScript) => "no-script",
        Outcome::Skipped(SkipReason::AlreadyFinished) => "finished",
    }
}
