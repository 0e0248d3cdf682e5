//! smith edit command implementation
//!
//! Edits task fields, or mints a fresh task when the selection is empty.
//! Field flags apply non-interactively; with no flags at all, each field is
//! prompted with its current value as the default.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{self, OutputOptions};
use crate::recency::RecencyCache;
use crate::resolver;
use crate::store::TaskStore;
use crate::task::{self, Task};

/// Options for the edit command
pub struct EditOptions {
    pub ids: Vec<String>,
    pub title: Option<String>,
    pub progress: Option<u32>,
    pub limit: Option<u32>,
    pub script: Option<String>,
    pub script_args: Option<String>,
    pub comment: Option<String>,
    pub deadline: Option<String>,
    pub file: Option<PathBuf>,
    pub scripts_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

/// A deadline change: set to a date, or removed.
#[derive(Clone, Copy)]
enum DeadlineEdit {
    Set(DateTime<Utc>),
    Clear,
}

/// Field values to apply to a task. `None` leaves the field untouched.
#[derive(Clone, Default)]
struct FieldEdits {
    title: Option<String>,
    progress: Option<u32>,
    limit: Option<u32>,
    script: Option<String>,
    script_args: Option<String>,
    comment: Option<String>,
    deadline: Option<DeadlineEdit>,
}

#[derive(Serialize)]
struct EditReport {
    edited: Vec<String>,
    created: bool,
}

pub fn run(options: EditOptions) -> Result<()> {
    let config = Config::resolve(options.file.clone(), options.scripts_dir.clone())?;
    config.ensure_dirs()?;

    let store = TaskStore::load(&config.list_file)?;
    let cache = RecencyCache::new(config.recency_file.clone());
    let previous = cache.load();

    let selection = resolver::resolve(&store, &options.ids, &previous)?;
    output::report_unresolved(&selection.unresolved);

    let now = Utc::now();
    let flag_edits = edits_from_flags(&options)?;

    // No selection: mint a fresh task with default fields and edit that.
    let creating = selection.ids.is_empty();
    let mut targets = selection.ids.clone();
    if creating {
        targets = vec![task::mint_id(now)];
    }

    // Gather edits before taking the store lock, so interactive prompting
    // never stalls other invocations.
    let mut planned: Vec<(String, FieldEdits)> = Vec::new();
    for id in &targets {
        let current = if creating {
            Task::new(now)
        } else {
            match store.get(id) {
                Some(task) => task.clone(),
                None => continue,
            }
        };
        let edits = match &flag_edits {
            Some(edits) => edits.clone(),
            None => prompt_edits(id, &current)?,
        };
        planned.push((id.clone(), edits));
    }

    let edited = TaskStore::update(&config.list_file, |store| {
        let mut edited = Vec::new();
        for (id, edits) in planned {
            if creating {
                store.insert(id.clone(), Task::new(now));
            }
            let task = match store.get_mut(&id) {
                Some(task) => task,
                None => continue,
            };
            apply(task, edits, &config.scripts_dir, now);
            edited.push(id);
        }
        Ok(edited)
    })?;

    cache.store(&edited)?;

    if options.output.json {
        let report = EditReport {
            edited: edited.clone(),
            created: creating,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !options.output.quiet {
        for id in &edited {
            if creating {
                println!("Created [{id}]");
            } else {
                println!("Updated [{id}]");
            }
        }
    }

    Ok(())
}

/// Collect the non-interactive field flags. `None` means no flag was given
/// and the interactive path should run instead.
fn edits_from_flags(options: &EditOptions) -> Result<Option<FieldEdits>> {
    let any = options.title.is_some()
        || options.progress.is_some()
        || options.limit.is_some()
        || options.script.is_some()
        || options.script_args.is_some()
        || options.comment.is_some()
        || options.deadline.is_some();
    if !any {
        return Ok(None);
    }

    if options.limit == Some(0) {
        return Err(Error::InvalidArgument(
            "limit must be at least 1".to_string(),
        ));
    }

    Ok(Some(FieldEdits {
        title: options.title.clone(),
        progress: options.progress,
        limit: options.limit,
        script: options.script.clone(),
        script_args: options.script_args.clone(),
        comment: options.comment.clone(),
        deadline: parse_deadline_flag(options.deadline.as_deref())?,
    }))
}

/// `--deadline YYYY-MM-DD` sets, `--deadline none` (or empty) clears.
fn parse_deadline_flag(value: Option<&str>) -> Result<Option<DeadlineEdit>> {
    let value = match value {
        Some(value) => value.trim(),
        None => return Ok(None),
    };
    if value.is_empty() || value == "none" {
        return Ok(Some(DeadlineEdit::Clear));
    }
    Ok(Some(DeadlineEdit::Set(parse_date(value)?)))
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::InvalidArgument(format!("invalid date '{value}': expected YYYY-MM-DD")))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid date '{value}'")))?;
    Ok(midnight.and_utc())
}

/// Prompt every field against its current value, as the interactive editor.
fn prompt_edits(id: &str, current: &Task) -> Result<FieldEdits> {
    println!("Editing [{id}] {}:", current.title);

    let title = prompt("Title", &current.title)?;
    let progress = parse_number("progress", &prompt("Progress", &current.progress.to_string())?)?;
    let limit = parse_number("limit", &prompt("Limit", &current.limit.to_string())?)?;
    if limit == 0 {
        return Err(Error::InvalidArgument(
            "limit must be at least 1".to_string(),
        ));
    }
    let script = prompt("Script", &current.script)?;
    let script_args = prompt("Script args", &current.script_args)?;
    let comment = prompt("Comment", &current.comment)?;

    let current_deadline = current
        .deadline
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let deadline_input = prompt("Deadline", &current_deadline)?;
    let deadline = if deadline_input == current_deadline {
        // unchanged, keep the frozen thresholds
        None
    } else if deadline_input.is_empty() || deadline_input == "none" {
        Some(DeadlineEdit::Clear)
    } else {
        Some(DeadlineEdit::Set(parse_date(&deadline_input)?))
    };

    Ok(FieldEdits {
        title: Some(title),
        progress: Some(progress),
        limit: Some(limit),
        script: Some(script),
        script_args: Some(script_args),
        comment: Some(comment),
        deadline,
    })
}

fn prompt(label: &str, current: &str) -> Result<String> {
    print!("{label} [{current}]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let entered = line.trim();
    Ok(if entered.is_empty() {
        current.to_string()
    } else {
        entered.to_string()
    })
}

fn parse_number(field: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid {field} '{value}'")))
}

fn apply(task: &mut Task, edits: FieldEdits, scripts_dir: &std::path::Path, now: DateTime<Utc>) {
    if let Some(title) = edits.title {
        task.title = title;
    }
    if let Some(limit) = edits.limit {
        task.limit = limit.max(1);
    }
    if let Some(progress) = edits.progress {
        task.progress = progress;
    }
    // the progress/limit pair stays clamped no matter which field moved
    task.progress = task.progress.min(task.limit);
    if let Some(script) = edits.script {
        // bare names are pinned into the scripts dir at edit time
        task.script = if script.is_empty() || script.contains('/') {
            script
        } else {
            scripts_dir.join(script).to_string_lossy().into_owned()
        };
    }
    if let Some(script_args) = edits.script_args {
        task.script_args = script_args;
    }
    if let Some(comment) = edits.comment {
        task.comment = comment;
    }
    match edits.deadline {
        Some(DeadlineEdit::Set(deadline)) => task.set_deadline(deadline, now),
        Some(DeadlineEdit::Clear) => task.clear_deadline(now),
        None => {}
    }
    task.touch(now);
}
