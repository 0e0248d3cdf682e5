//! smith action command implementation
//!
//! Creates or edits a task's action script: seeds a shell template naming
//! the task, marks it executable, and opens the configured editor.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{self, OutputOptions};
use crate::recency::RecencyCache;
use crate::resolver;
use crate::runner::EditorLauncher;
use crate::store::TaskStore;
use crate::task::Task;

/// Options for the action command
pub struct ActionOptions {
    pub ids: Vec<String>,
    pub file: Option<PathBuf>,
    pub scripts_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct ActionReport {
    scripts: Vec<ScriptInfo>,
}

#[derive(Serialize)]
struct ScriptInfo {
    id: String,
    script: String,
}

pub fn run(options: ActionOptions) -> Result<()> {
    let config = Config::resolve(options.file, options.scripts_dir)?;
    config.ensure_dirs()?;

    let store = TaskStore::load(&config.list_file)?;
    let cache = RecencyCache::new(config.recency_file.clone());
    let previous = cache.load();

    let selection = resolver::resolve(&store, &options.ids, &previous)?;
    output::report_unresolved(&selection.unresolved);

    let editor = EditorLauncher::new(config.editor.clone());
    let mut scripts = Vec::new();

    for id in &selection.ids {
        let task = match store.get(id) {
            Some(task) => task,
            None => continue,
        };

        let script = match script_path(id, task, &config.scripts_dir)? {
            Some(script) => script,
            None => continue,
        };

        if !script.exists() {
            seed_template(&script, id, &task.title)?;
        }
        editor.open(&script)?;
        mark_executable(&script)?;

        scripts.push(ScriptInfo {
            id: id.clone(),
            script: script.to_string_lossy().into_owned(),
        });
    }

    // Persist any newly assigned script paths.
    let now = chrono::Utc::now();
    TaskStore::update(&config.list_file, |store| {
        for info in &scripts {
            if let Some(task) = store.get_mut(&info.id) {
                if task.script != info.script {
                    task.script = info.script.clone();
                    task.touch(now);
                }
            }
        }
        Ok(())
    })?;

    cache.store(&selection.ids)?;

    if options.output.json {
        let report = ActionReport { scripts };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !options.output.quiet {
        for info in &scripts {
            println!("Action for [{}]: {}", info.id, info.script);
        }
    }

    Ok(())
}

/// The script path for a task, prompting for a name when none is
/// configured. An empty answer skips the task.
fn script_path(id: &str, task: &Task, scripts_dir: &Path) -> Result<Option<PathBuf>> {
    if !task.script.is_empty() {
        return Ok(Some(PathBuf::from(&task.script)));
    }

    print!("Select a name for the script of [{id}]: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let name = line.trim();
    if name.is_empty() {
        return Ok(None);
    }

    if name.contains('/') {
        Ok(Some(PathBuf::from(name)))
    } else {
        Ok(Some(scripts_dir.join(name)))
    }
}

fn seed_template(script: &Path, id: &str, title: &str) -> Result<()> {
    let template = format!(
        "#!/bin/sh\n\
         #\n\
         # [{id}] {title}\n\
         # Action script for the smith todolist tool.\n\
         # It is called with the following arguments:\n\
         #      the progress value being confirmed\n\
         #      the limit set for the task\n\
         #      the argument field of the task\n\
         # Exit 0 to confirm the progress advance, nonzero to decline.\n"
    );
    crate::lock::write_atomic(script, template.as_bytes())
}

#[cfg(unix)]
fn mark_executable(script: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(script)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(script, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn mark_executable(_script: &Path) -> Result<()> {
    Ok(())
}
