//! Action script invocation.
//!
//! A task's action is an external executable called with the progress value
//! it is being asked to confirm, the limit, and the task's opaque argument
//! string. The advance is committed to the task if and only if the script
//! exits zero; anything else, including failure to launch, declines it.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;

use crate::error::{Error, Result};
use crate::task::Task;

/// Result of attempting a task's action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Script exited zero; the advance was committed.
    Confirmed,
    /// Script exited nonzero, was killed, or could not be started.
    /// No mutation occurred.
    Declined { status: Option<i32> },
    /// No script configured, or the configured path does not exist.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingScript,
    AlreadyFinished,
}

/// Runs task actions. The script directory is injected at construction so
/// the runner never consults process-wide state at call time.
#[derive(Debug, Clone)]
pub struct ActionRunner {
    scripts_dir: PathBuf,
}

impl ActionRunner {
    pub fn new(scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
        }
    }

    /// Resolve a script reference. Bare names land in the scripts
    /// directory; anything containing a path separator is used as-is.
    pub fn resolve_script(&self, script: &str) -> PathBuf {
        if script.contains('/') || script.contains(std::path::MAIN_SEPARATOR) {
            PathBuf::from(script)
        } else {
            self.scripts_dir.join(script)
        }
    }

    /// Run the task's action and commit at most one progress advance.
    ///
    /// The progress passed to the script is a speculative advance computed
    /// on a copy; the real task is only mutated after a zero exit.
    pub fn run(&self, task: &mut Task) -> Outcome {
        if task.script.is_empty() {
            return Outcome::Skipped(SkipReason::MissingScript);
        }
        let script = self.resolve_script(&task.script);
        if !script.exists() {
            return Outcome::Skipped(SkipReason::MissingScript);
        }
        if task.is_finished() {
            return Outcome::Skipped(SkipReason::AlreadyFinished);
        }

        let mut preview = task.clone();
        preview.advance(1, Utc::now());

        let status = Command::new(&script)
            .arg(preview.progress.to_string())
            .arg(preview.limit.to_string())
            .arg(&task.script_args)
            .status();

        match status {
            Ok(status) if status.success() => {
                task.advance(1, Utc::now());
                Outcome::Confirmed
            }
            Ok(status) => Outcome::Declined {
                status: status.code(),
            },
            Err(err) => {
                tracing::debug!(script = %script.display(), error = %err, "action failed to start");
                Outcome::Declined { status: None }
            }
        }
    }
}

/// Launches the operator's editor on a file. The editor command is injected
/// at construction (resolved once when configuration loads).
#[derive(Debug, Clone)]
pub struct EditorLauncher {
    editor: String,
}

impl EditorLauncher {
    pub fn new(editor: impl Into<String>) -> Self {
        Self {
            editor: editor.into(),
        }
    }

    pub fn open(&self, path: &Path) -> Result<()> {
        let status = Command::new(&self.editor)
            .arg(path)
            .status()
            .map_err(|err| Error::EditorFailed(format!("{}: {err}", self.editor)))?;
        if !status.success() {
            return Err(Error::EditorFailed(format!(
                "{} exited with {}",
                self.editor, status
            )));
        }
        Ok(())
    }
}
