//! Shared output formatting for smith CLI commands.
//!
//! Human rendering of task listings (progress bar, colors, compact and
//! verbose layouts) plus the JSON error envelope.

use std::fmt::Display;

use crossterm::style::{style, Color, Stylize};
use serde::Serialize;

use crate::error::Result;
use crate::store::TaskStore;
use crate::task::{DeadlineStatus, Task};

pub const SCHEMA_VERSION: &str = "smith.v1";

const BAR_WIDTH: usize = 30;
const TITLE_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
    pub color: bool,
    pub compact: bool,
    pub verbose: bool,
}

/// One selected task as rendered into a JSON listing.
#[derive(Serialize)]
pub struct TaskView<'a> {
    pub num: usize,
    pub id: &'a str,
    #[serde(flatten)]
    pub task: &'a Task,
}

/// Build JSON views for a selection, keeping selection order.
pub fn task_views<'a>(store: &'a TaskStore, ids: &'a [String]) -> Vec<TaskView<'a>> {
    ids.iter()
        .enumerate()
        .filter_map(|(num, id)| {
            store.get(id).map(|task| TaskView {
                num,
                id: id.as_str(),
                task,
            })
        })
        .collect()
}

/// Print the selected tasks in listing order, numbered so the operator can
/// re-address them with relative references next invocation.
pub fn print_tasks(store: &TaskStore, ids: &[String], options: OutputOptions) {
    let now = chrono::Utc::now();
    for (num, id) in ids.iter().enumerate() {
        let task = match store.get(id) {
            Some(task) => task,
            None => continue,
        };
        println!("{}", format_task(num, id, task, options, now));
    }
}

fn format_task(
    num: usize,
    id: &str,
    task: &Task,
    options: OutputOptions,
    now: chrono::DateTime<chrono::Utc>,
) -> String {
    let num_text = paint(num, Color::Green, options.color);
    let id_text = paint(id, Color::Yellow, options.color);
    let title = match task.deadline_status(now) {
        DeadlineStatus::Overdue => paint(&task.title, Color::Red, options.color),
        DeadlineStatus::Approaching => paint(&task.title, Color::Yellow, options.color),
        DeadlineStatus::Clear => task.title.clone(),
    };

    let mut line = if options.compact {
        format!(
            "{num_text}:{id_text} {title} {}/{}",
            task.progress, task.limit
        )
    } else {
        format!(
            "[{num_text}:{id_text}] {:<width$}\t{} {}/{}",
            title,
            bar(task, options.color),
            task.progress,
            task.limit,
            width = TITLE_WIDTH,
        )
    };

    if options.verbose {
        let mut details: Vec<(&str, String)> = Vec::new();
        if !task.script.is_empty() {
            details.push(("Script", task.script.clone()));
        }
        if !task.script_args.is_empty() {
            details.push(("Args", task.script_args.clone()));
        }
        if !task.comment.is_empty() {
            details.push(("Comment", task.comment.clone()));
        }
        if let Some(deadline) = task.deadline {
            details.push(("Deadline", deadline.format("%Y-%m-%d").to_string()));
        }

        if options.compact {
            for (_, value) in &details {
                line.push_str(" | ");
                line.push_str(value);
            }
        } else {
            for (label, value) in &details {
                line.push_str(&format!("\n{label}:\t{value}"));
            }
        }
    }

    line
}

/// Render the progress bar, `#`-filled proportionally to the ratio.
/// Colored by completion band: red, yellow, green, and cyan when finished.
pub fn bar(task: &Task, color: bool) -> String {
    let ratio = task.ratio();
    let fill_len = ((ratio * BAR_WIDTH as f64).floor() as usize).min(BAR_WIDTH);
    let fill = "#".repeat(fill_len);
    let pad = " ".repeat(BAR_WIDTH - fill_len);
    let fill = paint(fill, bar_color(ratio), color);
    format!("[{fill}{pad}]")
}

fn bar_color(ratio: f64) -> Color {
    if ratio <= 0.33 {
        Color::Red
    } else if ratio <= 0.66 {
        Color::Yellow
    } else if ratio < 1.0 {
        Color::Green
    } else {
        Color::Cyan
    }
}

fn paint(text: impl Display, color: Color, enabled: bool) -> String {
    if enabled {
        style(text).with(color).to_string()
    } else {
        text.to_string()
    }
}

/// Report tokens that matched no task, keyword, or relative index.
/// Per-token, never fatal.
pub fn report_unresolved(tokens: &[String]) {
    for token in tokens {
        eprintln!("No task with ID '{token}': ignoring it");
    }
}

pub fn emit_error(command: &str, err: &crate::error::Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    let hint = next_steps.first().map(|step| step.as_str());
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
            },
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn infer_command_name_from_args() -> String {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "smith".to_string()
}

fn error_kind(err: &crate::error::Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &crate::error::Error) -> Vec<String> {
    use crate::error::Error;

    match err {
        Error::EmptySelection => vec!["smith edit".to_string()],
        Error::InvalidConfig(_) => vec!["fix config.toml then retry".to_string()],
        Error::LockFailed(_) => {
            vec!["another smith invocation holds the list; retry".to_string()]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task_with(progress: u32, limit: u32) -> Task {
        let mut task = Task::new(Utc.timestamp_opt(0, 0).unwrap());
        task.progress = progress;
        task.limit = limit;
        task
    }

    #[test]
    fn bar_fill_tracks_ratio() {
        assert_eq!(bar(&task_with(0, 4), false), format!("[{}]", " ".repeat(30)));
        assert_eq!(
            bar(&task_with(2, 4), false),
            format!("[{}{}]", "#".repeat(15), " ".repeat(15))
        );
        assert_eq!(bar(&task_with(4, 4), false), format!("[{}]", "#".repeat(30)));
    }

    #[test]
    fn compact_line_is_single_line() {
        let task = task_with(1, 2);
        let options = OutputOptions {
            compact: true,
            ..OutputOptions::default()
        };
        let line = format_task(0, "0123456789a", &task, options, Utc::now());
        assert!(!line.contains('\n'));
        assert!(line.contains("1/2"));
    }

    #[test]
    fn verbose_line_includes_details() {
        let mut task = task_with(1, 2);
        task.script = "/bin/true".to_string();
        task.comment = "remember the milk".to_string();
        let options = OutputOptions {
            verbose: true,
            ..OutputOptions::default()
        };
        let line = format_task(0, "0123456789a", &task, options, Utc::now());
        assert!(line.contains("Script:\t/bin/true"));
        assert!(line.contains("Comment:\tremember the milk"));
    }
}
