//! Command-line interface for smith
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::output::OutputOptions;

mod action;
mod bump;
mod edit;
mod export;
mod import;
mod remove;
mod run;
mod show;

/// smith - Super Mega Intuitive Todolist Helper
///
/// Tasks carry a progress/limit pair and an optional action script that is
/// run to confirm each advance. IDs accept keywords (all, recent, last,
/// finished, virgins, maxfirst, minfirst, bydate), literal task IDs, and
/// numeric references into the previous command's listing.
#[derive(Parser, Debug)]
#[command(name = "smith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Task IDs, keywords, or relative indices (implies show)
    pub ids: Vec<String>,

    /// Path to the todolist document
    #[arg(short, long, global = true, env = "SMITH_FILE")]
    pub file: Option<PathBuf>,

    /// Directory searched for bare action script names
    #[arg(short = 'D', long, global = true, env = "SMITH_SCRIPTS")]
    pub scripts_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print in color
    #[arg(short = 'G', long, global = true)]
    pub color: bool,

    /// Show tasks in a compact format
    #[arg(short, long, global = true)]
    pub compact: bool,

    /// Show more details about the tasks
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show tasks (default: the five most recently updated)
    Show {
        /// Task IDs, keywords, or relative indices
        ids: Vec<String>,
    },

    /// Create or edit tasks; with no IDs, mints a fresh task
    Edit {
        /// Task IDs, keywords, or relative indices
        ids: Vec<String>,

        /// Task title
        #[arg(long)]
        title: Option<String>,

        /// Current progress
        #[arg(long)]
        progress: Option<u32>,

        /// Progress limit (must be at least 1)
        #[arg(long)]
        limit: Option<u32>,

        /// Action script path, or a bare name inside the scripts dir
        #[arg(long)]
        script: Option<String>,

        /// Opaque argument string passed to the action script
        #[arg(long = "args")]
        script_args: Option<String>,

        /// Free-form annotation
        #[arg(long)]
        comment: Option<String>,

        /// Deadline date (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },

    /// Create or edit a task's action script in your editor
    Action {
        /// Task IDs, keywords, or relative indices
        ids: Vec<String>,
    },

    /// Remove tasks
    Remove {
        /// Task IDs, keywords, or relative indices
        ids: Vec<String>,
    },

    /// Run task actions and advance progress on success
    Do {
        /// Task IDs, keywords, or relative indices
        ids: Vec<String>,
    },

    /// Adjust task progress directly
    Bump {
        /// Task IDs, keywords, or relative indices
        ids: Vec<String>,

        /// Signed amount to add (clamped to [0, limit])
        #[arg(short = 'n', long = "by", default_value_t = 1, allow_hyphen_values = true)]
        by: i64,
    },

    /// Merge tasks from a file, '-' for stdin, or an http(s) URL
    Import {
        /// Import source
        source: String,
    },

    /// Print selected tasks as a re-importable JSON document
    Export {
        /// Task IDs, keywords, or relative indices
        ids: Vec<String>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
            color: self.color,
            compact: self.compact,
            verbose: self.verbose,
        };
        let file = self.file;
        let scripts_dir = self.scripts_dir;

        // Bare `smith [ID...]` is a show request.
        let command = self.command.unwrap_or(Commands::Show { ids: self.ids });

        match command {
            Commands::Show { ids } => show::run(show::ShowOptions {
                ids,
                file,
                scripts_dir,
                output,
            }),
            Commands::Edit {
                ids,
                title,
                progress,
                limit,
                script,
                script_args,
                comment,
                deadline,
            } => edit::run(edit::EditOptions {
                ids,
                title,
                progress,
                limit,
                script,
                script_args,
                comment,
                deadline,
                file,
                scripts_dir,
                output,
            }),
            Commands::Action { ids } => action::run(action::ActionOptions {
                ids,
                file,
                scripts_dir,
                output,
            }),
            Commands::Remove { ids } => remove::run(remove::RemoveOptions {
                ids,
                file,
                scripts_dir,
                output,
            }),
            Commands::Do { ids } => run::run(run::DoOptions {
                ids,
                file,
                scripts_dir,
                output,
            }),
            Commands::Bump { ids, by } => bump::run(bump::BumpOptions {
                ids,
                by,
                file,
                scripts_dir,
                output,
            }),
            Commands::Import { source } => import::run(import::ImportOptions {
                source,
                file,
                scripts_dir,
                output,
            }),
            Commands::Export { ids } => export::run(export::ExportOptions {
                ids,
                file,
                scripts_dir,
                output,
            }),
        }
    }
}
