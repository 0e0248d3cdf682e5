//! smith - Super Mega Intuitive Todolist Helper
//!
//! This library provides the core functionality for the smith CLI tool:
//! tasks with a bounded progress/limit pair, optional metadata, and an
//! optional action script that is run to confirm progress advances.
//!
//! # Core Concepts
//!
//! - **Tasks**: trackable units of work with clamped progress
//! - **Selection**: keywords, literal IDs, and relative indices expanded
//!   into an ordered, deduplicated ID list
//! - **Actions**: external scripts whose exit status gates progress
//! - **Recency**: the previous invocation's selection, enabling short
//!   numeric references like `smith bump 0`
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes for the persisted documents
//! - `output`: Task rendering and error emission
//! - `recency`: Persisted last-selection record
//! - `resolver`: Request token expansion and ordering policies
//! - `runner`: Action script invocation and the editor launcher
//! - `store`: The persisted ID-to-task document
//! - `task`: Task records, ID minting, and the progress engine

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod recency;
pub mod resolver;
pub mod runner;
pub mod store;
pub mod task;

pub use error::{Error, Result};
