//! Persisted last-selection record.
//!
//! A single slot holding the ordered ID list produced by the previous
//! invocation, read once at the start of resolution and rewritten wholesale
//! by every command that produces a selection. Short numeric request tokens
//! resolve against it ("the 2nd task I just saw").

use std::path::PathBuf;

use crate::error::Result;
use crate::lock;

#[derive(Debug, Clone)]
pub struct RecencyCache {
    path: PathBuf,
}

impl RecencyCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// IDs selected by the previous invocation. This is a cache: a missing
    /// or malformed file reads as empty rather than failing.
    pub fn load(&self) -> Vec<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Overwrite the slot with this invocation's selection.
    pub fn store(&self, ids: &[String]) -> Result<()> {
        let json = serde_json::to_string(ids)?;
        lock::write_atomic(&self.path, json.as_bytes())
    }
}
