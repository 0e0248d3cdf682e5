//! The persisted task document.
//!
//! The todolist is a single JSON object mapping task IDs to records, read
//! fully at the start of an invocation and replaced fully at the end of a
//! mutating one. A `BTreeMap` keeps iteration deterministic: ascending ID
//! order, which for minted IDs is creation order.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::Task;

/// In-memory mapping of task IDs to task records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: BTreeMap<String, Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the document at `path`. A missing file is an empty store;
    /// an unreadable or malformed file is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let tasks = serde_json::from_str(&content)?;
        Ok(Self { tasks })
    }

    /// Replace the document at `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.tasks)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Run a mutating closure against the store under an exclusive lock,
    /// persisting the result. An error from the closure aborts before
    /// anything is written, leaving the on-disk document unchanged.
    pub fn update<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut TaskStore) -> Result<T>,
    {
        let _lock = FileLock::acquire(lock_path(path), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut store = Self::load(path)?;
        let result = f(&mut store)?;
        store.save(path)?;
        Ok(result)
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, task: Task) {
        self.tasks.insert(id.into(), task);
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        self.tasks.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterate tasks in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Task)> {
        self.tasks.iter()
    }

    /// Merge an imported document into the store. Colliding IDs are
    /// overwritten by the incoming record.
    pub fn merge(&mut self, incoming: BTreeMap<String, Task>) -> usize {
        let count = incoming.len();
        for (id, task) in incoming {
            self.tasks.insert(id, task);
        }
        count
    }

    /// The subset of the store matching `ids`, in document shape. The
    /// result serializes to the same format `load` reads, so an export can
    /// be fed back through import unchanged.
    pub fn subset(&self, ids: &[String]) -> BTreeMap<&String, &Task> {
        ids.iter()
            .filter_map(|id| self.tasks.get_key_value(id))
            .collect()
    }
}

fn lock_path(path: &Path) -> PathBuf {
    path.with_extension("lock")
}

/// Where an imported document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    Stdin,
    Path(PathBuf),
    Url(String),
}

impl FromStr for ImportSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "-" {
            Ok(ImportSource::Stdin)
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Ok(ImportSource::Url(s.to_string()))
        } else {
            Ok(ImportSource::Path(PathBuf::from(s)))
        }
    }
}

impl ImportSource {
    /// Read a full ID-to-task document from the source. Callers treat any
    /// error as a per-source skip, not an invocation failure.
    pub fn read(&self) -> Result<BTreeMap<String, Task>> {
        match self {
            ImportSource::Stdin => {
                let doc = serde_json::from_reader(io::stdin().lock())?;
                Ok(doc)
            }
            ImportSource::Path(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|err| Error::ImportSource(format!("{}: {err}", path.display())))?;
                let doc = serde_json::from_str(&content)?;
                Ok(doc)
            }
            ImportSource::Url(url) => {
                let response = ureq::get(url)
                    .call()
                    .map_err(|err| Error::ImportSource(err.to_string()))?;
                let doc = response
                    .into_json()
                    .map_err(|err| Error::ImportSource(err.to_string()))?;
                Ok(doc)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn task(title: &str) -> Task {
        let mut t = Task::new(Utc.timestamp_opt(1_000, 0).unwrap());
        t.title = title.to_string();
        t
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = TaskStore::load(&dir.path().join("todolist")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todolist");

        let mut store = TaskStore::new();
        store.insert("0123456789a", task("write docs"));
        store.save(&path).unwrap();

        let reloaded = TaskStore::load(&path).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn update_persists_closure_mutations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todolist");

        TaskStore::update(&path, |store| {
            store.insert("0123456789a", task("first"));
            Ok(())
        })
        .unwrap();

        let store = TaskStore::load(&path).unwrap();
        assert!(store.contains("0123456789a"));
    }

    #[test]
    fn update_error_leaves_document_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todolist");

        let mut store = TaskStore::new();
        store.insert("0123456789a", task("keep me"));
        store.save(&path).unwrap();

        let result: Result<()> = TaskStore::update(&path, |store| {
            store.remove("0123456789a");
            Err(Error::InvalidArgument("boom".to_string()))
        });
        assert!(result.is_err());

        let reloaded = TaskStore::load(&path).unwrap();
        assert!(reloaded.contains("0123456789a"));
    }

    #[test]
    fn merge_overwrites_on_collision() {
        let mut store = TaskStore::new();
        store.insert("0123456789a", task("old title"));

        let mut incoming = BTreeMap::new();
        incoming.insert("0123456789a".to_string(), task("new title"));
        incoming.insert("0123456789b".to_string(), task("brand new"));

        let count = store.merge(incoming);
        assert_eq!(count, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("0123456789a").unwrap().title, "new title");
    }

    #[test]
    fn subset_keeps_request_ids_only() {
        let mut store = TaskStore::new();
        store.insert("0123456789a", task("a"));
        store.insert("0123456789b", task("b"));

        let ids = vec!["0123456789b".to_string(), "not-there".to_string()];
        let subset = store.subset(&ids);
        assert_eq!(subset.len(), 1);
        assert!(subset.contains_key(&"0123456789b".to_string()));
    }

    #[test]
    fn import_source_parses_forms() {
        assert_eq!("-".parse::<ImportSource>().unwrap(), ImportSource::Stdin);
        assert_eq!(
            "https://example.com/tasks.json".parse::<ImportSource>().unwrap(),
            ImportSource::Url("https://example.com/tasks.json".to_string())
        );
        assert_eq!(
            "./tasks.json".parse::<ImportSource>().unwrap(),
            ImportSource::Path(PathBuf::from("./tasks.json"))
        );
    }
}
