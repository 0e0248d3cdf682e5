#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use smith::store::TaskStore;
use smith::task::Task;
use tempfile::TempDir;

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// Build a task with the fields the selection and progress tests care about.
pub fn task(title: &str, progress: u32, limit: u32, mtime_secs: i64) -> Task {
    let mut task = Task::new(at(mtime_secs));
    task.title = title.to_string();
    task.progress = progress;
    task.limit = limit;
    task
}

/// A throwaway todolist directory with its scripts dir.
pub struct TestList {
    dir: TempDir,
}

impl TestList {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        std::fs::create_dir_all(dir.path().join("scripts")).expect("scripts dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn list_path(&self) -> PathBuf {
        self.dir.path().join("todolist")
    }

    pub fn recency_path(&self) -> PathBuf {
        self.dir.path().join("todolist.recent")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.dir.path().join("scripts")
    }

    pub fn save(&self, store: &TaskStore) {
        store.save(&self.list_path()).expect("save store");
    }

    pub fn load(&self) -> TaskStore {
        TaskStore::load(&self.list_path()).expect("load store")
    }

    /// Write an executable shell script into the scripts dir.
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.scripts_dir().join(name);
        let contents = format!("#!/bin/sh\n{body}\n");
        std::fs::write(&path, contents).expect("write script");

        let mut perms = std::fs::metadata(&path).expect("script metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod script");
        path
    }
}
