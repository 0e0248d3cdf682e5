//! Configuration loading and management
//!
//! Paths and the editor command come from `config.toml` in the smith
//! config directory (`~/.config/smith` on Linux), overridable per
//! invocation by CLI flags and environment.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock;

/// On-disk configuration. Every field is optional; resolution fills gaps
/// with the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Todolist document path
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Directory searched for bare action script names
    #[serde(default)]
    pub scripts_dir: Option<PathBuf>,

    /// Editor command used by `smith action`
    #[serde(default)]
    pub editor: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<FileConfig> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// The todolist document
    pub list_file: PathBuf,
    /// Last-selection slot, kept next to the todolist
    pub recency_file: PathBuf,
    /// Directory for bare script names
    pub scripts_dir: PathBuf,
    /// Editor command, pinned at load time
    pub editor: String,
}

impl Config {
    /// Resolve the invocation's configuration. CLI/env overrides win over
    /// the config file, which wins over the defaults.
    ///
    /// The editor command is pinned here; launchers receive it by value
    /// and never consult the environment at call time.
    pub fn resolve(file: Option<PathBuf>, scripts_dir: Option<PathBuf>) -> Result<Config> {
        let base = config_dir()?;
        let file_config = FileConfig::load(&base.join("config.toml"))?;

        let list_file = file
            .or(file_config.file)
            .unwrap_or_else(|| base.join("todolist"));
        let scripts_dir = scripts_dir
            .or(file_config.scripts_dir)
            .unwrap_or_else(|| base.join("scripts"));
        let editor = file_config
            .editor
            .or_else(|| std::env::var("EDITOR").ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| "vi".to_string());
        let recency_file = recency_path(&list_file);

        Ok(Config {
            list_file,
            recency_file,
            scripts_dir,
            editor,
        })
    }

    /// Provision the on-disk layout: the todolist's directory, an empty
    /// document if none exists, and the scripts directory.
    pub fn ensure_dirs(&self) -> Result<()> {
        if let Some(parent) = self.list_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&self.scripts_dir)?;
        if !self.list_file.exists() {
            lock::write_atomic(&self.list_file, b"{}")?;
        }
        Ok(())
    }
}

/// Sibling of the todolist named `<list>.recent`, so each list keeps its
/// own relative-reference history.
fn recency_path(list_file: &Path) -> PathBuf {
    let name = list_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "todolist".to_string());
    list_file.with_file_name(format!("{name}.recent"))
}

fn config_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("", "", "smith")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| Error::InvalidConfig("could not determine a home directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file_config() {
        let config: FileConfig = toml::from_str("editor = \"nano\"").unwrap();
        assert_eq!(config.editor.as_deref(), Some("nano"));
        assert!(config.file.is_none());
        assert!(config.scripts_dir.is_none());
    }

    #[test]
    fn recency_file_sits_next_to_the_list() {
        assert_eq!(
            recency_path(Path::new("/data/todolist")),
            PathBuf::from("/data/todolist.recent")
        );
        assert_eq!(
            recency_path(Path::new("/data/work.json")),
            PathBuf::from("/data/work.json.recent")
        );
    }

    #[test]
    fn ensure_dirs_provisions_an_empty_list() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            list_file: dir.path().join("nested/todolist"),
            recency_file: dir.path().join("nested/todolist.recent"),
            scripts_dir: dir.path().join("scripts"),
            editor: "vi".to_string(),
        };
        config.ensure_dirs().unwrap();

        assert!(config.scripts_dir.is_dir());
        let content = fs::read_to_string(&config.list_file).unwrap();
        assert_eq!(content, "{}");
    }
}
