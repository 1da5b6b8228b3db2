//! The on-disk dataset store: one JSON snapshot per repository.
//!
//! `.tagforge/dataset.json` holds the whole dataset plus the counter cache
//! and the active-project selection. Commands load it, mutate in memory, and
//! save it back — a synchronous read-modify-write matching the engine's
//! single-process model. Concurrent writers are out of scope.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use tagforge_core::config::DATA_DIR;
use tagforge_core::{Counters, Dataset, Project};

/// Everything persisted in the snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFile {
    #[serde(default)]
    pub active_project: Option<String>,
    #[serde(default)]
    pub dataset: Dataset,
    #[serde(default)]
    pub counters: Counters,
}

/// A loaded snapshot bound to its repository root.
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
    pub state: StoreFile,
}

impl Store {
    /// Path of the snapshot file under `root`.
    #[must_use]
    pub fn dataset_path(root: &Path) -> PathBuf {
        root.join(DATA_DIR).join("dataset.json")
    }

    /// Create a fresh store with one project, selected as active.
    ///
    /// # Errors
    ///
    /// When the store already exists or the directory cannot be written.
    pub fn init(root: &Path, project: Project) -> Result<Self> {
        let path = Self::dataset_path(root);
        if path.exists() {
            bail!("already initialized: {} exists", path.display());
        }
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let state = StoreFile {
            active_project: Some(project.id.clone()),
            dataset: Dataset {
                projects: vec![project],
                ..Dataset::default()
            },
            counters: Counters::default(),
        };

        let store = Self {
            root: root.to_path_buf(),
            state,
        };
        store.save()?;
        Ok(store)
    }

    /// Load the snapshot from `root`.
    ///
    /// # Errors
    ///
    /// When the store is missing (run `tg init`) or the file fails to parse.
    pub fn open(root: &Path) -> Result<Self> {
        let path = Self::dataset_path(root);
        if !path.exists() {
            bail!(
                "not initialized: {} not found (run `tg init`)",
                path.display()
            );
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let state: StoreFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        debug!(
            tags = state.dataset.tags.len(),
            templates = state.dataset.templates.len(),
            "store loaded"
        );
        Ok(Self {
            root: root.to_path_buf(),
            state,
        })
    }

    /// Write the snapshot back to disk.
    ///
    /// # Errors
    ///
    /// Serialization or write failure.
    pub fn save(&self) -> Result<()> {
        let path = Self::dataset_path(&self.root);
        let content =
            serde_json::to_string_pretty(&self.state).context("Failed to serialize dataset")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "store saved");
        Ok(())
    }

    /// Resolve the working project: `--project` flag (id or name) first,
    /// then the stored active selection.
    ///
    /// # Errors
    ///
    /// When neither source names a known project.
    pub fn project_id(&self, flag: Option<&str>) -> Result<String> {
        if let Some(key) = flag {
            let Some(project) = self
                .state
                .dataset
                .projects
                .iter()
                .find(|p| p.id == key || p.name == key)
            else {
                bail!("unknown project '{key}'");
            };
            return Ok(project.id.clone());
        }

        match self.state.active_project {
            Some(ref id) if self.state.dataset.projects.iter().any(|p| &p.id == id) => {
                Ok(id.clone())
            }
            _ => bail!("no active project (run `tg project use <name>`)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use chrono::Utc;
    use tagforge_core::Project;

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn init_open_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::init(dir.path(), project("p1", "Alpha")).unwrap();
        assert_eq!(store.project_id(None).unwrap(), "p1");

        let mut reopened = Store::open(dir.path()).unwrap();
        assert_eq!(reopened.state.dataset.projects.len(), 1);
        reopened.state.active_project = None;
        reopened.save().unwrap();

        let third = Store::open(dir.path()).unwrap();
        assert!(third.project_id(None).is_err());
        assert_eq!(third.project_id(Some("Alpha")).unwrap(), "p1");
    }

    #[test]
    fn double_init_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        Store::init(dir.path(), project("p1", "Alpha")).unwrap();
        assert!(Store::init(dir.path(), project("p2", "Beta")).is_err());
    }

    #[test]
    fn open_without_init_points_at_init() {
        let dir = tempfile::tempdir().unwrap();
        let err = Store::open(dir.path()).unwrap_err();
        assert!(err.to_string().contains("tg init"));
    }

    #[test]
    fn project_flag_resolves_by_id_or_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::init(dir.path(), project("p1", "Alpha")).unwrap();
        store.state.dataset.projects.push(project("p2", "Beta"));
        assert_eq!(store.project_id(Some("p2")).unwrap(), "p2");
        assert_eq!(store.project_id(Some("Beta")).unwrap(), "p2");
        assert!(store.project_id(Some("Gamma")).is_err());
    }
}
