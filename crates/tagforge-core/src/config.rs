use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the dataset and project config, relative to the root.
pub const DATA_DIR: &str = ".tagforge";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub inherit: InheritConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            generate: GenerateConfig::default(),
            inherit: InheritConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Upper bound on batch quantity.
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            max_batch: default_max_batch(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InheritConfig {
    /// Dictionary category names recognized as project/system (WBS) codes
    /// when resolving `ParentSource::WbsCode`. Compared case-insensitively.
    #[serde(default = "default_wbs_categories")]
    pub wbs_categories: Vec<String>,
}

impl Default for InheritConfig {
    fn default() -> Self {
        Self {
            wbs_categories: default_wbs_categories(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Preferred output mode: `pretty`, `text`, or `json`.
    #[serde(default)]
    pub output: Option<String>,
    /// Default actor name for history entries.
    #[serde(default)]
    pub user: Option<String>,
}

fn default_max_batch() -> usize {
    50
}

fn default_wbs_categories() -> Vec<String> {
    vec![
        "wbs".to_string(),
        "project".to_string(),
        "проект".to_string(),
    ]
}

/// Path of the project config file under `root`.
#[must_use]
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(DATA_DIR).join("config.toml")
}

/// Load `.tagforge/config.toml`, falling back to defaults when absent.
///
/// # Errors
///
/// Read or parse failure of an existing file.
pub fn load_project_config(root: &Path) -> Result<ProjectConfig> {
    let path = project_config_path(root);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config from the platform config directory, falling back
/// to defaults when absent.
///
/// # Errors
///
/// Read or parse failure of an existing file.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("tagforge/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
