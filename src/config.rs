//! Configuration and data directory resolution
//!
//! `config.toml` lives in the data directory next to the SQLite database.
//! A missing file means defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "STUDYPLAN_DIR";

pub const CONFIG_FILE: &str = "config.toml";
pub const DATABASE_FILE: &str = "studyplan.sqlite";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub planning: PlanningConfig,
    pub revision: RevisionConfig,
}

/// Defaults for `studyplan plan` when flags are omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    pub hours_per_day: f64,
    pub deadline_days: u32,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            hours_per_day: 2.0,
            deadline_days: 14,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionConfig {
    /// Topics listed by `studyplan revisions`
    pub daily_limit: usize,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self { daily_limit: 5 }
    }
}

pub const DEFAULT_CONFIG: &str = r#"# studyplan configuration

[planning]
# Nominal study hours per day
hours_per_day = 2.0
# Days until the deadline
deadline_days = 14

[revision]
# Maximum topics listed by `studyplan revisions`
daily_limit = 5
"#;

/// Load configuration from file
pub fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Resolve the data directory.
///
/// An explicit path wins, then `STUDYPLAN_DIR`, then `.studyplan` in the
/// current directory if it exists, then `~/.studyplan`.
pub fn get_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let cwd = std::env::current_dir()?;
    let project_dir = cwd.join(".studyplan");
    if project_dir.exists() {
        return Ok(project_dir);
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home.join(".studyplan"))
}
