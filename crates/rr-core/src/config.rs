//! Configuration types and parsing for regrun.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main project configuration from regrun.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directories searched recursively for fixture files
    #[serde(default = "default_fixture_paths")]
    pub fixture_paths: Vec<String>,

    /// Engine connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Run-level deadline in seconds. Fixtures not started before it
    /// expires are skipped.
    #[serde(default)]
    pub deadline_secs: Option<u64>,

    /// Where the JSON report is written
    #[serde(default = "default_report_path")]
    pub report_path: String,
}

/// Engine connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (for DuckDB file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_fixture_paths() -> Vec<String> {
    vec!["fixtures".to_string()]
}

fn default_report_path() -> String {
    "target/regrun_report.json".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from YAML text
    pub fn parse(content: &str) -> CoreResult<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for regrun.yml or regrun.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("regrun.yml");
        let yaml_path = dir.join("regrun.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.fixture_paths.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one fixture_paths entry must be specified".to_string(),
            });
        }

        if self.deadline_secs == Some(0) {
            return Err(CoreError::ConfigInvalid {
                message: "deadline_secs must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Fixture directories resolved against the project root
    pub fn fixture_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.fixture_paths.iter().map(|p| root.join(p)).collect()
    }

    /// The run-level deadline as a duration
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
