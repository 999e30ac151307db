use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::model::ProjectId;
use crate::recurrence::DEFAULT_OCCURRENCE_CAP;
use crate::utils::paths::{get_config_path, get_database_path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Database file; defaults to `planboard.db` in the data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Budget shared by open-ended recurring tasks in the upcoming view.
    #[serde(default = "default_occurrence_cap")]
    pub occurrence_cap: usize,

    /// Project used by commands that omit one.
    #[serde(default)]
    pub last_project: Option<ProjectId>,
}

fn default_occurrence_cap() -> usize {
    DEFAULT_OCCURRENCE_CAP
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            occurrence_cap: default_occurrence_cap(),
            last_project: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config at {config_path:?}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config at {config_path:?}"))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }

    /// The project a command acts on: the one given, else the last one used.
    pub fn project_or_last(&self, explicit: Option<ProjectId>) -> Option<ProjectId> {
        explicit.or(self.last_project)
    }

    pub fn remember_project(&mut self, id: ProjectId) {
        self.last_project = Some(id);
    }

    /// Drop `id` as the fallback project, e.g. after it was deleted.
    pub fn forget_project(&mut self, id: ProjectId) {
        if self.last_project == Some(id) {
            self.last_project = None;
        }
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => get_database_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::paths::HOME_ENV;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.occurrence_cap, 100);
        assert_eq!(config.database_path, None);
    }

    #[test]
    fn test_config_deserialization_fills_defaults() {
        let toml_str = r#"
        database_path = "/data/board.db"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database_path, Some(PathBuf::from("/data/board.db")));
        assert_eq!(config.occurrence_cap, 100);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/data/board.db"));
    }

    #[test]
    fn test_last_project_fallback() {
        let mut config = Config::default();
        assert_eq!(config.project_or_last(None), None);

        config.remember_project(ProjectId(7));
        assert_eq!(config.project_or_last(None), Some(ProjectId(7)));
        assert_eq!(config.project_or_last(Some(ProjectId(2))), Some(ProjectId(2)));

        config.forget_project(ProjectId(3));
        assert_eq!(config.last_project, Some(ProjectId(7)));
        config.forget_project(ProjectId(7));
        assert_eq!(config.project_or_last(None), None);
    }

    #[test]
    fn test_last_project_is_a_plain_integer() {
        let config: Config = toml::from_str("last_project = 12").unwrap();
        assert_eq!(config.last_project, Some(ProjectId(12)));
    }

    #[test]
    #[serial]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        // SAFETY: serialized with every other test touching PLANBOARD_HOME.
        unsafe { env::set_var(HOME_ENV, temp_dir.path()) };

        assert_eq!(Config::load().unwrap(), Config::default());

        let config = Config {
            occurrence_cap: 30,
            last_project: Some(ProjectId(4)),
            ..Config::default()
        };
        config.save().unwrap();
        let loaded = Config::load().unwrap();
        let db_path = loaded.database_path().unwrap();

        unsafe { env::remove_var(HOME_ENV) };

        assert_eq!(loaded, config);
        assert_eq!(db_path, temp_dir.path().join("planboard.db"));
    }
}
