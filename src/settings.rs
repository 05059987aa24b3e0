//! Deck settings, stored as settings.json in the data directory

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vocabulary::session::{SessionOptions, DEFAULT_HISTORY_LIMIT};
use crate::vocabulary::{GestureThresholds, SeedSource, SelectionWeights, WordStore};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSettings {
    #[serde(default)]
    pub gesture: GestureThresholds,
    #[serde(default)]
    pub selection: SelectionWeights,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// File name of the local word database inside the data directory
    #[serde(default = "default_database_file")]
    pub database_file: String,
    /// Shipped SQLite file to provision from; the bundled starter set is used if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_database: Option<PathBuf>,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_database_file() -> String {
    "german-vocabulary.db".to_string()
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            gesture: GestureThresholds::default(),
            selection: SelectionWeights::default(),
            history_limit: default_history_limit(),
            database_file: default_database_file(),
            seed_database: None,
        }
    }
}

impl DeckSettings {
    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("vokabel"))
            .ok_or(SettingsError::DataDirNotFound)
    }

    /// Load from `data_dir`, falling back to defaults when no file exists
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(SETTINGS_FILE);
        if !path.exists() {
            log::debug!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: DeckSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(SETTINGS_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn seed_source(&self) -> SeedSource {
        match &self.seed_database {
            Some(path) => SeedSource::Database(path.clone()),
            None => SeedSource::Bundled,
        }
    }

    /// Unopened word store for this configuration
    pub fn word_store(&self, data_dir: &Path) -> WordStore {
        WordStore::new(data_dir.join(&self.database_file), self.seed_source())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            weights: self.selection,
            history_limit: self.history_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = DeckSettings::load(temp_dir.path()).unwrap();
        assert_eq!(settings, DeckSettings::default());
        assert_eq!(settings.history_limit, 10);
        assert_eq!(settings.gesture.distance_threshold, 100.0);
        assert_eq!(settings.selection.dont_know_cutoff, 0.70);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            r#"{ "historyLimit": 3, "gesture": { "velocityThreshold": 250.0 } }"#,
        )
        .unwrap();

        let settings = DeckSettings::load(temp_dir.path()).unwrap();
        assert_eq!(settings.history_limit, 3);
        assert_eq!(settings.gesture.velocity_threshold, 250.0);
        assert_eq!(settings.gesture.distance_threshold, 100.0);
        assert_eq!(settings.database_file, "german-vocabulary.db");
        assert!(matches!(settings.seed_source(), SeedSource::Bundled));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested");
        let mut settings = DeckSettings::default();
        settings.seed_database = Some(PathBuf::from("/opt/vokabel/german-vocabulary.db"));
        settings.selection.learning_cutoff = 0.9;
        settings.save(&dir).unwrap();

        let loaded = DeckSettings::load(&dir).unwrap();
        assert_eq!(loaded, settings);
        assert!(matches!(loaded.seed_source(), SeedSource::Database(_)));
        assert_eq!(loaded.session_options().weights.learning_cutoff, 0.9);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        assert!(matches!(
            DeckSettings::load(temp_dir.path()),
            Err(SettingsError::Json(_))
        ));
    }
}
