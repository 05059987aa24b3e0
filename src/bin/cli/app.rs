use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};

use vokabel_lib::vocabulary::{CardSession, WordStore};
use vokabel_lib::DeckSettings;

const LOG_FILE: &str = "vokabel.log";

/// Shared application state for CLI commands
pub struct App {
    pub data_dir: PathBuf,
    pub settings: DeckSettings,
}

impl App {
    /// Resolve the data directory and load its settings
    pub fn new(data_dir: Option<PathBuf>, seed_db: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => DeckSettings::default_data_dir().context("Failed to get data directory")?,
        };

        let mut settings = DeckSettings::load(&data_dir)
            .with_context(|| format!("Failed to load settings from {}", data_dir.display()))?;
        if seed_db.is_some() {
            settings.seed_database = seed_db;
        }

        Ok(Self { data_dir, settings })
    }

    /// Open the word store, provisioning it on first run
    pub fn open_store(&self) -> Result<WordStore> {
        let mut store = self.settings.word_store(&self.data_dir);
        store
            .init()
            .with_context(|| format!("Failed to open word database {}", store.db_path().display()))?;
        Ok(store)
    }

    /// Session over a fresh, unloaded store. `load` must be called before use.
    pub fn session(&self) -> CardSession {
        CardSession::new(
            self.settings.word_store(&self.data_dir),
            self.settings.session_options(),
        )
    }

    /// Route logs to a file, since the TUI owns stdout and stderr
    pub fn init_file_logging(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).context("Failed to create data directory")?;
        let path = self.data_dir.join(LOG_FILE);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
        Ok(())
    }
}
