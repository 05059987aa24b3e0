//! Provisioning of a fresh word database
//!
//! A database is provisioned exactly once, when no local copy exists yet.
//! An existing local copy is never overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use super::models::NewWord;
use super::storage::{Result, WordStoreError};

const STARTER_WORDS: &str = include_str!("../../assets/starter_words.json");

/// Where the initial vocabulary of a new database comes from
#[derive(Debug, Clone, Default)]
pub enum SeedSource {
    /// The curated starter set compiled into the binary
    #[default]
    Bundled,
    /// A shipped SQLite file that is copied verbatim
    Database(PathBuf),
    /// An explicit word list
    Words(Vec<NewWord>),
}

impl SeedSource {
    /// Parse the bundled starter vocabulary
    pub fn starter_words() -> Result<Vec<NewWord>> {
        Ok(serde_json::from_str(STARTER_WORDS)?)
    }

    /// Put a database file in place before it is opened. Only copies for
    /// `Database`; the other sources are imported after the schema exists.
    pub(crate) fn place_file(&self, db_path: &Path) -> Result<()> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if let SeedSource::Database(source) = self {
            if !source.exists() {
                return Err(WordStoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("seed database {:?} does not exist", source),
                )));
            }
            fs::copy(source, db_path)?;
            log::info!("Copied seed database {:?} to {:?}", source, db_path);
        }
        Ok(())
    }

    /// Bulk import the seed words into a database whose schema is in place.
    /// Runs inside the caller's provisioning transaction.
    /// Returns the number of imported words.
    pub(crate) fn import_into(&self, conn: &Connection) -> Result<usize> {
        let words = match self {
            SeedSource::Database(_) => return Ok(0),
            SeedSource::Bundled => Self::starter_words()?,
            SeedSource::Words(words) => words.clone(),
        };

        let mut insert = conn.prepare(
            "INSERT INTO words (german, english, german_example, english_example, article, part_of_speech, pronunciation)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for word in &words {
            insert.execute(params![
                word.german,
                word.english,
                word.german_example,
                word.english_example,
                word.article,
                word.part_of_speech,
                word.pronunciation,
            ])?;
        }

        log::info!("Imported {} seed words", words.len());
        Ok(words.len())
    }
}
