//! SQLite storage for vocabulary entries and review progress
//!
//! Schema (normalized):
//! ```text
//! words           one row per vocabulary entry, read-only after import
//! user_progress   review state, one row per reviewed word (absent = unseen)
//! word_overrides  per-field user edits keyed by (word_id, field)
//! word_notes      free-text notes, one per word
//! app_settings    small key/value flags (onboarding)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

use super::algorithm::ProgressStore;
use super::models::*;
use super::seed::SeedSource;

/// Bumped whenever the schema below changes shape
const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        german TEXT NOT NULL,
        english TEXT NOT NULL,
        german_example TEXT,
        english_example TEXT,
        article TEXT,
        part_of_speech TEXT,
        pronunciation TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS user_progress (
        word_id INTEGER PRIMARY KEY REFERENCES words(id),
        bucket TEXT NOT NULL CHECK(bucket IN ('dontKnow', 'learning', 'mastered')),
        times_seen INTEGER NOT NULL DEFAULT 0,
        times_known INTEGER NOT NULL DEFAULT 0,
        last_seen TEXT,
        is_removed INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT
    );

    CREATE TABLE IF NOT EXISTS word_overrides (
        word_id INTEGER NOT NULL REFERENCES words(id),
        field TEXT NOT NULL,
        value TEXT NOT NULL,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (word_id, field)
    );

    CREATE TABLE IF NOT EXISTS word_notes (
        word_id INTEGER PRIMARY KEY REFERENCES words(id),
        notes TEXT NOT NULL,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS app_settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
"#;

const INDEXES: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_user_progress_bucket ON user_progress(bucket);
    CREATE INDEX IF NOT EXISTS idx_user_progress_removed ON user_progress(is_removed);
"#;

const ONBOARDING_KEY: &str = "onboarding_completed";

#[derive(Error, Debug)]
pub enum WordStoreError {
    #[error("Word store not initialized")]
    NotInitialized,

    #[error("Word not found: {0}")]
    NotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

impl WordStoreError {
    /// Failure of the underlying medium rather than of the caller's request
    pub fn is_storage_io(&self) -> bool {
        matches!(self, WordStoreError::Sqlite(_) | WordStoreError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, WordStoreError>;

/// Handle to the local word database.
///
/// Created unopened; every operation fails with `NotInitialized` until
/// [`WordStore::init`] succeeds.
pub struct WordStore {
    db_path: PathBuf,
    seed: SeedSource,
    conn: Option<Connection>,
}

impl WordStore {
    pub fn new(db_path: PathBuf, seed: SeedSource) -> Self {
        Self {
            db_path,
            seed,
            conn: None,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_initialized(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the database, provisioning it from the seed if no local copy
    /// exists. Calling this on an open store is a no-op.
    pub fn init(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        let fresh = !self.db_path.exists();
        if fresh {
            log::info!("No word database at {:?}, provisioning", self.db_path);
            self.seed.place_file(&self.db_path)?;
        } else {
            log::info!("Reusing word database at {:?}", self.db_path);
        }

        let conn = match self.open_and_migrate(fresh) {
            Ok(conn) => conn,
            Err(e) => {
                if fresh {
                    // Don't leave a half-provisioned file that a later init would reuse
                    let _ = fs::remove_file(&self.db_path);
                }
                return Err(e);
            }
        };

        self.conn = Some(conn);
        Ok(())
    }

    fn open_and_migrate(&self, fresh: bool) -> Result<Connection> {
        let mut conn = Connection::open(&self.db_path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        provision(&mut conn, &self.seed, fresh)?;
        Ok(conn)
    }

    /// Release the connection. The store can be re-opened with `init`.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            log::info!("Closed word database {:?}", self.db_path);
        }
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(WordStoreError::NotInitialized)
    }

    fn conn_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(WordStoreError::NotInitialized)
    }

    // ==================== Entry Operations ====================

    /// Get an entry with overrides and notes merged in
    pub fn get_by_id(&self, id: i64) -> Result<Option<VocabularyEntry>> {
        let conn = self.conn()?;
        let Some(mut entry) = load_base(conn, id)? else {
            return Ok(None);
        };

        let mut stmt =
            conn.prepare("SELECT field, value FROM word_overrides WHERE word_id = ?1")?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (name, value) = row?;
            match EntryField::parse(&name) {
                Some(field) => field.set(&mut entry, value),
                None => log::warn!("Ignoring override of unknown field {:?} on word {}", name, id),
            }
        }

        entry.notes = load_notes(conn, id)?;
        Ok(Some(entry))
    }

    /// Total number of entries, removed ones included
    pub fn total_word_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Set a per-field override. An override equal to the base value is deleted.
    pub fn set_override(&mut self, id: i64, field: EntryField, value: &str) -> Result<()> {
        let conn = self.conn()?;
        let base = load_base(conn, id)?.ok_or(WordStoreError::NotFound(id))?;
        write_override(conn, &base, field, value)
    }

    pub fn clear_override(&mut self, id: i64, field: EntryField) -> Result<()> {
        let conn = self.conn()?;
        ensure_word_exists(conn, id)?;
        conn.execute(
            "DELETE FROM word_overrides WHERE word_id = ?1 AND field = ?2",
            params![id, field.as_str()],
        )?;
        Ok(())
    }

    /// Raw overrides of an entry, in field order
    pub fn overrides(&self, id: i64) -> Result<Vec<(EntryField, String)>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT field, value FROM word_overrides WHERE word_id = ?1")?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut overrides = Vec::new();
        for row in rows {
            let (name, value) = row?;
            if let Some(field) = EntryField::parse(&name) {
                overrides.push((field, value));
            }
        }
        overrides.sort_by_key(|(field, _)| EntryField::ALL.iter().position(|f| f == field));
        Ok(overrides)
    }

    pub fn get_notes(&self, id: i64) -> Result<Option<String>> {
        load_notes(self.conn()?, id)
    }

    /// Store notes for an entry; blank text deletes them
    pub fn set_notes(&mut self, id: i64, text: &str) -> Result<()> {
        let conn = self.conn()?;
        ensure_word_exists(conn, id)?;
        write_notes(conn, id, text)
    }

    /// Apply a whole-card edit atomically and return the merged entry
    pub fn apply_edit(&mut self, id: i64, edit: &WordEdit) -> Result<VocabularyEntry> {
        let conn = self.conn_mut()?;
        let tx = conn.transaction()?;
        let base = load_base(&tx, id)?.ok_or(WordStoreError::NotFound(id))?;
        for (field, value) in edit.fields() {
            write_override(&tx, &base, field, value)?;
        }
        if let Some(notes) = &edit.notes {
            write_notes(&tx, id, notes)?;
        }
        tx.commit()?;

        self.get_by_id(id)?.ok_or(WordStoreError::NotFound(id))
    }

    // ==================== Review Operations ====================

    /// Review state of an entry; `None` means it was never reviewed
    pub fn get_review_state(&self, id: i64) -> Result<Option<ReviewState>> {
        let conn = self.conn()?;
        let raw = conn
            .query_row(
                "SELECT word_id, bucket, times_known, times_seen, last_seen, is_removed
                 FROM user_progress WHERE word_id = ?1",
                params![id],
                RawReviewState::from_row,
            )
            .optional()?;
        raw.map(RawReviewState::decode).transpose()
    }

    /// Record a review: file the entry under `bucket`, stamp it as seen now
    pub fn apply_review(&mut self, id: i64, bucket: Bucket, removed: bool) -> Result<ReviewState> {
        let conn = self.conn()?;
        ensure_word_exists(conn, id)?;

        let now = encode_timestamp(Utc::now());
        let known = i64::from(bucket.is_known());
        conn.execute(
            "INSERT INTO user_progress (word_id, bucket, times_seen, times_known, last_seen, is_removed, updated_at)
             VALUES (?1, ?2, 1, ?3, ?4, ?5, ?4)
             ON CONFLICT(word_id) DO UPDATE SET
                bucket = excluded.bucket,
                times_seen = user_progress.times_seen + 1,
                times_known = user_progress.times_known + excluded.times_known,
                last_seen = excluded.last_seen,
                is_removed = excluded.is_removed,
                updated_at = excluded.updated_at",
            params![id, bucket.as_str(), known, now, removed],
        )?;

        log::debug!("Word {} filed under {} (removed: {})", id, bucket, removed);
        self.get_review_state(id)?
            .ok_or_else(|| WordStoreError::CorruptRow(format!("progress for word {} vanished", id)))
    }

    /// Return an entry to the unseen state. Idempotent.
    pub fn reset_review_state(&mut self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        ensure_word_exists(conn, id)?;
        conn.execute("DELETE FROM user_progress WHERE word_id = ?1", params![id])?;
        Ok(())
    }

    /// Write back a previously read review state verbatim (undo path)
    pub fn restore_review_state(&mut self, state: &ReviewState) -> Result<()> {
        let conn = self.conn()?;
        ensure_word_exists(conn, state.word_id)?;
        conn.execute(
            "INSERT OR REPLACE INTO user_progress (word_id, bucket, times_seen, times_known, last_seen, is_removed, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                state.word_id,
                state.bucket.as_str(),
                state.times_seen,
                state.times_known,
                state.last_seen.map(encode_timestamp),
                state.removed,
                encode_timestamp(Utc::now()),
            ],
        )?;
        Ok(())
    }

    /// Forget all review progress. Returns the number of cleared entries.
    pub fn reset_all_progress(&mut self) -> Result<usize> {
        let cleared = self.conn()?.execute("DELETE FROM user_progress", [])?;
        log::info!("Progress reset ({} entries cleared)", cleared);
        Ok(cleared)
    }

    /// Bucket counts over entries that are not removed
    pub fn count_by_bucket(&self) -> Result<BucketCounts> {
        let conn = self.conn()?;
        let (dont_know, learning, mastered, total_reviewed): (i64, i64, i64, i64) = conn.query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN bucket = 'dontKnow' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN bucket = 'learning' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN bucket = 'mastered' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN last_seen IS NOT NULL THEN 1 ELSE 0 END), 0)
             FROM user_progress
             WHERE is_removed = 0",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;
        let total_words: i64 = conn.query_row(
            "SELECT COUNT(*) FROM words w
             LEFT JOIN user_progress p ON p.word_id = w.id
             WHERE COALESCE(p.is_removed, 0) = 0",
            [],
            |row| row.get(0),
        )?;

        Ok(BucketCounts {
            dont_know: dont_know as usize,
            learning: learning as usize,
            mastered: mastered as usize,
            total_reviewed: total_reviewed as usize,
            total_words: total_words as usize,
        })
    }

    // ==================== Selection Queries ====================

    /// Non-removed entries that were never reviewed
    pub fn unseen_word_ids(&self) -> Result<Vec<i64>> {
        query_ids(
            self.conn()?,
            "SELECT w.id FROM words w
             LEFT JOIN user_progress p ON p.word_id = w.id
             WHERE p.last_seen IS NULL AND COALESCE(p.is_removed, 0) = 0
             ORDER BY w.id",
            params![],
        )
    }

    /// Non-removed entries filed under `bucket`
    pub fn word_ids_in_bucket(&self, bucket: Bucket) -> Result<Vec<i64>> {
        query_ids(
            self.conn()?,
            "SELECT word_id FROM user_progress
             WHERE bucket = ?1 AND is_removed = 0
             ORDER BY word_id",
            params![bucket.as_str()],
        )
    }

    /// All non-removed entries regardless of bucket
    pub fn active_word_ids(&self) -> Result<Vec<i64>> {
        query_ids(
            self.conn()?,
            "SELECT w.id FROM words w
             LEFT JOIN user_progress p ON p.word_id = w.id
             WHERE COALESCE(p.is_removed, 0) = 0
             ORDER BY w.id",
            params![],
        )
    }

    // ==================== App Settings ====================

    pub fn onboarding_completed(&self) -> Result<bool> {
        let value: Option<String> = self
            .conn()?
            .query_row(
                "SELECT value FROM app_settings WHERE key = ?1",
                params![ONBOARDING_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.as_deref() == Some("true"))
    }

    pub fn set_onboarding_completed(&mut self) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?1, 'true')",
            params![ONBOARDING_KEY],
        )?;
        Ok(())
    }
}

impl ProgressStore for WordStore {
    fn init(&mut self) -> Result<()> {
        WordStore::init(self)
    }

    fn entry(&self, id: i64) -> Result<Option<VocabularyEntry>> {
        self.get_by_id(id)
    }

    fn review_state(&self, id: i64) -> Result<Option<ReviewState>> {
        self.get_review_state(id)
    }

    fn apply_review(&mut self, id: i64, bucket: Bucket, removed: bool) -> Result<ReviewState> {
        WordStore::apply_review(self, id, bucket, removed)
    }

    fn reset_review_state(&mut self, id: i64) -> Result<()> {
        WordStore::reset_review_state(self, id)
    }

    fn restore_review_state(&mut self, state: &ReviewState) -> Result<()> {
        WordStore::restore_review_state(self, state)
    }

    fn counts(&self) -> Result<BucketCounts> {
        self.count_by_bucket()
    }

    fn unseen_word_ids(&self) -> Result<Vec<i64>> {
        WordStore::unseen_word_ids(self)
    }

    fn word_ids_in_bucket(&self, bucket: Bucket) -> Result<Vec<i64>> {
        WordStore::word_ids_in_bucket(self, bucket)
    }

    fn active_word_ids(&self) -> Result<Vec<i64>> {
        WordStore::active_word_ids(self)
    }
}

/// Migrate and, for a fresh file, import the seed words. Both happen in one
/// transaction so an interrupted provisioning never leaves an empty deck
/// behind a current `user_version`.
fn provision(conn: &mut Connection, seed: &SeedSource, fresh: bool) -> Result<()> {
    let tx = conn.transaction()?;
    migrate(&tx)?;
    if fresh {
        seed.import_into(&tx)?;
    }
    tx.commit()?;
    Ok(())
}

/// Bring an opened database to `SCHEMA_VERSION`.
///
/// Version 0 files may carry the older two-bucket `user_progress` table
/// ('dontKnow' / 'know'); its rows are carried over with 'know' read as
/// 'mastered'.
fn migrate(tx: &Connection) -> Result<()> {
    let version: i64 = tx.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    let legacy = table_exists(&tx, "user_progress")?;
    if legacy {
        tx.execute_batch("ALTER TABLE user_progress RENAME TO user_progress_legacy;")?;
    }

    tx.execute_batch(SCHEMA)?;

    if legacy {
        let carried = tx.execute(
            "INSERT INTO user_progress (word_id, bucket, times_seen, times_known, last_seen, is_removed, updated_at)
             SELECT word_id,
                    CASE bucket
                        WHEN 'know' THEN 'mastered'
                        WHEN 'mastered' THEN 'mastered'
                        WHEN 'learning' THEN 'learning'
                        ELSE 'dontKnow'
                    END,
                    COALESCE(times_seen, 0),
                    COALESCE(times_known, 0),
                    last_seen,
                    COALESCE(is_removed, 0),
                    updated_at
             FROM user_progress_legacy
             WHERE word_id IN (SELECT id FROM words)",
            [],
        )?;
        tx.execute_batch("DROP TABLE user_progress_legacy;")?;
        log::info!("Migrated {} legacy progress rows", carried);
    }
    // After the legacy drop, which takes same-named legacy indexes with it
    tx.execute_batch(INDEXES)?;

    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn ensure_word_exists(conn: &Connection, id: i64) -> Result<()> {
    let exists: Option<i64> = conn
        .query_row("SELECT id FROM words WHERE id = ?1", params![id], |row| row.get(0))
        .optional()?;
    exists.map(|_| ()).ok_or(WordStoreError::NotFound(id))
}

/// Base entry without overrides or notes
fn load_base(conn: &Connection, id: i64) -> Result<Option<VocabularyEntry>> {
    let entry = conn
        .query_row(
            "SELECT id, german, english, german_example, english_example, article, part_of_speech, pronunciation
             FROM words WHERE id = ?1",
            params![id],
            |row| {
                Ok(VocabularyEntry {
                    id: row.get(0)?,
                    german: row.get(1)?,
                    english: row.get(2)?,
                    german_example: row.get(3)?,
                    english_example: row.get(4)?,
                    article: row.get(5)?,
                    part_of_speech: row.get(6)?,
                    pronunciation: row.get(7)?,
                    notes: None,
                })
            },
        )
        .optional()?;
    Ok(entry)
}

fn load_notes(conn: &Connection, id: i64) -> Result<Option<String>> {
    let notes = conn
        .query_row(
            "SELECT notes FROM word_notes WHERE word_id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(notes)
}

fn write_override(conn: &Connection, base: &VocabularyEntry, field: EntryField, value: &str) -> Result<()> {
    if field.get(base) == value {
        conn.execute(
            "DELETE FROM word_overrides WHERE word_id = ?1 AND field = ?2",
            params![base.id, field.as_str()],
        )?;
    } else {
        conn.execute(
            "INSERT INTO word_overrides (word_id, field, value, updated_at)
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
             ON CONFLICT(word_id, field) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![base.id, field.as_str(), value],
        )?;
    }
    Ok(())
}

fn write_notes(conn: &Connection, id: i64, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        conn.execute("DELETE FROM word_notes WHERE word_id = ?1", params![id])?;
    } else {
        conn.execute(
            "INSERT INTO word_notes (word_id, notes, updated_at)
             VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(word_id) DO UPDATE SET
                notes = excluded.notes,
                updated_at = excluded.updated_at",
            params![id, text],
        )?;
    }
    Ok(())
}

fn query_ids(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map(args, |row| row.get(0))?
        .collect::<std::result::Result<Vec<i64>, _>>()?;
    Ok(ids)
}

fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

/// Parse RFC 3339, falling back to SQLite's `datetime('now')` format
fn decode_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|ts| ts.and_utc())
        })
}

/// Progress row as stored, before validation
struct RawReviewState {
    word_id: i64,
    bucket: String,
    times_known: i64,
    times_seen: i64,
    last_seen: Option<String>,
    removed: bool,
}

impl RawReviewState {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            word_id: row.get(0)?,
            bucket: row.get(1)?,
            times_known: row.get(2)?,
            times_seen: row.get(3)?,
            last_seen: row.get(4)?,
            removed: row.get(5)?,
        })
    }

    fn decode(self) -> Result<ReviewState> {
        let bucket = Bucket::parse(&self.bucket).ok_or_else(|| {
            WordStoreError::CorruptRow(format!("word {}: unknown bucket {:?}", self.word_id, self.bucket))
        })?;
        let last_seen = match self.last_seen {
            Some(raw) => Some(decode_timestamp(&raw).ok_or_else(|| {
                WordStoreError::CorruptRow(format!("word {}: bad timestamp {:?}", self.word_id, raw))
            })?),
            None => None,
        };

        Ok(ReviewState {
            word_id: self.word_id,
            bucket,
            times_known: self.times_known.max(0) as u32,
            times_seen: self.times_seen.max(0) as u32,
            last_seen,
            removed: self.removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn words(n: usize) -> Vec<NewWord> {
        (1..=n)
            .map(|i| NewWord::new(format!("Wort {}", i), format!("word {}", i)))
            .collect()
    }

    fn create_test_store(n: usize) -> (WordStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut store = WordStore::new(
            temp_dir.path().join("words.db"),
            SeedSource::Words(words(n)),
        );
        store.init().unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_operations_before_init_fail() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = WordStore::new(temp_dir.path().join("words.db"), SeedSource::Bundled);

        assert!(!store.is_initialized());
        assert!(matches!(store.get_by_id(1), Err(WordStoreError::NotInitialized)));
        assert!(matches!(store.count_by_bucket(), Err(WordStoreError::NotInitialized)));
        assert!(matches!(
            store.apply_review(1, Bucket::Mastered, false),
            Err(WordStoreError::NotInitialized)
        ));
        // Nothing was provisioned either
        assert!(!store.db_path().exists());
    }

    #[test]
    fn test_init_provisions_bundled_words() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = WordStore::new(temp_dir.path().join("db").join("words.db"), SeedSource::Bundled);
        store.init().unwrap();

        let expected = SeedSource::starter_words().unwrap().len();
        assert_eq!(store.total_word_count().unwrap(), expected);

        let first = store.get_by_id(1).unwrap().unwrap();
        assert_eq!(first.german, "das Haus");
        assert_eq!(first.english, "house");
    }

    #[test]
    fn test_init_is_idempotent_and_never_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("words.db");

        let mut store = WordStore::new(path.clone(), SeedSource::Words(words(3)));
        store.init().unwrap();
        store.init().unwrap();
        store.apply_review(2, Bucket::Learning, false).unwrap();
        store.close();

        // A different seed must not replace the existing local copy
        let mut reopened = WordStore::new(path, SeedSource::Words(words(10)));
        reopened.init().unwrap();
        assert_eq!(reopened.total_word_count().unwrap(), 3);
        assert_eq!(
            reopened.get_review_state(2).unwrap().unwrap().bucket,
            Bucket::Learning
        );
    }

    #[test]
    fn test_init_copies_seed_database() {
        let temp_dir = TempDir::new().unwrap();
        let shipped = temp_dir.path().join("shipped.db");
        {
            let mut seed_store = WordStore::new(shipped.clone(), SeedSource::Words(words(5)));
            seed_store.init().unwrap();
        }

        let local = temp_dir.path().join("local").join("words.db");
        let mut store = WordStore::new(local.clone(), SeedSource::Database(shipped.clone()));
        store.init().unwrap();

        assert!(local.exists());
        assert_eq!(store.total_word_count().unwrap(), 5);
        store.apply_review(1, Bucket::DontKnow, false).unwrap();

        // The shipped file stays untouched
        let mut original = WordStore::new(shipped, SeedSource::Bundled);
        original.init().unwrap();
        assert!(original.get_review_state(1).unwrap().is_none());
    }

    #[test]
    fn test_init_migrates_legacy_progress_table() {
        let temp_dir = TempDir::new().unwrap();
        let shipped = temp_dir.path().join("legacy.db");
        {
            let conn = Connection::open(&shipped).unwrap();
            conn.execute_batch(
                r#"
                CREATE TABLE words (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    german TEXT NOT NULL,
                    english TEXT NOT NULL,
                    article TEXT,
                    part_of_speech TEXT,
                    german_example TEXT NOT NULL,
                    english_example TEXT NOT NULL,
                    pronunciation TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );
                CREATE TABLE user_progress (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    word_id INTEGER NOT NULL UNIQUE,
                    bucket TEXT NOT NULL CHECK(bucket IN ('dontKnow', 'know')),
                    times_seen INTEGER DEFAULT 0,
                    times_known INTEGER DEFAULT 0,
                    last_seen TIMESTAMP,
                    is_removed BOOLEAN DEFAULT 0,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );
                INSERT INTO words (german, english, german_example, english_example)
                    VALUES ('der Hund', 'dog', 'Der Hund bellt.', 'The dog barks.');
                INSERT INTO words (german, english, german_example, english_example)
                    VALUES ('die Katze', 'cat', 'Die Katze schläft.', 'The cat sleeps.');
                INSERT INTO user_progress (word_id, bucket, times_seen, times_known, last_seen)
                    VALUES (1, 'know', 4, 3, '2025-03-01 12:30:00');
                "#,
            )
            .unwrap();
        }

        let mut store = WordStore::new(
            temp_dir.path().join("words.db"),
            SeedSource::Database(shipped),
        );
        store.init().unwrap();

        let state = store.get_review_state(1).unwrap().unwrap();
        assert_eq!(state.bucket, Bucket::Mastered);
        assert_eq!(state.times_known, 3);
        assert_eq!(state.times_seen, 4);
        assert_eq!(
            state.last_seen.unwrap().to_rfc3339(),
            "2025-03-01T12:30:00+00:00"
        );

        // The new three-bucket schema accepts 'learning'
        store.apply_review(2, Bucket::Learning, false).unwrap();
        assert_eq!(store.count_by_bucket().unwrap().learning, 1);
    }

    #[test]
    fn test_failed_import_rolls_back_schema() {
        let mut conn = Connection::open_in_memory().unwrap();
        // A words table the import cannot write to
        conn.execute_batch("CREATE TABLE words (id INTEGER PRIMARY KEY, german TEXT NOT NULL);")
            .unwrap();

        let result = provision(&mut conn, &SeedSource::Words(words(3)), true);
        assert!(matches!(result, Err(WordStoreError::Sqlite(_))));

        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0)).unwrap();
        assert_eq!(version, 0);
        assert!(!table_exists(&conn, "user_progress").unwrap());
    }

    #[test]
    fn test_unknown_id_is_absent_not_error() {
        let (store, _temp) = create_test_store(3);
        assert!(store.get_by_id(99).unwrap().is_none());
        assert!(store.get_review_state(99).unwrap().is_none());
    }

    #[test]
    fn test_never_reviewed_entries_have_no_state() {
        let (store, _temp) = create_test_store(4);
        for id in 1..=4 {
            assert!(store.get_review_state(id).unwrap().is_none());
        }
        assert_eq!(store.unseen_word_ids().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_apply_review_unknown_id() {
        let (mut store, _temp) = create_test_store(2);
        assert!(matches!(
            store.apply_review(42, Bucket::DontKnow, false),
            Err(WordStoreError::NotFound(42))
        ));
        assert!(matches!(
            store.reset_review_state(42),
            Err(WordStoreError::NotFound(42))
        ));
    }

    #[test]
    fn test_apply_review_updates_counters() {
        let (mut store, _temp) = create_test_store(2);

        let state = store.apply_review(1, Bucket::Mastered, false).unwrap();
        assert_eq!(state.bucket, Bucket::Mastered);
        assert_eq!(state.times_known, 1);
        assert_eq!(state.times_seen, 1);
        assert!(state.last_seen.is_some());
        assert!(!state.removed);

        let state = store.apply_review(1, Bucket::DontKnow, false).unwrap();
        assert_eq!(state.bucket, Bucket::DontKnow);
        assert_eq!(state.times_known, 1);
        assert_eq!(state.times_seen, 2);

        let state = store.apply_review(1, Bucket::Mastered, true).unwrap();
        assert_eq!(state.times_known, 2);
        assert!(state.removed);
    }

    #[test]
    fn test_mastered_review_moves_counts() {
        let (mut store, _temp) = create_test_store(3);

        let before = store.count_by_bucket().unwrap();
        store.apply_review(1, Bucket::Mastered, false).unwrap();
        let after = store.count_by_bucket().unwrap();
        assert_eq!(after.mastered, before.mastered + 1);
        assert_eq!(after.total_reviewed, before.total_reviewed + 1);

        store.apply_review(2, Bucket::Learning, false).unwrap();
        let before = store.count_by_bucket().unwrap();
        store.apply_review(2, Bucket::Mastered, false).unwrap();
        let after = store.count_by_bucket().unwrap();
        assert_eq!(after.mastered, before.mastered + 1);
        assert_eq!(after.learning, before.learning - 1);
        assert_eq!(after.total_reviewed, before.total_reviewed);
    }

    #[test]
    fn test_counts_exclude_removed() {
        let (mut store, _temp) = create_test_store(4);
        store.apply_review(1, Bucket::DontKnow, false).unwrap();
        store.apply_review(2, Bucket::Learning, false).unwrap();
        store.apply_review(3, Bucket::Mastered, true).unwrap();

        let counts = store.count_by_bucket().unwrap();
        assert_eq!(counts.dont_know, 1);
        assert_eq!(counts.learning, 1);
        assert_eq!(counts.mastered, 0);
        assert_eq!(counts.total_reviewed, 2);
        assert_eq!(counts.total_words, 3);
        assert_eq!(store.total_word_count().unwrap(), 4);

        assert_eq!(store.active_word_ids().unwrap(), vec![1, 2, 4]);
        assert!(store.word_ids_in_bucket(Bucket::Mastered).unwrap().is_empty());
    }

    #[test]
    fn test_reset_review_state_is_idempotent() {
        let (mut store, _temp) = create_test_store(2);
        store.apply_review(1, Bucket::Learning, true).unwrap();

        store.reset_review_state(1).unwrap();
        assert!(store.get_review_state(1).unwrap().is_none());
        store.reset_review_state(1).unwrap();
        assert!(store.get_review_state(1).unwrap().is_none());

        let counts = store.count_by_bucket().unwrap();
        assert_eq!(counts.total_reviewed, 0);
        assert_eq!(store.unseen_word_ids().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_restore_review_state_is_exact() {
        let (mut store, _temp) = create_test_store(1);
        store.apply_review(1, Bucket::Mastered, false).unwrap();
        let before = store.apply_review(1, Bucket::Mastered, false).unwrap();

        store.apply_review(1, Bucket::DontKnow, false).unwrap();
        store.restore_review_state(&before).unwrap();

        assert_eq!(store.get_review_state(1).unwrap(), Some(before));
    }

    #[test]
    fn test_reset_all_progress() {
        let (mut store, _temp) = create_test_store(3);
        store.apply_review(1, Bucket::DontKnow, false).unwrap();
        store.apply_review(2, Bucket::Mastered, false).unwrap();

        assert_eq!(store.reset_all_progress().unwrap(), 2);
        assert_eq!(store.count_by_bucket().unwrap().total_reviewed, 0);
    }

    #[test]
    fn test_override_roundtrip() {
        let (mut store, _temp) = create_test_store(2);

        store.set_override(1, EntryField::German, "Hund2").unwrap();
        assert_eq!(store.get_by_id(1).unwrap().unwrap().german, "Hund2");
        assert_eq!(
            store.overrides(1).unwrap(),
            vec![(EntryField::German, "Hund2".to_string())]
        );

        // Setting the base value drops the override
        store.set_override(1, EntryField::German, "Wort 1").unwrap();
        assert!(store.overrides(1).unwrap().is_empty());
        assert_eq!(store.get_by_id(1).unwrap().unwrap().german, "Wort 1");

        // Unrelated overrides don't bring it back
        store.set_override(1, EntryField::English, "a word").unwrap();
        store.set_override(2, EntryField::German, "Anderes").unwrap();
        let entry = store.get_by_id(1).unwrap().unwrap();
        assert_eq!(entry.german, "Wort 1");
        assert_eq!(entry.english, "a word");
    }

    #[test]
    fn test_override_of_missing_example() {
        let (mut store, _temp) = create_test_store(1);

        // An empty value equals the missing base example
        store.set_override(1, EntryField::GermanExample, "").unwrap();
        assert!(store.overrides(1).unwrap().is_empty());

        store.set_override(1, EntryField::GermanExample, "Ein Beispiel.").unwrap();
        let entry = store.get_by_id(1).unwrap().unwrap();
        assert_eq!(entry.german_example.as_deref(), Some("Ein Beispiel."));

        store.clear_override(1, EntryField::GermanExample).unwrap();
        assert!(store.get_by_id(1).unwrap().unwrap().german_example.is_none());
    }

    #[test]
    fn test_override_unknown_id() {
        let (mut store, _temp) = create_test_store(1);
        assert!(matches!(
            store.set_override(7, EntryField::German, "x"),
            Err(WordStoreError::NotFound(7))
        ));
    }

    #[test]
    fn test_notes_set_and_delete() {
        let (mut store, _temp) = create_test_store(1);
        assert!(store.get_notes(1).unwrap().is_none());

        store.set_notes(1, "sounds like 'hunt'").unwrap();
        assert_eq!(store.get_notes(1).unwrap().as_deref(), Some("sounds like 'hunt'"));
        assert_eq!(
            store.get_by_id(1).unwrap().unwrap().notes.as_deref(),
            Some("sounds like 'hunt'")
        );

        store.set_notes(1, "   ").unwrap();
        assert!(store.get_notes(1).unwrap().is_none());
    }

    #[test]
    fn test_apply_edit() {
        let (mut store, _temp) = create_test_store(1);
        let edit = WordEdit {
            german: Some("Wort 1".to_string()),
            english: Some("term".to_string()),
            german_example: Some("Das Wort ist kurz.".to_string()),
            english_example: None,
            notes: Some("neuter".to_string()),
        };

        let entry = store.apply_edit(1, &edit).unwrap();
        assert_eq!(entry.german, "Wort 1");
        assert_eq!(entry.english, "term");
        assert_eq!(entry.german_example.as_deref(), Some("Das Wort ist kurz."));
        assert!(entry.english_example.is_none());
        assert_eq!(entry.notes.as_deref(), Some("neuter"));

        // German matched the base value, so only two overrides exist
        assert_eq!(store.overrides(1).unwrap().len(), 2);
    }

    #[test]
    fn test_onboarding_flag() {
        let (mut store, _temp) = create_test_store(1);
        assert!(!store.onboarding_completed().unwrap());
        store.set_onboarding_completed().unwrap();
        assert!(store.onboarding_completed().unwrap());
    }

    #[test]
    fn test_close_then_reinit() {
        let (mut store, _temp) = create_test_store(2);
        store.apply_review(1, Bucket::Learning, false).unwrap();
        store.close();
        assert!(matches!(store.get_review_state(1), Err(WordStoreError::NotInitialized)));

        store.init().unwrap();
        assert_eq!(store.get_review_state(1).unwrap().unwrap().bucket, Bucket::Learning);
    }
}
