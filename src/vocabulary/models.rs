//! Data models for the vocabulary deck

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vocabulary entry with any user overrides and notes already merged in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: i64,
    pub german: String,
    pub english: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub german_example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english_example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A row for bulk import into a fresh word database
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub german: String,
    pub english: String,
    #[serde(default)]
    pub german_example: Option<String>,
    #[serde(default)]
    pub english_example: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub pronunciation: Option<String>,
}

impl NewWord {
    pub fn new(german: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            german: german.into(),
            english: english.into(),
            german_example: None,
            english_example: None,
            article: None,
            part_of_speech: None,
            pronunciation: None,
        }
    }

    pub fn with_examples(mut self, german: impl Into<String>, english: impl Into<String>) -> Self {
        self.german_example = Some(german.into());
        self.english_example = Some(english.into());
        self
    }
}

/// Fields of an entry that the user may override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryField {
    German,
    English,
    GermanExample,
    EnglishExample,
}

impl EntryField {
    pub const ALL: [EntryField; 4] = [
        EntryField::German,
        EntryField::English,
        EntryField::GermanExample,
        EntryField::EnglishExample,
    ];

    /// Key stored in the overrides table, identical to the base column name
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryField::German => "german",
            EntryField::English => "english",
            EntryField::GermanExample => "german_example",
            EntryField::EnglishExample => "english_example",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Current value of this field on an entry (missing examples read as "")
    pub fn get<'a>(&self, entry: &'a VocabularyEntry) -> &'a str {
        match self {
            EntryField::German => &entry.german,
            EntryField::English => &entry.english,
            EntryField::GermanExample => entry.german_example.as_deref().unwrap_or(""),
            EntryField::EnglishExample => entry.english_example.as_deref().unwrap_or(""),
        }
    }

    pub fn set(&self, entry: &mut VocabularyEntry, value: String) {
        match self {
            EntryField::German => entry.german = value,
            EntryField::English => entry.english = value,
            EntryField::GermanExample => entry.german_example = Some(value),
            EntryField::EnglishExample => entry.english_example = Some(value),
        }
    }
}

/// A whole-card edit as submitted from the edit dialog.
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEdit {
    pub german: Option<String>,
    pub english: Option<String>,
    pub german_example: Option<String>,
    pub english_example: Option<String>,
    pub notes: Option<String>,
}

impl WordEdit {
    pub fn fields(&self) -> impl Iterator<Item = (EntryField, &str)> {
        [
            (EntryField::German, self.german.as_deref()),
            (EntryField::English, self.english.as_deref()),
            (EntryField::GermanExample, self.german_example.as_deref()),
            (EntryField::EnglishExample, self.english_example.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }
}

/// Confidence bucket of a reviewed word.
/// A word that was never reviewed has no bucket at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    DontKnow,
    Learning,
    Mastered,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::DontKnow, Bucket::Learning, Bucket::Mastered];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::DontKnow => "dontKnow",
            Bucket::Learning => "learning",
            Bucket::Mastered => "mastered",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dontKnow" => Some(Bucket::DontKnow),
            "learning" => Some(Bucket::Learning),
            "mastered" => Some(Bucket::Mastered),
            _ => None,
        }
    }

    /// Bucket that counts towards `times_known`
    pub fn is_known(&self) -> bool {
        matches!(self, Bucket::Mastered)
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted review state of a word. Absent until the first review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub word_id: i64,
    pub bucket: Bucket,
    /// Number of reviews that filed the word as known
    #[serde(default)]
    pub times_known: u32,
    /// Total number of reviews
    #[serde(default)]
    pub times_seen: u32,
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub removed: bool,
}

/// Aggregate bucket statistics over non-removed words
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCounts {
    pub dont_know: usize,
    pub learning: usize,
    pub mastered: usize,
    pub total_reviewed: usize,
    pub total_words: usize,
}

impl BucketCounts {
    pub fn get(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::DontKnow => self.dont_know,
            Bucket::Learning => self.learning,
            Bucket::Mastered => self.mastered,
        }
    }

    /// Share of reviewed words that are mastered, 0.0 when nothing was reviewed
    pub fn mastered_ratio(&self) -> f64 {
        if self.total_reviewed == 0 {
            0.0
        } else {
            self.mastered as f64 / self.total_reviewed as f64
        }
    }
}

/// Direction a card was swiped off the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
}

/// One entry of the session's undo history
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeRecord {
    pub word_id: i64,
    pub direction: SwipeDirection,
    /// Review state before the swipe; `None` means the word was unseen
    pub prior_state: Option<ReviewState>,
}

impl SwipeRecord {
    pub fn prior_bucket(&self) -> Option<Bucket> {
        self.prior_state.as_ref().map(|s| s.bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> VocabularyEntry {
        VocabularyEntry {
            id: 1,
            german: "der Hund".to_string(),
            english: "dog".to_string(),
            german_example: None,
            english_example: Some("The dog barks.".to_string()),
            article: Some("der".to_string()),
            part_of_speech: Some("noun".to_string()),
            pronunciation: None,
            notes: None,
        }
    }

    #[test]
    fn test_entry_field_names_roundtrip() {
        for field in EntryField::ALL {
            assert_eq!(EntryField::parse(field.as_str()), Some(field));
        }
        assert_eq!(EntryField::parse("notes"), None);
        assert_eq!(EntryField::parse("id"), None);
    }

    #[test]
    fn test_entry_field_get_and_set() {
        let mut e = entry();
        assert_eq!(EntryField::GermanExample.get(&e), "");
        assert_eq!(EntryField::EnglishExample.get(&e), "The dog barks.");

        EntryField::German.set(&mut e, "Hund2".to_string());
        EntryField::GermanExample.set(&mut e, "Der Hund bellt.".to_string());
        assert_eq!(e.german, "Hund2");
        assert_eq!(e.german_example.as_deref(), Some("Der Hund bellt."));
    }

    #[test]
    fn test_bucket_serialization_matches_storage_names() {
        assert_eq!(serde_json::to_string(&Bucket::DontKnow).unwrap(), "\"dontKnow\"");
        assert_eq!(Bucket::parse("learning"), Some(Bucket::Learning));
        assert_eq!(Bucket::parse("know"), None);
        assert!(Bucket::Mastered.is_known());
        assert!(!Bucket::Learning.is_known());
    }

    #[test]
    fn test_word_edit_fields_skips_untouched() {
        let edit = WordEdit {
            english: Some("hound".to_string()),
            notes: Some("irrelevant here".to_string()),
            ..Default::default()
        };
        let fields: Vec<_> = edit.fields().collect();
        assert_eq!(fields, vec![(EntryField::English, "hound")]);
    }

    #[test]
    fn test_mastered_ratio() {
        let counts = BucketCounts::default();
        assert_eq!(counts.mastered_ratio(), 0.0);

        let counts = BucketCounts {
            mastered: 1,
            total_reviewed: 4,
            ..Default::default()
        };
        assert!((counts.mastered_ratio() - 0.25).abs() < f64::EPSILON);
    }
}
