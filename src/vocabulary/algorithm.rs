//! Word selection and review transition rules
//!
//! Selection order:
//! 1. Any unseen (never reviewed, not removed) word, uniformly at random.
//! 2. Otherwise a weighted bucket draw r in [0, 1):
//!    - r < 0.70: dontKnow
//!    - r < 0.95: learning
//!    - else: mastered
//!    then a uniform pick inside that bucket.
//! 3. Empty target bucket: uniform pick among all non-removed words.
//! 4. Nothing left: no word.
//!
//! The sampler is memoryless. It may repeat a word immediately.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::models::{Bucket, BucketCounts, ReviewState, SwipeDirection, SwipeRecord, VocabularyEntry};
use super::storage::Result;

/// The slice of the word store the policy and the session work through
pub trait ProgressStore {
    fn init(&mut self) -> Result<()>;
    fn entry(&self, id: i64) -> Result<Option<VocabularyEntry>>;
    fn review_state(&self, id: i64) -> Result<Option<ReviewState>>;
    fn apply_review(&mut self, id: i64, bucket: Bucket, removed: bool) -> Result<ReviewState>;
    fn reset_review_state(&mut self, id: i64) -> Result<()>;
    fn restore_review_state(&mut self, state: &ReviewState) -> Result<()>;
    fn counts(&self) -> Result<BucketCounts>;
    fn unseen_word_ids(&self) -> Result<Vec<i64>>;
    fn word_ids_in_bucket(&self, bucket: Bucket) -> Result<Vec<i64>>;
    fn active_word_ids(&self) -> Result<Vec<i64>>;
}

/// Cumulative cutoffs of the weighted bucket draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionWeights {
    #[serde(default = "default_dont_know_cutoff")]
    pub dont_know_cutoff: f64,
    #[serde(default = "default_learning_cutoff")]
    pub learning_cutoff: f64,
}

fn default_dont_know_cutoff() -> f64 {
    0.70
}

fn default_learning_cutoff() -> f64 {
    0.95
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            dont_know_cutoff: default_dont_know_cutoff(),
            learning_cutoff: default_learning_cutoff(),
        }
    }
}

/// What a swipe does to a word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewDecision {
    pub bucket: Bucket,
    pub removed: bool,
}

/// Map a swipe to its bucket.
///
/// Left = don't know, right = still learning, up = mastered. No direction
/// removes a word.
pub fn decision_for_swipe(direction: SwipeDirection) -> ReviewDecision {
    let bucket = match direction {
        SwipeDirection::Left => Bucket::DontKnow,
        SwipeDirection::Right => Bucket::Learning,
        SwipeDirection::Up => Bucket::Mastered,
    };
    ReviewDecision {
        bucket,
        removed: false,
    }
}

/// Target bucket for a uniform draw `r` in [0, 1)
pub fn choose_bucket(r: f64, weights: &SelectionWeights) -> Bucket {
    if r < weights.dont_know_cutoff {
        Bucket::DontKnow
    } else if r < weights.learning_cutoff {
        Bucket::Learning
    } else {
        Bucket::Mastered
    }
}

/// Pick the next word to show, or `None` when every word is removed
pub fn select_next_word<S, R>(store: &S, weights: &SelectionWeights, rng: &mut R) -> Result<Option<VocabularyEntry>>
where
    S: ProgressStore + ?Sized,
    R: Rng,
{
    match select_next_word_id(store, weights, rng)? {
        Some(id) => store.entry(id),
        None => Ok(None),
    }
}

pub fn select_next_word_id<S, R>(store: &S, weights: &SelectionWeights, rng: &mut R) -> Result<Option<i64>>
where
    S: ProgressStore + ?Sized,
    R: Rng,
{
    let unseen = store.unseen_word_ids()?;
    if let Some(id) = unseen.choose(rng) {
        return Ok(Some(*id));
    }

    let target = choose_bucket(rng.gen::<f64>(), weights);
    let in_bucket = store.word_ids_in_bucket(target)?;
    if let Some(id) = in_bucket.choose(rng) {
        return Ok(Some(*id));
    }

    log::debug!("Bucket {} is empty, falling back to any active word", target);
    let active = store.active_word_ids()?;
    Ok(active.choose(rng).copied())
}

/// Record a swipe on `word_id` and return the undo record for it
pub fn apply_swipe<S>(store: &mut S, word_id: i64, direction: SwipeDirection) -> Result<SwipeRecord>
where
    S: ProgressStore + ?Sized,
{
    let prior_state = store.review_state(word_id)?;
    let decision = decision_for_swipe(direction);
    store.apply_review(word_id, decision.bucket, decision.removed)?;

    Ok(SwipeRecord {
        word_id,
        direction,
        prior_state,
    })
}

/// Undo one swipe. A word that was unseen before the swipe is reset
/// completely; otherwise its prior state is written back as it was.
pub fn revert_swipe<S>(store: &mut S, record: &SwipeRecord) -> Result<()>
where
    S: ProgressStore + ?Sized,
{
    match &record.prior_state {
        Some(state) => store.restore_review_state(state),
        None => store.reset_review_state(record.word_id),
    }
}
