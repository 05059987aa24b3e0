//! Card session: the current/next card pair, swipes and undo
//!
//! ```text
//! Loading --load()--> Ready(current, next)
//! Ready --begin_swipe()--> Committing --complete_swipe()--> Ready(next, fresh)
//!                                     --cancel_swipe()----> Ready (unchanged)
//! Ready --undo()--> Ready(swiped word, previous current)
//! ```
//!
//! Swipes and undos that arrive while a swipe is committing are dropped.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::algorithm::{apply_swipe, revert_swipe, select_next_word, ProgressStore, SelectionWeights};
use super::models::{BucketCounts, SwipeDirection, SwipeRecord, VocabularyEntry};
use super::storage::{WordStore, WordStoreError};

/// Default undo depth
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to load vocabulary: {0}")]
    Initialization(WordStoreError),

    #[error("Store error: {0}")]
    Store(#[from] WordStoreError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
    Committing(SwipeDirection),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwipeOutcome {
    /// The swipe was recorded and the deck advanced
    Committed(SwipeRecord),
    /// Not in `Ready`, or there is no card; nothing happened
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// The word was reverted and is the current card again
    Restored(SwipeRecord),
    /// History is empty
    NothingToUndo,
    /// A swipe is committing or the session is not loaded
    Ignored,
}

/// Tunables of a session
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub weights: SelectionWeights,
    pub history_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            weights: SelectionWeights::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Drives one review session over a word store
pub struct CardSession<S = WordStore, R = StdRng> {
    store: S,
    rng: R,
    options: SessionOptions,
    phase: SessionPhase,
    current: Option<VocabularyEntry>,
    next: Option<VocabularyEntry>,
    /// Most recent first
    history: VecDeque<SwipeRecord>,
    counts: BucketCounts,
}

impl<S: ProgressStore> CardSession<S, StdRng> {
    pub fn new(store: S, options: SessionOptions) -> Self {
        Self::with_rng(store, options, StdRng::from_entropy())
    }
}

impl<S: ProgressStore, R: Rng> CardSession<S, R> {
    pub fn with_rng(store: S, options: SessionOptions, rng: R) -> Self {
        Self {
            store,
            rng,
            options,
            phase: SessionPhase::Loading,
            current: None,
            next: None,
            history: VecDeque::with_capacity(options.history_limit),
            counts: BucketCounts::default(),
        }
    }

    /// Initialize the store and draw the first two cards.
    /// A failure here is fatal for the session.
    pub fn load(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Loading {
            return Ok(());
        }

        self.store.init().map_err(|e| {
            log::error!("Word store initialization failed: {}", e);
            SessionError::Initialization(e)
        })?;

        let counts = self.store.counts().map_err(SessionError::Initialization)?;
        let current = self.draw().map_err(SessionError::Initialization)?;
        let next = self.draw().map_err(SessionError::Initialization)?;

        self.counts = counts;
        self.current = current;
        self.next = next;
        self.phase = SessionPhase::Ready;
        log::info!(
            "Session ready: {} words, {} reviewed",
            counts.total_words,
            counts.total_reviewed
        );
        Ok(())
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&VocabularyEntry> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&VocabularyEntry> {
        self.next.as_ref()
    }

    /// Counts as of the last write that reached the store
    pub fn counts(&self) -> BucketCounts {
        self.counts
    }

    /// Undo history, most recent first
    pub fn history(&self) -> impl Iterator<Item = &SwipeRecord> {
        self.history.iter()
    }

    pub fn can_undo(&self) -> bool {
        self.phase == SessionPhase::Ready && !self.history.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Accept a classified swipe of the current card. The write happens in
    /// `complete_swipe`, after the presentation layer has animated the card
    /// away.
    pub fn begin_swipe(&mut self, direction: SwipeDirection) -> bool {
        if self.phase != SessionPhase::Ready || self.current.is_none() {
            log::debug!("Dropping {:?} swipe in phase {:?}", direction, self.phase);
            return false;
        }
        self.phase = SessionPhase::Committing(direction);
        true
    }

    /// Abandon an accepted swipe without writing anything
    pub fn cancel_swipe(&mut self) {
        if let SessionPhase::Committing(_) = self.phase {
            self.phase = SessionPhase::Ready;
        }
    }

    /// Write the pending swipe and advance: `next` becomes `current` and a
    /// freshly drawn word becomes `next`.
    ///
    /// On a store failure the session returns to `Ready` with its previous
    /// cards, history and counts.
    pub fn complete_swipe(&mut self) -> Result<SwipeOutcome> {
        let SessionPhase::Committing(direction) = self.phase else {
            return Ok(SwipeOutcome::Ignored);
        };
        let Some(word_id) = self.current.as_ref().map(|w| w.id) else {
            self.phase = SessionPhase::Ready;
            return Ok(SwipeOutcome::Ignored);
        };

        let result = self.commit(word_id, direction);
        self.phase = SessionPhase::Ready;

        match result {
            Ok((record, counts, fresh)) => {
                self.history.push_front(record.clone());
                self.history.truncate(self.options.history_limit);
                self.counts = counts;
                self.current = self.next.take();
                self.next = fresh;
                Ok(SwipeOutcome::Committed(record))
            }
            Err(e) => {
                log::error!("Failed to record {:?} swipe of word {}: {}", direction, word_id, e);
                Err(e.into())
            }
        }
    }

    fn commit(
        &mut self,
        word_id: i64,
        direction: SwipeDirection,
    ) -> std::result::Result<(SwipeRecord, BucketCounts, Option<VocabularyEntry>), WordStoreError> {
        let record = apply_swipe(&mut self.store, word_id, direction)?;
        let after_write = self
            .store
            .counts()
            .and_then(|counts| self.draw().map(|fresh| (counts, fresh)));

        match after_write {
            Ok((counts, fresh)) => Ok((record, counts, fresh)),
            Err(e) => {
                // Keep the store in step with the unchanged session
                if let Err(revert) = revert_swipe(&mut self.store, &record) {
                    log::error!("Could not roll back swipe of word {}: {}", word_id, revert);
                }
                Err(e)
            }
        }
    }

    /// `begin_swipe` and `complete_swipe` in one step
    pub fn swipe(&mut self, direction: SwipeDirection) -> Result<SwipeOutcome> {
        if !self.begin_swipe(direction) {
            return Ok(SwipeOutcome::Ignored);
        }
        self.complete_swipe()
    }

    /// Revert the most recent swipe and show that word again. The card that
    /// was current moves back into the `next` slot.
    pub fn undo(&mut self) -> Result<UndoOutcome> {
        if self.phase != SessionPhase::Ready {
            return Ok(UndoOutcome::Ignored);
        }
        let Some(record) = self.history.pop_front() else {
            return Ok(UndoOutcome::NothingToUndo);
        };

        match self.revert(&record) {
            Ok((restored, counts)) => {
                self.counts = counts;
                self.next = self.current.take();
                self.current = restored;
                Ok(UndoOutcome::Restored(record))
            }
            Err(e) => {
                log::error!("Failed to undo swipe of word {}: {}", record.word_id, e);
                self.history.push_front(record);
                Err(e.into())
            }
        }
    }

    fn revert(
        &mut self,
        record: &SwipeRecord,
    ) -> std::result::Result<(Option<VocabularyEntry>, BucketCounts), WordStoreError> {
        let swiped = self.store.review_state(record.word_id)?;
        revert_swipe(&mut self.store, record)?;
        let after_revert = self
            .store
            .entry(record.word_id)
            .and_then(|restored| self.store.counts().map(|counts| (restored, counts)));

        if after_revert.is_err() {
            // The record goes back on the history, so the store must hold the swipe again
            let reapplied = match &swiped {
                Some(state) => self.store.restore_review_state(state),
                None => self.store.reset_review_state(record.word_id),
            };
            if let Err(e) = reapplied {
                log::error!("Could not re-apply swipe of word {}: {}", record.word_id, e);
            }
        }
        after_revert
    }

    /// Re-read the current card, e.g. after it was edited
    pub fn refresh_current(&mut self) -> Result<()> {
        if let Some(id) = self.current.as_ref().map(|w| w.id) {
            self.current = self.store.entry(id)?;
        }
        Ok(())
    }

    fn draw(&mut self) -> std::result::Result<Option<VocabularyEntry>, WordStoreError> {
        select_next_word(&self.store, &self.options.weights, &mut self.rng)
    }
}
