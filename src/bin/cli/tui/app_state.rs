use std::time::Instant;

use anyhow::{Context, Result};
use ratatui::layout::Rect;

use vokabel_lib::vocabulary::algorithm::decision_for_swipe;
use vokabel_lib::vocabulary::{
    classify_gesture, Bucket, CardSession, DragGesture, GestureThresholds, SessionPhase,
    SwipeDirection, SwipeOutcome, UndoOutcome, VocabularyEntry,
};

use crate::app::App;
use crate::render::terminal::bucket_label;

/// Terminal cells are roughly twice as tall as they are wide; these scale a
/// drag measured in cells to the point units the gesture thresholds use.
const POINTS_PER_COLUMN: f64 = 8.0;
const POINTS_PER_ROW: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Deck,
    EditNotes,
}

#[derive(Debug, Clone, Copy)]
pub struct DragState {
    start_column: u16,
    start_row: u16,
    column: u16,
    row: u16,
    started: Instant,
}

impl DragState {
    fn gesture(&self) -> DragGesture {
        let translation_x = (self.column as f64 - self.start_column as f64) * POINTS_PER_COLUMN;
        let translation_y = (self.row as f64 - self.start_row as f64) * POINTS_PER_ROW;
        let elapsed = self.started.elapsed().as_secs_f64().max(0.001);
        DragGesture {
            translation_x,
            translation_y,
            velocity_x: translation_x / elapsed,
            velocity_y: translation_y / elapsed,
        }
    }
}

pub struct TuiState {
    pub session: CardSession,
    pub thresholds: GestureThresholds,
    pub mode: Mode,
    /// Showing the English side of the current card
    pub flipped: bool,
    pub current_bucket: Option<Bucket>,
    pub drag: Option<DragState>,
    pub card_area: Option<Rect>,
    pub input_text: String,
    pub flash_message: Option<String>,
    pub show_help: bool,
    pub quit: bool,
}

impl TuiState {
    pub fn new(app: &App) -> Result<Self> {
        let mut session = app.session();
        session.load().context("Could not open the vocabulary deck")?;

        // First launch: show the controls until the user dismisses them
        let show_help = !session
            .store()
            .onboarding_completed()
            .context("Failed to read onboarding state")?;

        let mut state = Self {
            session,
            thresholds: app.settings.gesture,
            mode: Mode::Deck,
            flipped: false,
            current_bucket: None,
            drag: None,
            card_area: None,
            input_text: String::new(),
            flash_message: None,
            show_help,
            quit: false,
        };
        state.refresh_bucket();
        Ok(state)
    }

    pub fn current(&self) -> Option<&VocabularyEntry> {
        self.session.current()
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.session.phase(), SessionPhase::Committing(_))
    }

    /// Start a swipe. The write happens on the next tick, after the card has
    /// been drawn leaving the deck.
    pub fn begin_swipe(&mut self, direction: SwipeDirection) {
        if !self.session.begin_swipe(direction) && self.current().is_none() {
            self.flash_message = Some("The deck is empty".to_string());
        }
    }

    pub fn finish_swipe(&mut self) {
        let SessionPhase::Committing(direction) = self.session.phase() else {
            return;
        };

        match self.session.complete_swipe() {
            Ok(SwipeOutcome::Committed(_)) => {
                let bucket = decision_for_swipe(direction).bucket;
                self.flash_message = Some(format!("Filed as {}", bucket_label(bucket)));
                self.flipped = false;
            }
            Ok(SwipeOutcome::Ignored) => {}
            Err(e) => {
                self.flash_message = Some(format!("Could not save review: {}", e));
            }
        }
        self.refresh_bucket();
    }

    pub fn undo(&mut self) {
        match self.session.undo() {
            Ok(UndoOutcome::Restored(_)) => {
                self.flash_message = Some("Undone".to_string());
                self.flipped = false;
            }
            Ok(UndoOutcome::NothingToUndo) => {
                self.flash_message = Some("Nothing to undo".to_string());
            }
            Ok(UndoOutcome::Ignored) => {}
            Err(e) => {
                self.flash_message = Some(format!("Could not undo: {}", e));
            }
        }
        self.refresh_bucket();
    }

    pub fn toggle_flip(&mut self) {
        if self.current().is_some() {
            self.flipped = !self.flipped;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if !self.show_help {
            self.complete_onboarding();
        }
    }

    fn complete_onboarding(&mut self) {
        let store = self.session.store_mut();
        match store.onboarding_completed() {
            Ok(true) => {}
            Ok(false) => {
                if let Err(e) = store.set_onboarding_completed() {
                    log::warn!("Failed to persist onboarding flag: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to read onboarding flag: {}", e),
        }
    }

    pub fn start_notes_edit(&mut self) {
        let Some(entry) = self.current() else {
            return;
        };
        self.input_text = entry.notes.clone().unwrap_or_default();
        self.mode = Mode::EditNotes;
    }

    pub fn cancel_notes_edit(&mut self) {
        self.input_text.clear();
        self.mode = Mode::Deck;
    }

    pub fn save_notes_from_input(&mut self) {
        let Some(id) = self.current().map(|entry| entry.id) else {
            self.cancel_notes_edit();
            return;
        };

        let text = std::mem::take(&mut self.input_text);
        self.mode = Mode::Deck;

        let result = self
            .session
            .store_mut()
            .set_notes(id, &text)
            .map_err(anyhow::Error::from)
            .and_then(|_| self.session.refresh_current().map_err(anyhow::Error::from));

        match result {
            Ok(()) => {
                let message = if text.trim().is_empty() { "Notes cleared" } else { "Notes saved" };
                self.flash_message = Some(message.to_string());
            }
            Err(e) => {
                log::error!("Failed to save notes for word {}: {}", id, e);
                self.flash_message = Some(format!("Could not save notes: {}", e));
            }
        }
    }

    pub fn start_drag(&mut self, column: u16, row: u16) {
        let Some(area) = self.card_area else {
            return;
        };
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if inside && self.session.phase() == SessionPhase::Ready {
            self.drag = Some(DragState {
                start_column: column,
                start_row: row,
                column,
                row,
                started: Instant::now(),
            });
        }
    }

    pub fn update_drag(&mut self, column: u16, row: u16) {
        if let Some(drag) = self.drag.as_mut() {
            drag.column = column;
            drag.row = row;
        }
    }

    /// Direction the card would go if released now
    pub fn drag_preview(&self) -> Option<SwipeDirection> {
        self.drag
            .as_ref()
            .and_then(|drag| classify_gesture(&drag.gesture(), &self.thresholds))
    }

    pub fn end_drag(&mut self, column: u16, row: u16) {
        let Some(mut drag) = self.drag.take() else {
            return;
        };
        drag.column = column;
        drag.row = row;

        if drag.column == drag.start_column && drag.row == drag.start_row {
            // A click without movement flips the card
            self.toggle_flip();
            return;
        }

        if let Some(direction) = classify_gesture(&drag.gesture(), &self.thresholds) {
            self.begin_swipe(direction);
        }
    }

    fn refresh_bucket(&mut self) {
        let Some(id) = self.current().map(|entry| entry.id) else {
            self.current_bucket = None;
            return;
        };
        self.current_bucket = match self.session.store().get_review_state(id) {
            Ok(state) => state.map(|s| s.bucket),
            Err(e) => {
                log::warn!("Failed to read review state of word {}: {}", id, e);
                None
            }
        };
    }
}
