//! German vocabulary deck
//!
//! This module provides:
//! - The SQLite word store (entries, review progress, overrides, notes)
//! - The word selection and undo policy
//! - The card session controller driven by swipes
//! - Swipe gesture classification

pub mod algorithm;
pub mod gesture;
pub mod models;
pub mod seed;
pub mod session;
pub mod storage;

pub use algorithm::{ProgressStore, SelectionWeights};
pub use gesture::{classify_gesture, DragGesture, GestureThresholds};
pub use models::*;
pub use seed::SeedSource;
pub use session::{CardSession, SessionError, SessionOptions, SessionPhase, SwipeOutcome, UndoOutcome};
pub use storage::{WordStore, WordStoreError};
