//! Swipeable German vocabulary flashcards.
//!
//! The [`vocabulary`] module holds the word store, the selection policy and
//! the card session; [`settings`] holds the tunables shared by front ends.

pub mod settings;
pub mod vocabulary;

pub use settings::DeckSettings;
pub use vocabulary::{CardSession, WordStore};
