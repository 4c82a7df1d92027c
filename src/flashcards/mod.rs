//! Flashcard review for phrasedeck
//!
//! This module provides:
//! - Card model and deck statistics
//! - Weighted next-card selection and response recording
//! - JSON file card storage
//! - Review session driver

pub mod algorithm;
pub mod models;
pub mod session;
pub mod storage;

pub use algorithm::{CardScheduler, RandomSource, SelectionStrategy};
pub use models::*;
pub use session::{ReviewSession, SessionError};
pub use storage::{CardRepository, FlashcardStorage, FlashcardStorageError, MemoryCardStore};
