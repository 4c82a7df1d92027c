pub mod flashcards;
pub mod settings;

pub use settings::{LearningDirection, Settings};
