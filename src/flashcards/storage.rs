//! Storage operations for flashcards
//!
//! Directory structure:
//! ```text
//! {data_dir}/deck/
//! └── cards/
//!     └── {card-id}.json   # Individual card files
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use super::models::Card;

#[derive(Error, Debug)]
pub enum FlashcardStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid card file {0:?}: {1}")]
    InvalidCard(PathBuf, #[source] serde_json::Error),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Card {0} must not be empty")]
    EmptyField(&'static str),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, FlashcardStorageError>;

/// Where the review loop gets its cards from and writes them back to
pub trait CardRepository {
    /// Current snapshot of the whole deck
    fn load_all_cards(&self) -> Result<Vec<Card>>;

    /// Persist every field of one card in a single write
    fn save_card(&self, card: &Card) -> Result<()>;
}

impl<T: CardRepository + ?Sized> CardRepository for &T {
    fn load_all_cards(&self) -> Result<Vec<Card>> {
        (**self).load_all_cards()
    }

    fn save_card(&self, card: &Card) -> Result<()> {
        (**self).save_card(card)
    }
}

/// Storage manager for flashcard operations
pub struct FlashcardStorage {
    /// Base path for app data (e.g., ~/.local/share/phrasedeck)
    base_path: PathBuf,
}

impl FlashcardStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Default data directory for the current user
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("phrasedeck"))
            .ok_or(FlashcardStorageError::DataDirNotFound)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn cards_dir(&self) -> PathBuf {
        self.base_path.join("deck").join("cards")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", card_id))
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.cards_dir())?;
        Ok(())
    }

    /// List all cards, newest first. Fails on the first unreadable card file.
    pub fn list_cards(&self) -> Result<Vec<Card>> {
        self.read_cards(false)
    }

    /// Like [`FlashcardStorage::list_cards`], but unreadable card files are
    /// logged and left out instead of failing the listing
    pub fn list_readable_cards(&self) -> Result<Vec<Card>> {
        self.read_cards(true)
    }

    fn read_cards(&self, skip_invalid: bool) -> Result<Vec<Card>> {
        let cards_dir = self.cards_dir();
        if !cards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in fs::read_dir(&cards_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                match serde_json::from_str::<Card>(&content) {
                    Ok(card) => cards.push(card),
                    Err(e) if skip_invalid => {
                        log::warn!("Skipping unreadable card file {:?}: {}", path, e)
                    }
                    Err(e) => return Err(FlashcardStorageError::InvalidCard(path, e)),
                }
            }
        }

        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(cards)
    }

    /// Get a specific card
    pub fn get_card(&self, card_id: Uuid) -> Result<Card> {
        let card_path = self.card_path(card_id);
        if !card_path.exists() {
            return Err(FlashcardStorageError::CardNotFound(card_id));
        }

        let content = fs::read_to_string(&card_path)?;
        let card: Card = serde_json::from_str(&content)?;
        Ok(card)
    }

    /// Create a new card. Both sides are trimmed and must be non-empty.
    pub fn create_card(&self, front: &str, back: &str) -> Result<Card> {
        let front = front.trim();
        let back = back.trim();
        if front.is_empty() {
            return Err(FlashcardStorageError::EmptyField("front"));
        }
        if back.is_empty() {
            return Err(FlashcardStorageError::EmptyField("back"));
        }

        self.init()?;

        let card = Card::new(front.to_string(), back.to_string());
        self.write_card(&card)?;

        log::info!("Created card {}", card.id);
        Ok(card)
    }

    /// Update a card.
    ///
    /// The existence check and the write are separate steps, so a
    /// concurrent `delete_card` in between brings the card back. Callers
    /// sharing a deck must serialize writes per card.
    pub fn update_card(&self, card: &Card) -> Result<()> {
        if !self.card_path(card.id).exists() {
            return Err(FlashcardStorageError::CardNotFound(card.id));
        }

        self.write_card(card)
    }

    /// Clear a card's review history so it is scheduled as new again
    pub fn reset_card(&self, card_id: Uuid) -> Result<Card> {
        let card = self.get_card(card_id)?.reset_stats();
        self.write_card(&card)?;
        log::info!("Reset statistics for card {}", card_id);
        Ok(card)
    }

    /// Delete a card
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        let card_path = self.card_path(card_id);
        if !card_path.exists() {
            return Err(FlashcardStorageError::CardNotFound(card_id));
        }

        fs::remove_file(&card_path)?;
        log::info!("Deleted card {}", card_id);
        Ok(())
    }

    /// Write to a sibling temp file, then rename over the card file
    fn write_card(&self, card: &Card) -> Result<()> {
        let card_path = self.card_path(card.id);
        let tmp_path = card_path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(card)?)?;
        fs::rename(&tmp_path, &card_path)?;
        Ok(())
    }
}

impl CardRepository for FlashcardStorage {
    fn load_all_cards(&self) -> Result<Vec<Card>> {
        self.list_cards()
    }

    fn save_card(&self, card: &Card) -> Result<()> {
        self.update_card(card)
    }
}

/// In-memory deck, kept in insertion order
#[derive(Debug, Default)]
pub struct MemoryCardStore {
    cards: RefCell<Vec<Card>>,
}

impl MemoryCardStore {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards: RefCell::new(cards),
        }
    }

    pub fn get_card(&self, card_id: Uuid) -> Option<Card> {
        self.cards.borrow().iter().find(|c| c.id == card_id).cloned()
    }
}

impl CardRepository for MemoryCardStore {
    fn load_all_cards(&self) -> Result<Vec<Card>> {
        Ok(self.cards.borrow().clone())
    }

    fn save_card(&self, card: &Card) -> Result<()> {
        let mut cards = self.cards.borrow_mut();
        let slot = cards
            .iter_mut()
            .find(|c| c.id == card.id)
            .ok_or(FlashcardStorageError::CardNotFound(card.id))?;
        *slot = card.clone();
        Ok(())
    }
}
