//! Review session: select, show, answer, persist, repeat

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::{record_response, CardScheduler, RandomSource};
use super::models::{Card, SessionStats};
use super::storage::{CardRepository, FlashcardStorageError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] FlashcardStorageError),

    #[error("No card is currently shown")]
    NoCurrentCard,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Drives one learner through one deck.
///
/// The card on screen is kept between [`ReviewSession::next_card`] and
/// [`ReviewSession::answer`]; it is not re-offered on the next draw
/// unless it is the only card in the deck.
pub struct ReviewSession<S, R> {
    store: S,
    scheduler: CardScheduler<R>,
    current: Option<Card>,
    last_shown_id: Option<Uuid>,
    stats: SessionStats,
}

impl<S: CardRepository, R: RandomSource> ReviewSession<S, R> {
    pub fn new(store: S, scheduler: CardScheduler<R>) -> Self {
        Self {
            store,
            scheduler,
            current: None,
            last_shown_id: None,
            stats: SessionStats::default(),
        }
    }

    /// Draw the next card from a fresh snapshot. `None` means the deck is empty.
    pub fn next_card(&mut self, now: DateTime<Utc>) -> Result<Option<&Card>> {
        let cards = self.store.load_all_cards()?;
        let selected = self
            .scheduler
            .select_next(&cards, self.last_shown_id, now)
            .cloned();

        if let Some(card) = &selected {
            self.last_shown_id = Some(card.id);
        } else {
            log::info!("Deck is empty, nothing to review");
        }
        self.current = selected;
        Ok(self.current.as_ref())
    }

    /// Card currently on screen
    pub fn current(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    /// Grade the current card and persist it
    pub fn answer(&mut self, remembered: bool, now: DateTime<Utc>) -> Result<Card> {
        let card = self.current.as_ref().ok_or(SessionError::NoCurrentCard)?;
        let updated = record_response(card, remembered, now);
        self.store.save_card(&updated)?;

        self.stats.record(remembered);
        self.current = None;
        log::debug!(
            "Recorded {} for card {}",
            if remembered { "hit" } else { "miss" },
            updated.id
        );
        Ok(updated)
    }

    /// Abandon the current card without touching its statistics
    pub fn skip(&mut self) -> Option<Card> {
        self.current.take()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
