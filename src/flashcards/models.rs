//! Data models for the flashcard system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settings::LearningDirection;

/// A learnable front/back pair with its review history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    /// When the card was last presented; absent until the first response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_shown: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_correct: Option<DateTime<Utc>>,
    /// Outcome of the most recent response, `None` before the first one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remembered: Option<bool>,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub wrong_count: u32,
    /// Files written without a creation time sort as the oldest cards
    #[serde(default = "unknown_created_at")]
    pub created_at: DateTime<Utc>,
}

fn unknown_created_at() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Card {
    pub fn new(front: String, back: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            front,
            back,
            last_shown: None,
            last_correct: None,
            remembered: None,
            correct_count: 0,
            wrong_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Copy of the card with its review history cleared
    pub fn reset_stats(&self) -> Self {
        Self {
            last_shown: None,
            last_correct: None,
            remembered: None,
            correct_count: 0,
            wrong_count: 0,
            ..self.clone()
        }
    }

    /// A card that has never been presented
    pub fn is_new(&self) -> bool {
        self.last_shown.is_none()
    }

    /// Total number of graded responses
    pub fn attempts(&self) -> u32 {
        self.correct_count.saturating_add(self.wrong_count)
    }

    /// Fraction of correct responses, `None` when never graded
    pub fn accuracy(&self) -> Option<f64> {
        match self.attempts() {
            0 => None,
            total => Some(self.correct_count as f64 / total as f64),
        }
    }

    /// Returns `(prompt, answer)` for the given learning direction
    pub fn sides(&self, direction: LearningDirection) -> (&str, &str) {
        match direction {
            LearningDirection::FrontToBack => (&self.front, &self.back),
            LearningDirection::BackToFront => (&self.back, &self.front),
        }
    }
}

/// Running tally for the current review session. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub correct: u32,
    pub wrong: u32,
}

impl SessionStats {
    pub fn record(&mut self, remembered: bool) {
        if remembered {
            self.correct += 1;
        } else {
            self.wrong += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }
}

/// Summary of a whole deck
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub remembered_cards: usize,
    pub struggling_cards: usize,
    pub total_correct: u64,
    pub total_wrong: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl DeckStats {
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut stats = Self {
            total_cards: cards.len(),
            ..Self::default()
        };

        for card in cards {
            if card.is_new() {
                stats.new_cards += 1;
            }
            match card.remembered {
                Some(true) => stats.remembered_cards += 1,
                Some(false) => stats.struggling_cards += 1,
                None => {}
            }
            stats.total_correct += u64::from(card.correct_count);
            stats.total_wrong += u64::from(card.wrong_count);
        }

        let attempts = stats.total_correct + stats.total_wrong;
        if attempts > 0 {
            stats.accuracy = Some(stats.total_correct as f64 / attempts as f64);
        }

        stats
    }
}

/// A card paired with its current selection weight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedCard {
    pub card: Card,
    pub weight: f64,
}
