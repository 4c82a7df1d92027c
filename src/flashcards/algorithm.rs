//! Next-card selection
//!
//! Every card in the deck gets a weight built from three signals:
//! - novelty: cards never shown get a large bonus
//! - recency: `20 * ln(1 + days since last shown)`
//! - error rate: `30 * (1 - accuracy)`, plus a bonus when the last answer was a miss
//!
//! Repeated correct answers damp the weight, and a card shown within the
//! last two minutes is clamped to the floor weight. The next card is then
//! drawn at random proportionally to its weight, or the heaviest card is
//! taken outright when the arg-max strategy is configured.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{Card, WeightedCard};

/// Floor weight; every eligible card keeps at least this much mass
pub const MIN_WEIGHT: f64 = 0.1;

/// Elapsed days assumed for a card that was never shown
const NEVER_SHOWN_DAYS: f64 = 999.0;

const BASE_WEIGHT: f64 = 1.0;
const NEW_CARD_BONUS: f64 = 100.0;
const RECENCY_FACTOR: f64 = 20.0;
const ERROR_RATE_FACTOR: f64 = 30.0;
/// Shown at least once but never graded
const UNGRADED_BONUS: f64 = 15.0;
const MASTERY_DAMPING: f64 = 0.3;
const MISSED_BONUS: f64 = 20.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Cards shown more recently than this are clamped to [`MIN_WEIGHT`]
pub fn cooldown() -> Duration {
    Duration::minutes(2)
}

/// How the next card is picked from the weighted deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    /// Draw a card at random, proportionally to its weight
    #[default]
    Weighted,
    /// Always take the heaviest card (first one wins ties)
    Highest,
}

/// Source of uniform random numbers for weighted selection
pub trait RandomSource {
    /// Uniform draw from `[0, upper)`. Only called with a positive `upper`.
    fn draw(&mut self, upper: f64) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn draw(&mut self, upper: f64) -> f64 {
        self.gen_range(0.0..upper)
    }
}

/// Fractional days since the card was last shown, clamped at zero.
/// Never-shown cards report [`NEVER_SHOWN_DAYS`].
pub fn days_since_shown(card: &Card, now: DateTime<Utc>) -> f64 {
    match card.last_shown {
        Some(last_shown) => {
            let elapsed = (now - last_shown).num_milliseconds() as f64 / MILLIS_PER_DAY;
            elapsed.max(0.0)
        }
        None => NEVER_SHOWN_DAYS,
    }
}

/// Selection weight of a single card. The excluded card gets zero.
pub fn card_weight(card: &Card, exclude_id: Option<Uuid>, now: DateTime<Utc>) -> f64 {
    if exclude_id == Some(card.id) {
        return 0.0;
    }

    let is_new = card.is_new();
    let days_since = days_since_shown(card, now);

    let mut weight = BASE_WEIGHT;

    if is_new {
        weight += NEW_CARD_BONUS;
    }

    weight += RECENCY_FACTOR * days_since.ln_1p();

    match card.accuracy() {
        Some(accuracy) => weight += ERROR_RATE_FACTOR * (1.0 - accuracy),
        None if !is_new => weight += UNGRADED_BONUS,
        None => {}
    }

    if card.correct_count > 0 {
        weight *= 1.0 / (1.0 + f64::from(card.correct_count).sqrt() * MASTERY_DAMPING);
    }

    if card.remembered == Some(false) {
        weight += MISSED_BONUS;
    }

    let cooldown_days = cooldown().num_milliseconds() as f64 / MILLIS_PER_DAY;
    if days_since < cooldown_days {
        weight = MIN_WEIGHT;
    }

    weight.max(MIN_WEIGHT)
}

/// Weights for every card, in input order
pub fn compute_weights(cards: &[Card], exclude_id: Option<Uuid>, now: DateTime<Utc>) -> Vec<f64> {
    cards
        .iter()
        .map(|card| card_weight(card, exclude_id, now))
        .collect()
}

/// Pick the next card to present.
///
/// Returns `None` only for an empty deck. `exclude_id` is a soft
/// preference: when it names the only card, that card is still returned.
pub fn select_next<'a, R: RandomSource + ?Sized>(
    cards: &'a [Card],
    exclude_id: Option<Uuid>,
    now: DateTime<Utc>,
    strategy: SelectionStrategy,
    rng: &mut R,
) -> Option<&'a Card> {
    let weights = compute_weights(cards, exclude_id, now);
    let index = match strategy {
        SelectionStrategy::Weighted => pick_weighted(&weights, rng),
        SelectionStrategy::Highest => pick_highest(&weights),
    }?;
    cards.get(index)
}

/// Linear-scan weighted sampling over `weights`.
///
/// Zero-weight entries are never picked unless every entry is zero.
pub fn pick_weighted<R: RandomSource + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Some(0);
    }

    let mut remaining = rng.draw(total);
    let mut last_candidate = 0;
    for (index, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        last_candidate = index;
        remaining -= weight;
        if remaining <= 0.0 {
            return Some(index);
        }
    }

    // Rounding left a sliver of mass past the last card
    Some(last_candidate)
}

/// Index of the largest weight; the earliest one wins ties
pub fn pick_highest(weights: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &weight) in weights.iter().enumerate() {
        match best {
            Some((_, best_weight)) if weight <= best_weight => {}
            _ => best = Some((index, weight)),
        }
    }
    best.map(|(index, _)| index)
}

/// Apply a learner's response to a card.
///
/// Returns the updated card and leaves the input untouched.
pub fn record_response(card: &Card, remembered: bool, now: DateTime<Utc>) -> Card {
    let mut updated = card.clone();
    updated.last_shown = Some(now);
    updated.remembered = Some(remembered);
    if remembered {
        updated.correct_count = card.correct_count.saturating_add(1);
        updated.last_correct = Some(now);
    } else {
        updated.wrong_count = card.wrong_count.saturating_add(1);
    }
    updated
}

/// Owns a selection strategy and its random source
pub struct CardScheduler<R = StdRng> {
    strategy: SelectionStrategy,
    rng: R,
}

impl CardScheduler<StdRng> {
    /// Scheduler seeded from OS entropy
    pub fn from_entropy(strategy: SelectionStrategy) -> Self {
        Self::new(strategy, StdRng::from_entropy())
    }

    /// Scheduler with reproducible draws
    pub fn seeded(strategy: SelectionStrategy, seed: u64) -> Self {
        Self::new(strategy, StdRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> CardScheduler<R> {
    pub fn new(strategy: SelectionStrategy, rng: R) -> Self {
        Self { strategy, rng }
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: SelectionStrategy) {
        self.strategy = strategy;
    }

    pub fn select_next<'a>(
        &mut self,
        cards: &'a [Card],
        exclude_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Option<&'a Card> {
        let selected = select_next(cards, exclude_id, now, self.strategy, &mut self.rng);
        if let Some(card) = selected {
            log::debug!("Selected card {} from {} candidates", card.id, cards.len());
        }
        selected
    }

    /// Cards with their current weights, heaviest first
    pub fn weights(&self, cards: &[Card], exclude_id: Option<Uuid>, now: DateTime<Utc>) -> Vec<WeightedCard> {
        let mut weighted: Vec<WeightedCard> = cards
            .iter()
            .map(|card| WeightedCard {
                card: card.clone(),
                weight: card_weight(card, exclude_id, now),
            })
            .collect();
        weighted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        weighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always draws the same value
    struct FixedDraw(f64);

    impl RandomSource for FixedDraw {
        fn draw(&mut self, _upper: f64) -> f64 {
            self.0
        }
    }

    /// Draws a fixed distance below the upper bound
    struct JustBelowTop(f64);

    impl RandomSource for JustBelowTop {
        fn draw(&mut self, upper: f64) -> f64 {
            upper - self.0
        }
    }

    fn now() -> DateTime<Utc> {
        "2026-03-01T12:00:00Z".parse().unwrap()
    }

    fn card(front: &str) -> Card {
        Card::new(front.to_string(), format!("{}-back", front))
    }

    fn shown_card(front: &str, days_ago: i64, correct: u32, wrong: u32) -> Card {
        let mut c = card(front);
        c.last_shown = Some(now() - Duration::days(days_ago));
        c.correct_count = correct;
        c.wrong_count = wrong;
        c.remembered = if correct + wrong == 0 {
            None
        } else {
            Some(wrong == 0)
        };
        c
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_new_card_weight() {
        let c = card("new");
        assert_close(card_weight(&c, None, now()), 1.0 + 100.0 + 20.0 * 1000f64.ln());
    }

    #[test]
    fn test_new_card_outweighs_recent_card() {
        let fresh = card("fresh");
        let mut seen = shown_card("seen", 1, 0, 0);
        seen.remembered = Some(true);
        assert!(card_weight(&fresh, None, now()) > card_weight(&seen, None, now()));
    }

    #[test]
    fn test_new_card_outweighs_old_card() {
        let fresh = card("fresh");
        let old = shown_card("old", 365, 0, 4);
        assert!(card_weight(&fresh, None, now()) > card_weight(&old, None, now()));
    }

    #[test]
    fn test_excluded_card_has_zero_weight() {
        let c = card("excluded");
        assert_eq!(card_weight(&c, Some(c.id), now()), 0.0);
    }

    #[test]
    fn test_shown_but_ungraded_bonus() {
        let c = shown_card("ungraded", 1, 0, 0);
        assert_close(card_weight(&c, None, now()), 1.0 + 20.0 * 2f64.ln() + 15.0);
    }

    #[test]
    fn test_mastery_damping() {
        let c = shown_card("mastered", 30, 5, 0);
        let expected = (1.0 + 20.0 * 31f64.ln()) / (1.0 + 5f64.sqrt() * 0.3);
        assert_close(card_weight(&c, None, now()), expected);
    }

    #[test]
    fn test_missed_card_bonus() {
        let c = shown_card("missed", 1, 0, 3);
        assert_close(card_weight(&c, None, now()), 1.0 + 20.0 * 2f64.ln() + 30.0 + 20.0);
    }

    #[test]
    fn test_cooldown_clamps_weight() {
        let mut c = card("just-shown");
        c.last_shown = Some(now() - Duration::seconds(90));
        c.wrong_count = 10;
        c.remembered = Some(false);
        assert_eq!(card_weight(&c, None, now()), MIN_WEIGHT);
    }

    #[test]
    fn test_cooldown_expires() {
        let mut c = card("a-while-ago");
        c.last_shown = Some(now() - Duration::minutes(3));
        c.wrong_count = 1;
        c.remembered = Some(false);
        assert!(card_weight(&c, None, now()) > MIN_WEIGHT);
    }

    #[test]
    fn test_clock_skew_clamped_to_zero() {
        let mut c = card("future");
        c.last_shown = Some(now() + Duration::days(3));
        assert_eq!(days_since_shown(&c, now()), 0.0);
        assert_eq!(card_weight(&c, None, now()), MIN_WEIGHT);
    }

    #[test]
    fn test_empty_deck_returns_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_next(&[], None, now(), SelectionStrategy::Weighted, &mut rng).is_none());
        assert!(select_next(&[], None, now(), SelectionStrategy::Highest, &mut rng).is_none());
    }

    #[test]
    fn test_draw_zero_selects_first_nonzero() {
        let cards = vec![card("a"), card("b"), card("c")];
        let picked = select_next(&cards, None, now(), SelectionStrategy::Weighted, &mut FixedDraw(0.0));
        assert_eq!(picked.map(|c| c.id), Some(cards[0].id));

        // The excluded first card is skipped
        let picked = select_next(
            &cards,
            Some(cards[0].id),
            now(),
            SelectionStrategy::Weighted,
            &mut FixedDraw(0.0),
        );
        assert_eq!(picked.map(|c| c.id), Some(cards[1].id));
    }

    #[test]
    fn test_draw_near_total_selects_last_nonzero() {
        let cards = vec![card("a"), card("b"), card("c")];
        let picked = select_next(&cards, None, now(), SelectionStrategy::Weighted, &mut JustBelowTop(1e-9));
        assert_eq!(picked.map(|c| c.id), Some(cards[2].id));

        let picked = select_next(
            &cards,
            Some(cards[2].id),
            now(),
            SelectionStrategy::Weighted,
            &mut JustBelowTop(1e-9),
        );
        assert_eq!(picked.map(|c| c.id), Some(cards[1].id));
    }

    #[test]
    fn test_draw_past_total_falls_back_to_last_candidate() {
        let cards = vec![card("a"), card("b"), card("c")];
        let picked = select_next(
            &cards,
            Some(cards[2].id),
            now(),
            SelectionStrategy::Weighted,
            &mut FixedDraw(1e12),
        );
        assert_eq!(picked.map(|c| c.id), Some(cards[1].id));
    }

    #[test]
    fn test_single_excluded_card_is_still_returned() {
        let cards = vec![card("only")];
        let mut rng = StdRng::seed_from_u64(7);
        for strategy in [SelectionStrategy::Weighted, SelectionStrategy::Highest] {
            let picked = select_next(&cards, Some(cards[0].id), now(), strategy, &mut rng);
            assert_eq!(picked.map(|c| c.id), Some(cards[0].id));
        }
    }

    #[test]
    fn test_exclude_is_respected_with_alternatives() {
        let cards = vec![card("a"), card("b")];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let picked = select_next(&cards, Some(cards[0].id), now(), SelectionStrategy::Weighted, &mut rng);
            assert_eq!(picked.map(|c| c.id), Some(cards[1].id));
        }
    }

    #[test]
    fn test_highest_picks_argmax_first_on_ties() {
        let cards = vec![shown_card("known", 1, 3, 0), card("new-1"), card("new-2")];
        let picked = select_next(&cards, None, now(), SelectionStrategy::Highest, &mut FixedDraw(0.0));
        assert_eq!(picked.map(|c| c.id), Some(cards[1].id));
    }

    #[test]
    fn test_pick_highest_empty() {
        assert_eq!(pick_highest(&[]), None);
        assert_eq!(pick_weighted(&[], &mut FixedDraw(0.0)), None);
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let cards = vec![card("a"), shown_card("b", 4, 1, 1), shown_card("c", 10, 0, 2)];
        let mut first = CardScheduler::seeded(SelectionStrategy::Weighted, 99);
        let mut second = CardScheduler::seeded(SelectionStrategy::Weighted, 99);
        for _ in 0..50 {
            let a = first.select_next(&cards, None, now()).map(|c| c.id);
            let b = second.select_next(&cards, None, now()).map(|c| c.id);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_example_deck_weights_and_distribution() {
        let a = card("A");
        let b = shown_card("B", 30, 5, 0);
        let c = shown_card("C", 1, 0, 3);
        let cards = vec![a, b, c];

        let weights = compute_weights(&cards, None, now());
        assert!((weights[0] - 239.16).abs() < 0.1, "A = {}", weights[0]);
        assert!((weights[1] - 41.70).abs() < 0.1, "B = {}", weights[1]);
        assert!((weights[2] - 64.86).abs() < 0.1, "C = {}", weights[2]);

        let share = weights[0] / weights.iter().sum::<f64>();
        assert!((share - 0.69).abs() < 0.01, "A share = {}", share);

        let mut scheduler = CardScheduler::seeded(SelectionStrategy::Weighted, 2026);
        let mut counts = [0usize; 3];
        for _ in 0..10_000 {
            let picked = scheduler.select_next(&cards, None, now()).unwrap();
            let index = cards.iter().position(|c| c.id == picked.id).unwrap();
            counts[index] += 1;
        }
        assert!(counts[0] > counts[1] && counts[0] > counts[2]);
        assert!((6_400..7_400).contains(&counts[0]), "A picked {} times", counts[0]);
    }

    #[test]
    fn test_scheduler_weights_sorted() {
        let cards = vec![shown_card("old", 30, 5, 0), card("new")];
        let scheduler = CardScheduler::seeded(SelectionStrategy::Highest, 1);
        let weighted = scheduler.weights(&cards, None, now());
        assert_eq!(weighted[0].card.front, "new");
        assert!(weighted[0].weight >= weighted[1].weight);
    }

    #[test]
    fn test_record_response_remembered() {
        let original = shown_card("x", 2, 3, 1);
        let answered = record_response(&original, true, now());

        assert_eq!(answered.correct_count, 4);
        assert_eq!(answered.wrong_count, 1);
        assert_eq!(answered.last_shown, Some(now()));
        assert_eq!(answered.last_correct, Some(now()));
        assert_eq!(answered.remembered, Some(true));
        assert_eq!(answered.id, original.id);
        assert_eq!(answered.front, original.front);
        assert_eq!(answered.back, original.back);
        assert_eq!(answered.created_at, original.created_at);

        // Input untouched
        assert_eq!(original.correct_count, 3);
    }

    #[test]
    fn test_record_response_forgotten() {
        let mut original = shown_card("x", 2, 3, 1);
        let earlier = now() - Duration::days(2);
        original.last_correct = Some(earlier);

        let answered = record_response(&original, false, now());
        assert_eq!(answered.correct_count, 3);
        assert_eq!(answered.wrong_count, 2);
        assert_eq!(answered.last_shown, Some(now()));
        assert_eq!(answered.last_correct, Some(earlier));
        assert_eq!(answered.remembered, Some(false));
    }

    #[test]
    fn test_record_response_is_pure() {
        let original = card("pure");
        let first = record_response(&original, false, now());
        let second = record_response(&original, false, now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_response_saturates() {
        let mut original = card("maxed");
        original.correct_count = u32::MAX;
        let answered = record_response(&original, true, now());
        assert_eq!(answered.correct_count, u32::MAX);
    }
}
