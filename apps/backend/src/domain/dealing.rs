//! Deck construction, shuffling and dealing.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::rules::DECK_SIZE;
use crate::domain::{Card, Color};
use crate::errors::domain::{DomainError, ValidationKind};

/// RNG used for every shuffle in the engine.
pub type ShuffleRng = ChaCha8Rng;

/// Seeded RNG when a seed is configured, OS-seeded otherwise.
pub fn shuffle_rng(seed: Option<u64>) -> ShuffleRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    }
}

/// The 108-card deck in a fixed order: per color one 0, two of each 1-9,
/// two skips, two reverses, two draw-twos; then four wilds and four
/// wild draw fours.
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for color in Color::ALL {
        deck.push(Card::Number(color, 0));
        for n in 1..=9 {
            deck.push(Card::Number(color, n));
            deck.push(Card::Number(color, n));
        }
        for _ in 0..2 {
            deck.push(Card::Skip(color));
            deck.push(Card::Reverse(color));
            deck.push(Card::DrawTwo(color));
        }
    }
    for _ in 0..4 {
        deck.push(Card::Wild);
        deck.push(Card::WildDrawFour);
    }
    deck
}

/// Fisher-Yates shuffle.
pub fn shuffle<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) {
    for i in (1..cards.len()).rev() {
        let j = rng.random_range(0..=i);
        cards.swap(i, j);
    }
}

/// Deal `hand_size` cards to each of `player_count` players, one card at a
/// time round-robin from the head of `deck`. Dealt cards are removed from
/// the deck; the rest stays in order.
pub fn deal_hands(
    deck: &mut Vec<Card>,
    player_count: usize,
    hand_size: usize,
) -> Result<Vec<Vec<Card>>, DomainError> {
    if player_count == 0 {
        return Err(DomainError::validation(
            ValidationKind::NotEnoughPlayers,
            "Cannot deal to zero players",
        ));
    }

    let needed = player_count * hand_size;
    // One card has to remain to open the discard pile.
    if needed >= deck.len() {
        return Err(DomainError::validation(
            ValidationKind::Other("TOO_MANY_PLAYERS".into()),
            format!(
                "{player_count} players need {needed} cards but the deck holds {}",
                deck.len()
            ),
        ));
    }

    let mut hands = vec![Vec::with_capacity(hand_size); player_count];
    for (i, card) in deck.drain(..needed).enumerate() {
        hands[i % player_count].push(card);
    }
    Ok(hands)
}
