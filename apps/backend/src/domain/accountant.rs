//! Draw-pile bookkeeping: forced and voluntary draws, reshuffles, discard
//! recycling and the UNO-call penalty.
//!
//! Everything here only moves cards between piles and hands, so the total
//! card count is preserved by every function.

use rand::Rng;
use time::{Duration, OffsetDateTime};

use crate::domain::dealing::shuffle;
use crate::domain::rules::UNO_PENALTY_CARDS;
use crate::domain::state::{GameState, PendingDraw, PlayerId};
use crate::domain::turn_order::TurnOrder;
use crate::domain::Card;
use crate::errors::domain::{DomainError, ValidationKind};

/// Cards a draw action takes: the pending penalty, or one.
pub fn draw_count(pending: PendingDraw) -> usize {
    match pending.amount() {
        0 => 1,
        n => n as usize,
    }
}

/// Cards that could still be drawn, counting a reshuffle of the discard.
pub fn drawable(state: &GameState) -> usize {
    state.draw_pile.len() + state.discard_pile.len().saturating_sub(1)
}

/// Top up the draw pile when it holds fewer than `needed` cards by shuffling
/// the discard pile (minus its top) underneath what is left.
///
/// Returns whether a reshuffle happened.
pub fn replenish<R: Rng + ?Sized>(state: &mut GameState, needed: usize, rng: &mut R) -> bool {
    if state.draw_pile.len() >= needed || state.discard_pile.len() <= 1 {
        return false;
    }
    let Some(top) = state.discard_pile.pop() else {
        return false;
    };
    let mut recycled = std::mem::replace(&mut state.discard_pile, vec![top]);
    shuffle(&mut recycled, rng);
    state.draw_pile.extend(recycled);
    true
}

/// Remove up to `count` cards from the head of the draw pile, reshuffling
/// first if it runs short. Fewer cards come back only when every other card
/// is in someone's hand.
pub fn take_cards<R: Rng + ?Sized>(state: &mut GameState, count: usize, rng: &mut R) -> Vec<Card> {
    replenish(state, count, rng);
    let n = count.min(state.draw_pile.len());
    state.draw_pile.drain(..n).collect()
}

/// Resolve a draw by `actor`: take the owed cards into `hand`, clear the
/// penalty and the actor's UNO flag, and pass the turn.
pub fn resolve_draw<R: Rng + ?Sized>(
    state: &mut GameState,
    hand: &mut Vec<Card>,
    actor: &str,
    order: &TurnOrder,
    rng: &mut R,
    now: OffsetDateTime,
) -> Result<Vec<Card>, DomainError> {
    if drawable(state) == 0 {
        return Err(DomainError::validation(
            ValidationKind::NoCardsToDraw,
            "No cards left to draw; pass instead",
        ));
    }

    let drawn = take_cards(state, draw_count(state.pending), rng);
    hand.extend_from_slice(&drawn);

    state.pending = PendingDraw::None;
    state.uno_called.insert(actor.to_string(), false);
    state.uno_deadlines.remove(actor);
    state.current_turn = order.next(actor, state.direction).cloned();
    state.bump(now);
    Ok(drawn)
}

/// Shuffle everything beneath the top card back into the draw pile once
/// more than `threshold` cards sit below it. Returns how many moved.
pub fn recycle_discard<R: Rng + ?Sized>(
    state: &mut GameState,
    threshold: usize,
    rng: &mut R,
) -> usize {
    let below_top = state.discard_pile.len().saturating_sub(1);
    if below_top <= threshold {
        return 0;
    }
    let Some(top) = state.discard_pile.pop() else {
        return 0;
    };
    let recycled = std::mem::replace(&mut state.discard_pile, vec![top]);
    state.draw_pile.extend(recycled);
    shuffle(&mut state.draw_pile, rng);
    below_top
}

/// Declare UNO for `actor` holding `hand_len` cards.
pub fn call_uno(
    state: &mut GameState,
    actor: &str,
    hand_len: usize,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    if hand_len != 1 {
        return Err(DomainError::validation(
            ValidationKind::InvalidUnoCall,
            format!("UNO can only be called with exactly one card (holding {hand_len})"),
        ));
    }
    if state.has_called_uno(actor) {
        return Err(DomainError::validation(
            ValidationKind::UnoAlreadyCalled,
            "UNO already called",
        ));
    }
    state.uno_called.insert(actor.to_string(), true);
    state.uno_deadlines.remove(actor);
    state.bump(now);
    Ok(())
}

/// After `actor` plays: open a grace window if they are down to one card,
/// otherwise clear any stale UNO bookkeeping.
pub fn track_uno_window(
    state: &mut GameState,
    actor: &str,
    hand_len: usize,
    grace: Duration,
    now: OffsetDateTime,
) {
    state.uno_called.insert(actor.to_string(), false);
    if hand_len == 1 {
        state.uno_deadlines.insert(actor.to_string(), now + grace);
    } else {
        state.uno_deadlines.remove(actor);
    }
}

/// Whether `player_id` owes the UNO penalty at `now`.
pub fn uno_penalty_due(
    state: &GameState,
    player_id: &str,
    hand_len: usize,
    now: OffsetDateTime,
) -> bool {
    hand_len == 1
        && !state.has_called_uno(player_id)
        && state
            .uno_deadlines
            .get(player_id)
            .is_some_and(|deadline| *deadline <= now)
}

/// Players whose grace window has closed at `now`.
pub fn overdue_uno_players(state: &GameState, now: OffsetDateTime) -> Vec<PlayerId> {
    state
        .uno_deadlines
        .iter()
        .filter(|(_, deadline)| **deadline <= now)
        .map(|(id, _)| id.clone())
        .collect()
}

/// Draw the UNO penalty into `hand`. The caller checks [`uno_penalty_due`].
pub fn apply_uno_penalty<R: Rng + ?Sized>(
    state: &mut GameState,
    hand: &mut Vec<Card>,
    player_id: &str,
    rng: &mut R,
) -> Vec<Card> {
    let drawn = take_cards(state, UNO_PENALTY_CARDS, rng);
    hand.extend_from_slice(&drawn);
    state.uno_deadlines.remove(player_id);
    state.uno_called.insert(player_id.to_string(), false);
    drawn
}
