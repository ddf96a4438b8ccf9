//! Applies an accepted play to the game state.

use time::OffsetDateTime;

use crate::domain::rules::{DRAW_TWO_PENALTY, FALLBACK_WILD_COLOR, WILD_DRAW_FOUR_PENALTY};
use crate::domain::state::{unix_millis, GameState, PendingDraw};
use crate::domain::turn_order::TurnOrder;
use crate::domain::{Card, Color};

/// Pure transition for a play that already passed legality.
///
/// The caller removes `card` from the actor's hand. This puts it on the
/// discard pile, sets color/direction/penalty, picks the next player and
/// bumps the version.
pub fn resolve_play(
    state: &GameState,
    card: Card,
    chosen_color: Option<Color>,
    actor: &str,
    order: &TurnOrder,
    now: OffsetDateTime,
) -> GameState {
    let mut next = state.clone();
    next.discard_pile.push(card);

    next.active_color = Some(
        card.color()
            .unwrap_or_else(|| chosen_color.unwrap_or(FALLBACK_WILD_COLOR)),
    );

    let (direction, steps) = match card {
        Card::Skip(_) => (state.direction, 2),
        // Heads-up the reversal hands the turn straight back, same as a skip.
        Card::Reverse(_) if order.len() == 2 => (state.direction.flipped(), 2),
        Card::Reverse(_) => (state.direction.flipped(), 1),
        _ => (state.direction, 1),
    };
    next.direction = direction;

    next.pending = match (card, state.pending) {
        (Card::DrawTwo(_), PendingDraw::DrawTwo(n)) => PendingDraw::DrawTwo(n + DRAW_TWO_PENALTY),
        (Card::DrawTwo(_), _) => PendingDraw::DrawTwo(DRAW_TWO_PENALTY),
        (Card::WildDrawFour, PendingDraw::WildDrawFour(n)) => {
            PendingDraw::WildDrawFour(n + WILD_DRAW_FOUR_PENALTY)
        }
        (Card::WildDrawFour, _) => PendingDraw::WildDrawFour(WILD_DRAW_FOUR_PENALTY),
        _ => PendingDraw::None,
    };

    next.current_turn = order.advance(actor, direction, steps).cloned();

    next.last_played_card = Some(card);
    next.pending_wild_color_choice = if card.is_wild() { chosen_color } else { None };
    next.last_played_card_animation_id = Some(format!("{actor}|{card}|{}", unix_millis(now)));
    next.bump(now);
    next
}
