//! Play legality.
//!
//! Precedence: wild draw four, plain wild, the draw-two stacking exception,
//! then ordinary color / action / number matching.

use crate::domain::state::PendingDraw;
use crate::domain::{Card, Color};

/// Whether `card` may be played onto `top` while `active_color` is in force
/// and `pending` is owed.
///
/// `hand` is the player's full hand including `card`. Pass `None` for
/// automated plays; that waives the wild-draw-four bluff restriction.
pub fn is_legal(
    card: Card,
    top: Card,
    active_color: Color,
    pending: PendingDraw,
    hand: Option<&[Card]>,
) -> bool {
    match card {
        Card::WildDrawFour => {
            let bluffing = hand
                .map(|h| h.iter().any(|c| c.color() == Some(active_color)))
                .unwrap_or(false);
            // Never onto a draw-two chain; an open wild-draw-four chain accepts it.
            !bluffing && matches!(pending, PendingDraw::None | PendingDraw::WildDrawFour(_))
        }
        Card::Wild => !matches!(pending, PendingDraw::WildDrawFour(_)),
        _ => match pending {
            PendingDraw::WildDrawFour(_) => false,
            PendingDraw::DrawTwo(_) if card == Card::DrawTwo(active_color) => true,
            _ => matches_top(card, top, active_color),
        },
    }
}

fn matches_top(card: Card, top: Card, active_color: Color) -> bool {
    if card.color() == Some(active_color) {
        return true;
    }
    // A wild on top only accepts the color chosen for it.
    if top.is_wild() {
        return false;
    }
    match (card, top) {
        (Card::Number(_, a), Card::Number(_, b)) => a == b,
        _ => card.kind() == top.kind(),
    }
}

/// Cards in `hand` that could legally be played right now, in hand order.
pub fn legal_cards(
    hand: &[Card],
    top: Card,
    active_color: Color,
    pending: PendingDraw,
) -> Vec<Card> {
    hand.iter()
        .copied()
        .filter(|&c| is_legal(c, top, active_color, pending, Some(hand)))
        .collect()
}
