// Property-based tests for play legality and play resolution.

use proptest::prelude::*;
use time::OffsetDateTime;

use crate::domain::{
    is_legal, legal_cards, resolve_play, test_gens, test_prelude, Card, GameState, PendingDraw,
    TurnOrder,
};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: legal plays are drawn from the hand, in hand order.
    #[test]
    fn prop_legal_cards_subset_of_hand(
        hand in test_gens::hand(12),
        top in test_gens::card(),
        active in test_gens::color(),
        pending in test_gens::pending(),
    ) {
        let legal = legal_cards(&hand, top, active, pending);
        let mut rest = hand.iter();
        for card in &legal {
            prop_assert!(rest.any(|c| c == card), "{:?} not in hand order", card);
        }
    }

    /// Property: an open wild-draw-four chain only accepts wild draw fours.
    #[test]
    fn prop_four_chain_only_accepts_wild_draw_four(
        hand in test_gens::hand(12),
        active in test_gens::color(),
        k in 1u32..=3,
    ) {
        let legal = legal_cards(&hand, Card::WildDrawFour, active, PendingDraw::WildDrawFour(4 * k));
        prop_assert!(legal.iter().all(|c| *c == Card::WildDrawFour));
    }

    /// Property: holding the active color forbids wild draw four.
    #[test]
    fn prop_wild_draw_four_bluff_is_illegal(
        mut hand in test_gens::hand(10),
        active in test_gens::color(),
        n in 0u8..=9,
        top in test_gens::card(),
    ) {
        hand.push(Card::Number(active, n));
        hand.push(Card::WildDrawFour);
        prop_assert!(!is_legal(Card::WildDrawFour, top, active, PendingDraw::None, Some(&hand)));
    }

    /// Property: with nothing pending, a non-wild card of the active color
    /// is always playable.
    #[test]
    fn prop_active_color_always_playable(
        card in test_gens::card(),
        top in test_gens::card(),
    ) {
        if let Some(color) = card.color() {
            prop_assert!(is_legal(card, top, color, PendingDraw::None, None));
        }
    }

    /// Property: resolving a play moves exactly one card onto the discard
    /// pile, bumps the version once and hands the turn to a seated player.
    #[test]
    fn prop_resolve_play_shape(
        card in test_gens::card(),
        chosen in test_gens::color(),
        pending in test_gens::pending(),
        players in 2usize..=6,
        actor in 0usize..6,
    ) {
        let ids: Vec<String> = (0..players).map(|i| format!("p{i}")).collect();
        let order = TurnOrder::from_ids(ids.clone());
        let actor = &ids[actor % players];

        let mut state = GameState::empty(OffsetDateTime::UNIX_EPOCH);
        state.discard_pile.push(Card::Number(chosen, 0));
        state.active_color = Some(chosen);
        state.pending = pending;
        state.current_turn = Some(actor.clone());

        let after = resolve_play(&state, card, Some(chosen), actor, &order, OffsetDateTime::UNIX_EPOCH);
        prop_assert_eq!(after.discard_pile.len(), state.discard_pile.len() + 1);
        prop_assert_eq!(after.top_card(), Some(card));
        prop_assert_eq!(after.state_version, state.state_version + 1);
        prop_assert!(after.current_turn.as_ref().is_some_and(|id| ids.contains(id)));
        match card {
            Card::DrawTwo(_) | Card::WildDrawFour => prop_assert!(after.pending.is_pending()),
            _ => prop_assert_eq!(after.pending, PendingDraw::None),
        }
    }
}
