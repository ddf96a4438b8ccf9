// Property tests driving whole games with random action sequences.

use proptest::prelude::*;
use time::{Duration, OffsetDateTime};

use crate::domain::rules::DECK_SIZE;
use crate::domain::test_gens::{self, SimAction};
use crate::domain::{
    legal_cards, shuffle_rng, test_prelude, Color, Room, RoomStatus, RuleSettings, ShuffleRng,
};

fn lobby(players: usize, now: OffsetDateTime) -> Room {
    let mut room = Room::new("PROP".into(), "p0".into(), "P0".into(), now);
    for i in 1..players {
        room.join(&format!("p{i}"), &format!("P{i}"), false, now).unwrap();
    }
    room
}

/// Attempt one simulated action on a copy, keeping it only on success the
/// way the services do. Returns whether the room changed.
fn step(room: &mut Room, action: SimAction, rng: &mut ShuffleRng, now: &mut OffsetDateTime) -> bool {
    let mut next = room.clone();
    let changed = apply(&mut next, action, rng, now);
    if changed {
        *room = next;
    }
    changed
}

fn apply(room: &mut Room, action: SimAction, rng: &mut ShuffleRng, now: &mut OffsetDateTime) -> bool {
    let settings = RuleSettings::default();
    let Some(actor) = room.game.current_turn.clone() else {
        return false;
    };
    match action {
        SimAction::Play(n) => {
            let Some(player) = room.player(&actor) else {
                return false;
            };
            let (Some(top), Some(active)) = (room.game.top_card(), room.game.active_color) else {
                return false;
            };
            let legal = legal_cards(&player.hand, top, active, room.game.pending);
            if legal.is_empty() {
                return false;
            }
            let card = legal[n as usize % legal.len()];
            let color = Color::ALL[n as usize % 4];
            room.play_card(&actor, card, Some(color), &settings, rng, *now).is_ok()
        }
        SimAction::Draw => room.draw(&actor, rng, *now).is_ok(),
        SimAction::Pass => room.pass_turn(&actor, rng, *now).is_ok(),
        SimAction::CallUno(n) => {
            let id = room.players[n as usize % room.players.len()].id.clone();
            room.call_uno(&id, *now).is_ok()
        }
        SimAction::Wait(secs) => {
            *now += Duration::seconds(secs as i64);
            let Some(id) = room.game.uno_deadlines.keys().next().cloned() else {
                return false;
            };
            matches!(room.enforce_uno_penalty(&id, rng, *now), Ok(Some(_)))
        }
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: no card is created or destroyed, the version moves exactly
    /// once per accepted action, and an unfinished game always has someone
    /// on turn.
    #[test]
    fn prop_cards_conserved_across_random_games(
        seed in any::<u64>(),
        players in 2usize..=6,
        actions in prop::collection::vec(test_gens::sim_action(), 0..300),
    ) {
        let mut now = OffsetDateTime::UNIX_EPOCH;
        let mut rng = shuffle_rng(Some(seed));
        let mut room = lobby(players, now);
        room.start_game("p0", &mut rng, now).unwrap();
        prop_assert_eq!(room.card_total(), DECK_SIZE);

        for action in actions {
            let before = room.version();
            let changed = step(&mut room, action, &mut rng, &mut now);

            prop_assert_eq!(room.card_total(), DECK_SIZE);
            if changed {
                prop_assert_eq!(room.version(), before + 1);
            } else {
                prop_assert_eq!(room.version(), before);
            }
            prop_assert!(!room.game.discard_pile.is_empty());
            prop_assert_eq!(
                room.game.current_turn.is_some(),
                room.status != RoomStatus::Finished
            );
            if room.status == RoomStatus::Finished {
                break;
            }
        }
    }

    /// Property: the same seed always deals the same game.
    #[test]
    fn prop_seeded_start_is_deterministic(seed in any::<u64>(), players in 2usize..=8) {
        let now = OffsetDateTime::UNIX_EPOCH;
        let mut a = lobby(players, now);
        let mut b = lobby(players, now);
        a.start_game("p0", &mut shuffle_rng(Some(seed)), now).unwrap();
        b.start_game("p0", &mut shuffle_rng(Some(seed)), now).unwrap();
        prop_assert_eq!(a, b);
    }
}
