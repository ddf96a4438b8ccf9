//! Seat-ordered rotation of the active (non-spectator) players.

use std::collections::HashMap;

use crate::domain::room::Player;
use crate::domain::state::{Direction, PlayerId};

/// Active players in seat order with an id -> position index.
///
/// Built from the current player set on every transition; never cached
/// across joins or leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOrder {
    ids: Vec<PlayerId>,
    index: HashMap<PlayerId, usize>,
}

impl TurnOrder {
    /// Order by seat (unseated last), then host first, then name.
    pub fn from_players(players: &[Player]) -> Self {
        let mut active: Vec<&Player> = players.iter().filter(|p| !p.is_spectator).collect();
        active.sort_by(|a, b| {
            a.seat
                .unwrap_or(u32::MAX)
                .cmp(&b.seat.unwrap_or(u32::MAX))
                .then_with(|| b.is_host.cmp(&a.is_host))
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        Self::from_ids(active.into_iter().map(|p| p.id.clone()).collect())
    }

    pub fn from_ids(ids: Vec<PlayerId>) -> Self {
        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self { ids, index }
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn first(&self) -> Option<&PlayerId> {
        self.ids.first()
    }

    /// Player after `current` in `direction`. An unknown `current` yields
    /// the first seat. `None` only when nobody is seated.
    pub fn next(&self, current: &str, direction: Direction) -> Option<&PlayerId> {
        let count = self.ids.len() as i64;
        if count == 0 {
            return None;
        }
        let Some(&pos) = self.index.get(current) else {
            return self.ids.first();
        };
        let next = (pos as i64 + direction.sign()).rem_euclid(count) as usize;
        self.ids.get(next)
    }

    /// Player before `current` in `direction`.
    pub fn previous(&self, current: &str, direction: Direction) -> Option<&PlayerId> {
        self.next(current, direction.flipped())
    }

    /// Apply `next` `steps` times.
    pub fn advance(&self, current: &str, direction: Direction, steps: usize) -> Option<&PlayerId> {
        let mut at = current;
        for _ in 0..steps {
            at = self.next(at, direction)?.as_str();
        }
        self.index.get_key_value(at).map(|(id, _)| id)
    }
}
