//! The room aggregate: players, their hands and the game state, with every
//! player-facing transition.
//!
//! Each successful transition bumps the version exactly once. A failed
//! transition may leave `self` half-updated; callers mutate a copy and
//! drop it on error.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Duration, OffsetDateTime};

use crate::domain::accountant::{
    apply_uno_penalty, call_uno, overdue_uno_players, recycle_discard, resolve_draw,
    track_uno_window, uno_penalty_due,
};
use crate::domain::dealing::{deal_hands, shuffle, standard_deck};
use crate::domain::events::{DeletionReason, GameEvent, GameEventKind};
use crate::domain::legality::is_legal;
use crate::domain::resolver::resolve_play;
use crate::domain::rules::{
    DEFAULT_DISCARD_RECYCLE_THRESHOLD, FALLBACK_WILD_COLOR, HAND_SIZE, MIN_PLAYERS,
};
use crate::domain::state::{Direction, GameState, PendingDraw, PlayerId};
use crate::domain::turn_order::TurnOrder;
use crate::domain::{Card, Color};
use crate::errors::domain::{DomainError, ForbiddenKind, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Lobby,
    Playing,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Fixed at join; spectators have none.
    pub seat: Option<u32>,
    pub hand: Vec<Card>,
    pub is_host: bool,
    pub is_spectator: bool,
    pub last_seen: OffsetDateTime,
}

/// Rule knobs that come from configuration rather than the card game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSettings {
    pub uno_grace: Duration,
    pub discard_recycle_threshold: usize,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            uno_grace: Duration::seconds(2),
            discard_recycle_threshold: DEFAULT_DISCARD_RECYCLE_THRESHOLD,
        }
    }
}

/// Result of a player leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The player left; the room carries on.
    Left,
    /// The room must be deleted.
    RoomClosed(DeletionReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub code: String,
    pub host_id: PlayerId,
    pub status: RoomStatus,
    pub game: GameState,
    pub players: Vec<Player>,
    pub created_at: OffsetDateTime,
}

impl Room {
    /// New lobby with the host in seat 1.
    pub fn new(code: String, host_id: PlayerId, host_name: String, now: OffsetDateTime) -> Self {
        let host = Player {
            id: host_id.clone(),
            name: host_name,
            seat: Some(1),
            hand: Vec::new(),
            is_host: true,
            is_spectator: false,
            last_seen: now,
        };
        Self {
            code,
            host_id,
            status: RoomStatus::Lobby,
            game: GameState::empty(now),
            players: vec![host],
            created_at: now,
        }
    }

    pub fn version(&self) -> u64 {
        self.game.state_version
    }

    pub fn last_activity(&self) -> OffsetDateTime {
        self.game.last_activity
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn require_player(&self, id: &str) -> Result<usize, DomainError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DomainError::player_not_found(id))
    }

    /// Seat order of the current active players.
    pub fn turn_order(&self) -> TurnOrder {
        TurnOrder::from_players(&self.players)
    }

    /// Every card held or piled in this room.
    pub fn card_total(&self) -> usize {
        self.game.draw_pile.len()
            + self.game.discard_pile.len()
            + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
    }

    /// Record a heartbeat. Not a state change, so the version stays put.
    pub fn touch(&mut self, player_id: &str, now: OffsetDateTime) -> Result<(), DomainError> {
        let idx = self.require_player(player_id)?;
        self.players[idx].last_seen = now;
        Ok(())
    }

    /// Add a player, or refresh the name of one already here.
    ///
    /// Newcomers take the next free seat. Anyone arriving after the game
    /// started watches as a spectator.
    pub fn join(
        &mut self,
        player_id: &str,
        name: &str,
        spectator: bool,
        now: OffsetDateTime,
    ) -> Result<Vec<GameEvent>, DomainError> {
        if let Ok(idx) = self.require_player(player_id) {
            let player = &mut self.players[idx];
            player.name = name.to_string();
            player.last_seen = now;
            self.game.bump(now);
            return Ok(Vec::new());
        }

        let is_spectator = spectator || self.status != RoomStatus::Lobby;
        let seat = if is_spectator {
            None
        } else {
            Some(self.players.iter().filter_map(|p| p.seat).max().unwrap_or(0) + 1)
        };

        self.players.push(Player {
            id: player_id.to_string(),
            name: name.to_string(),
            seat,
            hand: Vec::new(),
            is_host: false,
            is_spectator,
            last_seen: now,
        });
        self.game.bump(now);

        Ok(vec![GameEvent::new(
            GameEventKind::PlayerJoined,
            Some(player_id),
            json!({ "name": name, "seat": seat, "isSpectator": is_spectator }),
            now,
        )])
    }

    /// Remove a player. The host leaving, or the last player leaving,
    /// closes the room instead.
    ///
    /// Mid-game the leaver's hand goes to the bottom of the draw pile, the
    /// turn moves on if it was theirs, and a lone remaining player wins.
    pub fn leave(
        &mut self,
        player_id: &str,
        now: OffsetDateTime,
    ) -> Result<(Departure, Vec<GameEvent>), DomainError> {
        let idx = self.require_player(player_id)?;
        if self.players[idx].is_host {
            return Ok((Departure::RoomClosed(DeletionReason::HostLeft), Vec::new()));
        }
        if self.players.len() == 1 {
            return Ok((Departure::RoomClosed(DeletionReason::NoPlayers), Vec::new()));
        }

        let order_before = self.turn_order();
        let leaver = self.players.remove(idx);
        self.game.draw_pile.extend(leaver.hand);
        self.game.forget_player(player_id);

        if self.status == RoomStatus::Playing {
            if self.game.current_turn.as_deref() == Some(player_id) {
                self.game.current_turn = order_before
                    .next(player_id, self.game.direction)
                    .filter(|next| next.as_str() != player_id)
                    .cloned();
            }
            let order = self.turn_order();
            if order.len() < MIN_PLAYERS {
                let survivor = order.first().cloned();
                self.finish(survivor, now);
            }
        }

        self.game.bump(now);
        Ok((
            Departure::Left,
            vec![GameEvent::new(
                GameEventKind::PlayerLeft,
                Some(player_id),
                json!({ "name": leaver.name }),
                now,
            )],
        ))
    }

    /// Hand the host role to a random other player, preferring active ones.
    pub fn resign_host<R: Rng + ?Sized>(
        &mut self,
        player_id: &str,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Result<Vec<GameEvent>, DomainError> {
        let idx = self.require_player(player_id)?;
        if !self.players[idx].is_host {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotHost,
                "Only the host can resign",
            ));
        }

        let others: Vec<usize> = (0..self.players.len()).filter(|&i| i != idx).collect();
        let active: Vec<usize> = others
            .iter()
            .copied()
            .filter(|&i| !self.players[i].is_spectator)
            .collect();
        let pool = if active.is_empty() { &others } else { &active };
        if pool.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::NotEnoughPlayers,
                "No other player can take over as host",
            ));
        }
        let successor = pool[rng.random_range(0..pool.len())];

        self.players[idx].is_host = false;
        self.players[successor].is_host = true;
        self.host_id = self.players[successor].id.clone();
        self.game.bump(now);

        Ok(vec![GameEvent::new(
            GameEventKind::HostChanged,
            Some(self.host_id.as_str()),
            json!({ "previousHostId": player_id }),
            now,
        )])
    }

    /// Shuffle, deal and open the discard pile.
    ///
    /// The opening card comes off the dealer's (host's) hand and resolves as
    /// if the seat before the dealer had played it, so a plain opening card
    /// puts the dealer on turn.
    pub fn start_game<R: Rng + ?Sized>(
        &mut self,
        requester: &str,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Result<Vec<GameEvent>, DomainError> {
        if self.status != RoomStatus::Lobby {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Game has already started",
            ));
        }
        let idx = self.require_player(requester)?;
        if !self.players[idx].is_host {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotHost,
                "Only the host can start the game",
            ));
        }
        let order = self.turn_order();
        if order.len() < MIN_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::NotEnoughPlayers,
                format!("Need at least {MIN_PLAYERS} players, have {}", order.len()),
            ));
        }

        let mut deck = standard_deck();
        shuffle(&mut deck, rng);
        let hands = deal_hands(&mut deck, order.len(), HAND_SIZE)?;
        for (id, hand) in order.ids().iter().zip(hands) {
            if let Some(p) = self.players.iter_mut().find(|p| &p.id == id) {
                p.hand = hand;
            }
        }

        let dealer = if order.contains(&self.host_id) {
            self.host_id.clone()
        } else {
            order.first().cloned().unwrap_or_default()
        };
        let dealer_idx = self.require_player(&dealer)?;
        let dealer_hand = &mut self.players[dealer_idx].hand;
        if dealer_hand.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::Other("EMPTY_HAND".into()),
                "Dealer has no card to open with",
            ));
        }
        let opening = dealer_hand.remove(0);

        let mut game = GameState::empty(now);
        game.state_version = self.game.state_version;
        game.draw_pile = deck;
        game.direction = Direction::Forward;
        game.uno_called = order.ids().iter().map(|id| (id.clone(), false)).collect();
        let opener = order
            .previous(&dealer, Direction::Forward)
            .cloned()
            .unwrap_or_else(|| dealer.clone());

        let chosen = opening.is_wild().then_some(FALLBACK_WILD_COLOR);
        let mut opened = resolve_play(&game, opening, chosen, &opener, &order, now);
        opened.last_played_card = None;
        opened.last_played_card_animation_id = None;

        self.game = opened;
        self.status = RoomStatus::Playing;
        Ok(Vec::new())
    }

    fn require_turn(&self, actor: &str) -> Result<usize, DomainError> {
        if self.status != RoomStatus::Playing {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Game is not in progress",
            ));
        }
        let idx = self.require_player(actor)?;
        if self.players[idx].is_spectator {
            return Err(DomainError::forbidden(
                ForbiddenKind::Spectator,
                "Spectators cannot act",
            ));
        }
        if self.game.current_turn.as_deref() != Some(actor) {
            return Err(DomainError::forbidden(
                ForbiddenKind::OutOfTurn,
                "It is not your turn",
            ));
        }
        Ok(idx)
    }

    /// Penalize anyone other than `actor` whose UNO grace window closed.
    fn settle_overdue_uno<R: Rng + ?Sized>(
        &mut self,
        actor: &str,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for offender in overdue_uno_players(&self.game, now) {
            if offender == actor {
                continue;
            }
            if let Some(event) = self.penalize_if_due(&offender, rng, now) {
                events.push(event);
            }
        }
        events
    }

    fn penalize_if_due<R: Rng + ?Sized>(
        &mut self,
        player_id: &str,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Option<GameEvent> {
        let Some(idx) = self.players.iter().position(|p| p.id == player_id) else {
            self.game.forget_player(player_id);
            return None;
        };
        let hand_len = self.players[idx].hand.len();
        if !uno_penalty_due(&self.game, player_id, hand_len, now) {
            if hand_len != 1 {
                self.game.uno_deadlines.remove(player_id);
            }
            return None;
        }
        let hand = &mut self.players[idx].hand;
        let drawn = apply_uno_penalty(&mut self.game, hand, player_id, rng);
        Some(GameEvent::new(
            GameEventKind::UnoPenalty,
            Some(player_id),
            json!({ "cardsDrawn": drawn.len() }),
            now,
        ))
    }

    /// Play `card` from `actor`'s hand.
    pub fn play_card<R: Rng + ?Sized>(
        &mut self,
        actor: &str,
        card: Card,
        chosen_color: Option<Color>,
        settings: &RuleSettings,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Result<Vec<GameEvent>, DomainError> {
        let idx = self.require_turn(actor)?;
        let hand = &self.players[idx].hand;
        let Some(pos) = hand.iter().position(|c| *c == card) else {
            return Err(DomainError::validation(
                ValidationKind::CardNotInHand,
                format!("{card} is not in your hand"),
            ));
        };
        if card.is_wild() && chosen_color.is_none() {
            return Err(DomainError::validation(
                ValidationKind::WildColorRequired,
                "Choose a color for the wild card",
            ));
        }
        let (Some(top), Some(active)) = (self.game.top_card(), self.game.active_color) else {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "No card on the discard pile",
            ));
        };
        if !is_legal(card, top, active, self.game.pending, Some(hand.as_slice())) {
            return Err(DomainError::validation(
                ValidationKind::IllegalMove,
                format!("{card} cannot be played on {top} (active color {active})"),
            ));
        }

        let mut events = self.settle_overdue_uno(actor, rng, now);

        self.players[idx].hand.remove(pos);
        let order = self.turn_order();
        self.game = resolve_play(&self.game, card, chosen_color, actor, &order, now);

        events.push(GameEvent::new(
            GameEventKind::CardPlayed,
            Some(actor),
            json!({ "card": card, "animationId": self.game.last_played_card_animation_id }),
            now,
        ));
        if let (true, Some(color)) = (card.is_wild(), chosen_color) {
            events.push(GameEvent::new(
                GameEventKind::WildColorChosen,
                Some(actor),
                json!({ "color": color }),
                now,
            ));
        }

        let remaining = self.players[idx].hand.len();
        if remaining == 0 {
            self.finish(Some(actor.to_string()), now);
        } else {
            track_uno_window(&mut self.game, actor, remaining, settings.uno_grace, now);
            recycle_discard(&mut self.game, settings.discard_recycle_threshold, rng);
        }
        Ok(events)
    }

    /// Draw the owed cards (or one) and end the turn.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        actor: &str,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Result<Vec<GameEvent>, DomainError> {
        let idx = self.require_turn(actor)?;
        let mut events = self.settle_overdue_uno(actor, rng, now);

        let order = self.turn_order();
        let forced = self.game.pending.amount();
        let hand = &mut self.players[idx].hand;
        let drawn = resolve_draw(&mut self.game, hand, actor, &order, rng, now)?;

        events.push(GameEvent::new(
            GameEventKind::CardDrawn,
            Some(actor),
            json!({ "count": drawn.len(), "forced": forced > 0 }),
            now,
        ));
        Ok(events)
    }

    /// End the turn without playing. A pending penalty stays for the next
    /// player.
    pub fn pass_turn<R: Rng + ?Sized>(
        &mut self,
        actor: &str,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Result<Vec<GameEvent>, DomainError> {
        self.require_turn(actor)?;
        let events = self.settle_overdue_uno(actor, rng, now);
        let order = self.turn_order();
        self.game.current_turn = order.next(actor, self.game.direction).cloned();
        self.game.bump(now);
        Ok(events)
    }

    /// Declare UNO. Allowed out of turn.
    pub fn call_uno(&mut self, actor: &str, now: OffsetDateTime) -> Result<Vec<GameEvent>, DomainError> {
        if self.status != RoomStatus::Playing {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Game is not in progress",
            ));
        }
        let idx = self.require_player(actor)?;
        if self.players[idx].is_spectator {
            return Err(DomainError::forbidden(
                ForbiddenKind::Spectator,
                "Spectators cannot call UNO",
            ));
        }
        call_uno(&mut self.game, actor, self.players[idx].hand.len(), now)?;
        Ok(vec![GameEvent::new(
            GameEventKind::UnoCalled,
            Some(actor),
            json!({}),
            now,
        )])
    }

    /// Apply the UNO penalty to `player_id` if it is due right now.
    ///
    /// `Ok(None)` means nothing changed and the version did not move.
    pub fn enforce_uno_penalty<R: Rng + ?Sized>(
        &mut self,
        player_id: &str,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Result<Option<Vec<GameEvent>>, DomainError> {
        if self.status != RoomStatus::Playing {
            return Ok(None);
        }
        match self.penalize_if_due(player_id, rng, now) {
            Some(event) => {
                self.game.bump(now);
                Ok(Some(vec![event]))
            }
            None => Ok(None),
        }
    }

    fn finish(&mut self, winner: Option<PlayerId>, now: OffsetDateTime) {
        self.status = RoomStatus::Finished;
        self.game.winner_at = winner.as_ref().map(|_| now);
        self.game.winner = winner;
        self.game.current_turn = None;
        self.game.pending = PendingDraw::None;
        self.game.uno_deadlines.clear();
    }
}
