//! Viewer-scoped snapshots of a room.
//!
//! Only the viewer's own hand is included; everyone else is a card count.
//! The draw pile is never revealed beyond its size.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::events::{room_deleted_event, DeletionReason, GameEvent};
use crate::domain::room::{Room, RoomStatus};
use crate::domain::state::{unix_millis, Direction, PlayerId};
use crate::domain::{Card, Color};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub code: String,
    pub host_id: PlayerId,
    pub status: RoomStatus,
    pub state_version: u64,
    pub created_at: i64,
    pub last_activity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub seat_number: Option<u32>,
    pub is_host: bool,
    pub is_spectator: bool,
    pub card_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
    pub uno_called: bool,
    pub last_seen: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub discard_pile: Vec<Card>,
    pub draw_pile_count: usize,
    pub active_color: Option<Color>,
    pub current_turn_player_id: Option<PlayerId>,
    pub direction: Direction,
    pub pending_draw_count: u32,
    pub pending_draw_kind: Option<&'static str>,
    pub turn_order: Vec<PlayerId>,
    pub winner_player_id: Option<PlayerId>,
    pub winner_timestamp: Option<i64>,
    pub last_played_card: Option<Card>,
    pub pending_wild_color_choice: Option<Color>,
    pub last_played_card_animation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room: RoomView,
    pub players: Vec<PlayerView>,
    /// `None` while the room is still in the lobby.
    pub game_state: Option<GameStateView>,
    pub state_version: u64,
    pub events: Vec<GameEvent>,
}

impl RoomSnapshot {
    /// Snapshot as seen by `viewer`. Players are listed in seat order,
    /// spectators last.
    pub fn for_viewer(room: &Room, viewer: Option<&str>, events: Vec<GameEvent>) -> Self {
        let game = &room.game;

        let mut players: Vec<PlayerView> = room
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id.clone(),
                name: p.name.clone(),
                seat_number: p.seat,
                is_host: p.is_host,
                is_spectator: p.is_spectator,
                card_count: p.hand.len(),
                hand: (viewer == Some(p.id.as_str())).then(|| p.hand.clone()),
                uno_called: game.has_called_uno(&p.id),
                last_seen: unix_millis(p.last_seen),
            })
            .collect();
        players.sort_by_key(|p| (p.is_spectator, p.seat_number.unwrap_or(u32::MAX)));

        let game_state = (room.status != RoomStatus::Lobby).then(|| GameStateView {
            discard_pile: game.discard_pile.clone(),
            draw_pile_count: game.draw_pile.len(),
            active_color: game.active_color,
            current_turn_player_id: game.current_turn.clone(),
            direction: game.direction,
            pending_draw_count: game.pending.amount(),
            pending_draw_kind: game.pending.kind_str(),
            turn_order: room.turn_order().ids().to_vec(),
            winner_player_id: game.winner.clone(),
            winner_timestamp: game.winner_at.map(unix_millis),
            last_played_card: game.last_played_card,
            pending_wild_color_choice: game.pending_wild_color_choice,
            last_played_card_animation_id: game.last_played_card_animation_id.clone(),
        });

        Self {
            room: RoomView {
                code: room.code.clone(),
                host_id: room.host_id.clone(),
                status: room.status,
                state_version: room.version(),
                created_at: unix_millis(room.created_at),
                last_activity: unix_millis(game.last_activity),
            },
            players,
            game_state,
            state_version: room.version(),
            events,
        }
    }
}

/// Terminal notification for a room that no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomDeleted {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub reason: DeletionReason,
    pub events: Vec<GameEvent>,
}

impl RoomDeleted {
    pub fn new(reason: DeletionReason, now: OffsetDateTime) -> Self {
        Self {
            type_: "ROOM_DELETED",
            reason,
            events: vec![room_deleted_event(reason, now)],
        }
    }
}
