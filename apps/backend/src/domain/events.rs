//! Event records attached to mutation responses.
//!
//! Action-specific events are emitted by the room transitions; turn and
//! winner changes are derived afterwards by diffing the room before and
//! after the mutation.

use serde::Serialize;
use serde_json::{json, Value};
use time::OffsetDateTime;
use ulid::Ulid;

use crate::domain::room::{Room, RoomStatus};
use crate::domain::state::{unix_millis, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEventKind {
    CardPlayed,
    CardDrawn,
    TurnAdvanced,
    UnoCalled,
    WildColorChosen,
    WinnerDeclared,
    PlayerJoined,
    PlayerLeft,
    HostChanged,
    RoomDeleted,
    UnoPenalty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub event_id: String,
    #[serde(rename = "type")]
    pub kind: GameEventKind,
    pub player_id: Option<PlayerId>,
    pub data: Value,
    /// Unix milliseconds.
    pub timestamp: i64,
}

impl GameEvent {
    pub fn new(kind: GameEventKind, player_id: Option<&str>, data: Value, now: OffsetDateTime) -> Self {
        Self {
            event_id: Ulid::new().to_string(),
            kind,
            player_id: player_id.map(str::to_string),
            data,
            timestamp: unix_millis(now),
        }
    }
}

/// Why a room stopped existing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeletionReason {
    NotFound,
    HostLeft,
    NoPlayers,
    GameFinished,
    Idle,
}

impl DeletionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionReason::NotFound => "NOT_FOUND",
            DeletionReason::HostLeft => "HOST_LEFT",
            DeletionReason::NoPlayers => "NO_PLAYERS",
            DeletionReason::GameFinished => "GAME_FINISHED",
            DeletionReason::Idle => "IDLE",
        }
    }
}

pub fn room_deleted_event(reason: DeletionReason, now: OffsetDateTime) -> GameEvent {
    GameEvent::new(
        GameEventKind::RoomDeleted,
        None,
        json!({ "reason": reason.as_str() }),
        now,
    )
}

/// Edge-triggered events from comparing a room before and after a mutation.
pub fn derive_transition_events(before: &Room, after: &Room, now: OffsetDateTime) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if let Some(player_id) = after.game.current_turn.as_deref() {
        if before.game.current_turn.as_deref() != Some(player_id) {
            events.push(GameEvent::new(
                GameEventKind::TurnAdvanced,
                Some(player_id),
                json!({
                    "from": before.game.current_turn,
                    "direction": after.game.direction,
                }),
                now,
            ));
        }
    }

    if before.status != RoomStatus::Finished && after.status == RoomStatus::Finished {
        if let Some(winner) = after.game.winner.as_deref() {
            events.push(GameEvent::new(
                GameEventKind::WinnerDeclared,
                Some(winner),
                json!({ "winnerPlayerId": winner }),
                now,
            ));
        }
    }

    events
}
