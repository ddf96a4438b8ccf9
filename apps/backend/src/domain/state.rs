use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

use crate::domain::{Card, Color};

pub type PlayerId = String;

/// Milliseconds since the Unix epoch, the unit every wire timestamp uses.
pub fn unix_millis(t: OffsetDateTime) -> i64 {
    (t.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Turn order traversal. On the wire `+1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl Serialize for Direction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.sign())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match i64::deserialize(deserializer)? {
            1 => Ok(Direction::Forward),
            -1 => Ok(Direction::Backward),
            other => Err(serde::de::Error::custom(format!(
                "Invalid direction: {other}"
            ))),
        }
    }
}

/// Forced draw owed by whoever acts next, tagged with the card type that
/// opened the chain. A draw-two chain and a wild-draw-four chain never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingDraw {
    #[default]
    None,
    DrawTwo(u32),
    WildDrawFour(u32),
}

impl PendingDraw {
    pub fn amount(self) -> u32 {
        match self {
            PendingDraw::None => 0,
            PendingDraw::DrawTwo(n) | PendingDraw::WildDrawFour(n) => n,
        }
    }

    pub fn is_pending(self) -> bool {
        self.amount() > 0
    }

    /// Wire name of the chain kind, `None` when nothing is owed.
    pub fn kind_str(self) -> Option<&'static str> {
        match self {
            PendingDraw::None => None,
            PendingDraw::DrawTwo(_) => Some("drawTwo"),
            PendingDraw::WildDrawFour(_) => Some("wildDrawFour"),
        }
    }
}

/// Authoritative per-room game state. Hands live on the players.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Undealt cards; index 0 is the next card drawn.
    pub draw_pile: Vec<Card>,
    /// Played cards; the last element is the active top card.
    pub discard_pile: Vec<Card>,
    pub active_color: Option<Color>,
    pub current_turn: Option<PlayerId>,
    pub direction: Direction,
    pub pending: PendingDraw,
    /// Whether each player has declared UNO since reaching one card.
    pub uno_called: BTreeMap<PlayerId, bool>,
    /// Players sitting on one undeclared card, with the instant their grace
    /// window closes.
    pub uno_deadlines: BTreeMap<PlayerId, OffsetDateTime>,
    pub state_version: u64,
    pub last_activity: OffsetDateTime,
    pub winner: Option<PlayerId>,
    pub winner_at: Option<OffsetDateTime>,
    pub last_played_card: Option<Card>,
    pub pending_wild_color_choice: Option<Color>,
    pub last_played_card_animation_id: Option<String>,
}

impl GameState {
    /// Empty lobby state.
    pub fn empty(now: OffsetDateTime) -> Self {
        Self {
            draw_pile: Vec::new(),
            discard_pile: Vec::new(),
            active_color: None,
            current_turn: None,
            direction: Direction::Forward,
            pending: PendingDraw::None,
            uno_called: BTreeMap::new(),
            uno_deadlines: BTreeMap::new(),
            state_version: 1,
            last_activity: now,
            winner: None,
            winner_at: None,
            last_played_card: None,
            pending_wild_color_choice: None,
            last_played_card_animation_id: None,
        }
    }

    pub fn top_card(&self) -> Option<Card> {
        self.discard_pile.last().copied()
    }

    /// Record a mutation: one version step and a fresh activity stamp.
    pub fn bump(&mut self, now: OffsetDateTime) {
        self.state_version += 1;
        self.last_activity = now;
    }

    pub fn has_called_uno(&self, player_id: &str) -> bool {
        self.uno_called.get(player_id).copied().unwrap_or(false)
    }

    pub fn forget_player(&mut self, player_id: &str) {
        self.uno_called.remove(player_id);
        self.uno_deadlines.remove(player_id);
    }
}
