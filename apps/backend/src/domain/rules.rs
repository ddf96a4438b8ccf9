use lazy_regex::regex_is_match;

use super::cards_types::Color;

pub const DECK_SIZE: usize = 108;
pub const HAND_SIZE: usize = 7;
pub const MIN_PLAYERS: usize = 2;

pub const DRAW_TWO_PENALTY: u32 = 2;
pub const WILD_DRAW_FOUR_PENALTY: u32 = 4;
pub const UNO_PENALTY_CARDS: usize = 2;

/// Color assumed when a wild reaches the resolver without a choice
/// (opening card, or a caller that skipped validation).
pub const FALLBACK_WILD_COLOR: Color = Color::Red;

/// Cards allowed beneath the top of the discard pile before they are
/// shuffled back into the draw pile.
pub const DEFAULT_DISCARD_RECYCLE_THRESHOLD: usize = 6;

/// Trim and upper-case a room code, then check `^[A-Z0-9]{3,10}$`.
pub fn normalize_room_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_ascii_uppercase();
    regex_is_match!(r"^[A-Z0-9]{3,10}$", &code).then_some(code)
}
