//! Error codes for the ono backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    ValidationError,
    BadRequest,
    InvalidHeader,
    MissingField,
    InvalidRoomCode,

    // Game rules
    CardNotInHand,
    IllegalMove,
    WildColorRequired,
    NotEnoughPlayers,
    InvalidUnoCall,
    UnoAlreadyCalled,
    PhaseMismatch,
    NoCardsToDraw,

    // Authorization
    Forbidden,
    OutOfTurn,
    NotHost,
    Spectator,

    // Resource not found
    RoomNotFound,
    PlayerNotFound,
    NotFound,

    // Conflicts
    RoomCodeTaken,
    OptimisticLock,
    DuplicatePlayer,
    Conflict,

    // System errors
    Internal,
    ConfigError,
    StoreUnavailable,
    Timeout,
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",
            Self::MissingField => "MISSING_FIELD",
            Self::InvalidRoomCode => "INVALID_ROOM_CODE",

            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::IllegalMove => "ILLEGAL_MOVE",
            Self::WildColorRequired => "WILD_COLOR_REQUIRED",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::InvalidUnoCall => "INVALID_UNO_CALL",
            Self::UnoAlreadyCalled => "UNO_ALREADY_CALLED",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::NoCardsToDraw => "NO_CARDS_TO_DRAW",

            Self::Forbidden => "FORBIDDEN",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::NotHost => "NOT_HOST",
            Self::Spectator => "SPECTATOR",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::RoomCodeTaken => "ROOM_CODE_TAKEN",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::DuplicatePlayer => "DUPLICATE_PLAYER",
            Self::Conflict => "CONFLICT",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
