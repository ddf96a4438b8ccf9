//! Domain-level error type used across the engine, store and services.
//!
//! This error type is HTTP-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert with the
//! `From<DomainError> for AppError` implementation in `crate::error`.

use thiserror::Error;

/// Request-shape problems and rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    MissingField,
    InvalidRoomCode,
    CardNotInHand,
    IllegalMove,
    WildColorRequired,
    NotEnoughPlayers,
    InvalidUnoCall,
    UnoAlreadyCalled,
    PhaseMismatch,
    NoCardsToDraw,
    Other(String),
}

/// Actions attempted by someone who is not allowed to take them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ForbiddenKind {
    OutOfTurn,
    NotHost,
    Spectator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    RoomCodeTaken,
    OptimisticLock,
    DuplicatePlayer,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Player,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    StoreUnavailable,
    DataCorruption,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    #[error("forbidden {0:?}: {1}")]
    Forbidden(ForbiddenKind, String),
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    #[error("infra {0:?}: {1}")]
    Infra(InfraErrorKind, String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn forbidden(kind: ForbiddenKind, detail: impl Into<String>) -> Self {
        Self::Forbidden(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn room_not_found(code: &str) -> Self {
        Self::not_found(NotFoundKind::Room, format!("Room {code} not found"))
    }

    pub fn player_not_found(player_id: &str) -> Self {
        Self::not_found(
            NotFoundKind::Player,
            format!("Player {player_id} is not in this room"),
        )
    }

    pub fn optimistic_lock(expected: u64, actual: u64) -> Self {
        Self::conflict(
            ConflictKind::OptimisticLock,
            format!(
                "Room was modified concurrently (expected version {expected}, actual version {actual})"
            ),
        )
    }

    /// True when the room itself is gone; callers answer with a
    /// room-deleted notification instead of an error.
    pub fn is_room_missing(&self) -> bool {
        matches!(self, DomainError::NotFound(NotFoundKind::Room, _))
    }

    pub fn is_optimistic_lock(&self) -> bool {
        matches!(self, DomainError::Conflict(ConflictKind::OptimisticLock, _))
    }
}
