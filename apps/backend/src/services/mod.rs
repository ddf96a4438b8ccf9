//! Services bridge the pure domain with the room store.
//!
//! Every mutation reads a room, applies a domain transition to a copy and
//! commits it with compare-and-swap on the state version.

use crate::domain::rules::normalize_room_code;
use crate::errors::domain::{DomainError, ValidationKind};

pub mod deferred;
pub mod game_flow;
pub mod rooms;
pub mod sync;

pub use deferred::{DeferredScheduler, DeferredTask};
pub use game_flow::{GameFlowService, MutationOutcome};
pub use rooms::{LeaveOutcome, RoomService};
pub use sync::{SyncOutcome, SyncService};

/// Canonical room code, or a validation error.
pub fn require_room_code(raw: &str) -> Result<String, DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::validation(
            ValidationKind::MissingField,
            "roomCode is required",
        ));
    }
    normalize_room_code(raw).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::InvalidRoomCode,
            format!("Room code must be 3-10 letters or digits, got '{}'", raw.trim()),
        )
    })
}

/// Trimmed non-empty value of a required text field.
pub fn require_field<'a>(field: &str, value: &'a str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::MissingField,
            format!("{field} is required"),
        ));
    }
    Ok(trimmed)
}
