//! Keyed room storage.
//!
//! A store holds one [`Room`] per code and guarantees read-modify-write
//! atomicity per room through compare-and-swap on the state version. Rooms
//! with different codes never contend.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::watch;

use crate::domain::{DeletionReason, Room};
use crate::errors::domain::DomainError;

pub mod memory;

pub use memory::MemoryRoomStore;

/// Change notification published to waiters on a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSignal {
    /// A commit landed at this version.
    Version(u64),
    /// The room is gone. Terminal.
    Deleted(DeletionReason),
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn load(&self, code: &str) -> Result<Option<Room>, DomainError>;

    /// Load or fail with a room-not-found error.
    async fn require(&self, code: &str) -> Result<Room, DomainError> {
        self.load(code)
            .await?
            .ok_or_else(|| DomainError::room_not_found(code))
    }

    /// Insert a new room. Fails if the code is taken.
    async fn insert(&self, room: Room) -> Result<(), DomainError>;

    /// Replace the stored room if its version still equals
    /// `expected_version`.
    async fn commit(&self, room: Room, expected_version: u64) -> Result<(), DomainError>;

    /// Remove a room. Returns whether it existed.
    async fn delete(&self, code: &str, reason: DeletionReason) -> Result<bool, DomainError>;

    /// Why a room that no longer exists went away, if it was seen recently.
    async fn deletion_reason(&self, code: &str) -> Result<Option<DeletionReason>, DomainError>;

    /// Record a heartbeat without changing the version.
    async fn touch_player(
        &self,
        code: &str,
        player_id: &str,
        now: OffsetDateTime,
    ) -> Result<(), DomainError>;

    /// Codes of rooms whose last activity is older than `cutoff`.
    async fn stale_rooms(&self, cutoff: OffsetDateTime) -> Result<Vec<String>, DomainError>;

    /// Forget deletion reasons recorded before `cutoff`.
    async fn purge_tombstones(&self, cutoff: OffsetDateTime) -> Result<usize, DomainError>;

    /// Watch a room for commits and deletion. `None` if it does not exist.
    fn subscribe(&self, code: &str) -> Option<watch::Receiver<RoomSignal>>;

    async fn room_count(&self) -> Result<usize, DomainError>;
}
