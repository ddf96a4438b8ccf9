//! In-process [`RoomStore`] backed by a sharded concurrent map.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::debug;

use super::{RoomSignal, RoomStore};
use crate::domain::{DeletionReason, Room};
use crate::errors::domain::{ConflictKind, DomainError};

struct Slot {
    room: Room,
    signal: watch::Sender<RoomSignal>,
}

#[derive(Default)]
pub struct MemoryRoomStore {
    rooms: DashMap<String, Slot>,
    tombstones: DashMap<String, (DeletionReason, OffsetDateTime)>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn load(&self, code: &str) -> Result<Option<Room>, DomainError> {
        Ok(self.rooms.get(code).map(|slot| slot.room.clone()))
    }

    async fn insert(&self, room: Room) -> Result<(), DomainError> {
        match self.rooms.entry(room.code.clone()) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::RoomCodeTaken,
                format!("Room code {} is already in use", room.code),
            )),
            Entry::Vacant(vacant) => {
                self.tombstones.remove(&room.code);
                let (signal, _) = watch::channel(RoomSignal::Version(room.version()));
                debug!(room = %room.code, version = room.version(), "Room inserted");
                vacant.insert(Slot { room, signal });
                Ok(())
            }
        }
    }

    async fn commit(&self, room: Room, expected_version: u64) -> Result<(), DomainError> {
        let mut slot = self
            .rooms
            .get_mut(&room.code)
            .ok_or_else(|| DomainError::room_not_found(&room.code))?;

        let actual = slot.room.version();
        if actual != expected_version {
            return Err(DomainError::optimistic_lock(expected_version, actual));
        }

        let version = room.version();
        slot.room = room;
        if version != actual {
            slot.signal.send_replace(RoomSignal::Version(version));
        }
        Ok(())
    }

    async fn delete(&self, code: &str, reason: DeletionReason) -> Result<bool, DomainError> {
        let Some((_, slot)) = self.rooms.remove(code) else {
            return Ok(false);
        };
        self.tombstones
            .insert(code.to_string(), (reason, OffsetDateTime::now_utc()));
        slot.signal.send_replace(RoomSignal::Deleted(reason));
        debug!(room = code, reason = reason.as_str(), "Room removed");
        Ok(true)
    }

    async fn deletion_reason(&self, code: &str) -> Result<Option<DeletionReason>, DomainError> {
        Ok(self.tombstones.get(code).map(|entry| entry.0))
    }

    async fn touch_player(
        &self,
        code: &str,
        player_id: &str,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        let mut slot = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| DomainError::room_not_found(code))?;
        slot.room.touch(player_id, now)
    }

    async fn stale_rooms(&self, cutoff: OffsetDateTime) -> Result<Vec<String>, DomainError> {
        Ok(self
            .rooms
            .iter()
            .filter(|slot| slot.room.last_activity() < cutoff)
            .map(|slot| slot.key().clone())
            .collect())
    }

    async fn purge_tombstones(&self, cutoff: OffsetDateTime) -> Result<usize, DomainError> {
        let before = self.tombstones.len();
        self.tombstones.retain(|_, (_, at)| *at >= cutoff);
        Ok(before - self.tombstones.len())
    }

    fn subscribe(&self, code: &str) -> Option<watch::Receiver<RoomSignal>> {
        self.rooms.get(code).map(|slot| slot.signal.subscribe())
    }

    async fn room_count(&self) -> Result<usize, DomainError> {
        Ok(self.rooms.len())
    }
}
