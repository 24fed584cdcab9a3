//! Room manager: creates, lists, edits, and deletes rooms.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use township_protocol::{RoomId, RoomListEntry};
use township_session::VideoProvisioner;

use crate::room::spawn_room;
use crate::{RoomConfig, RoomError, RoomHandle};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// What the creator of a room gets back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRoom {
    pub room_id: RoomId,
    /// Required to edit or delete the room. Only shown once.
    pub update_password: String,
}

/// Manages all active rooms of this process.
///
/// This is the entry point for room administration from higher layers.
/// Rooms live only as long as the manager: nothing is persisted.
pub struct RoomManager<P: VideoProvisioner> {
    /// Shared with every room so each can issue video tokens.
    provisioner: Arc<P>,

    /// Active rooms, keyed by room ID.
    rooms: HashMap<RoomId, RoomHandle<P>>,
}

impl<P: VideoProvisioner> RoomManager<P> {
    /// Creates an empty manager that provisions video through `provisioner`.
    pub fn new(provisioner: P) -> Self {
        Self {
            provisioner: Arc::new(provisioner),
            rooms: HashMap::new(),
        }
    }

    /// Creates a new room and returns its ID and update password.
    ///
    /// # Errors
    /// Returns [`RoomError::InvalidState`] if the friendly name is empty.
    pub fn create_room(
        &mut self,
        config: RoomConfig,
    ) -> Result<CreatedRoom, RoomError> {
        if config.friendly_name.is_empty() {
            return Err(RoomError::InvalidState(
                "friendly name must not be empty".into(),
            ));
        }

        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let friendly_name = config.friendly_name.clone();
        let (handle, update_password) =
            spawn_room(room_id, config, Arc::clone(&self.provisioner));
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, %friendly_name, "room created");

        Ok(CreatedRoom {
            room_id,
            update_password,
        })
    }

    /// Returns a handle to a room.
    pub fn room(&self, room_id: RoomId) -> Result<RoomHandle<P>, RoomError> {
        self.rooms
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Lists all publicly listed rooms.
    ///
    /// Queries each room actor for its current info. Rooms that fail to
    /// respond (e.g., shutting down) are silently skipped.
    pub async fn list_public_rooms(&self) -> Vec<RoomListEntry> {
        let mut entries = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.get_info().await {
                if info.is_public {
                    entries.push(RoomListEntry {
                        room_id: info.room_id,
                        friendly_name: info.friendly_name,
                        current_occupancy: info.occupancy,
                        maximum_occupancy: info.capacity,
                    });
                }
            }
        }
        entries.sort_by_key(|entry| entry.room_id.0);
        entries
    }

    /// Renames a room and/or changes its listing, if `password` matches.
    ///
    /// Fields left as `None` are unchanged. On any error nothing changes.
    pub async fn update_room(
        &self,
        room_id: RoomId,
        password: &str,
        friendly_name: Option<String>,
        is_public: Option<bool>,
    ) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        handle.update(password, friendly_name, is_public).await
    }

    /// Destroys a room if `password` matches.
    ///
    /// Listeners get their room-destroyed notification before the actor
    /// stops; the room is then forgotten.
    pub async fn delete_room(
        &mut self,
        room_id: RoomId,
        password: &str,
    ) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .get(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;

        if !handle.verify_password(password).await? {
            return Err(RoomError::InvalidPassword(room_id));
        }
        if let Err(e) = handle.destroy().await {
            tracing::debug!(%room_id, error = %e, "room already stopped");
        }

        self.rooms.remove(&room_id);
        tracing::info!(%room_id, "room deleted");
        Ok(())
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all active room IDs.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }
}
