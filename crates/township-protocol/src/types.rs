//! Core domain types shared by every Township layer.
//!
//! Everything here is plain data: it is owned and mutated by the room
//! controller, handed by reference to listeners, and serializable so a
//! transport can forward it to clients unchanged.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, Point};

/// Counter for generating unique participant IDs.
static NEXT_PARTICIPANT_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a participant.
///
/// Newtype wrapper so a `RoomId` can never be passed where a participant
/// is expected. Serializes as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl ParticipantId {
    /// Allocates the next process-wide participant ID.
    pub fn next() -> Self {
        Self(NEXT_PARTICIPANT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one shared space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Which way a participant's avatar is facing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

/// Where a participant is and what they claim to be talking in.
///
/// `conversation_label` is what the client reports; the room decides
/// whether that label names a real conversation area.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub rotation: Direction,
    pub moving: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_label: Option<String>,
}

impl Location {
    /// A stationary, front-facing location with no conversation label.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Returns the same location tagged with a conversation label.
    pub fn in_conversation(mut self, label: impl Into<String>) -> Self {
        self.conversation_label = Some(label.into());
        self
    }

    /// The position as a [`Point`], ignoring facing and label.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// A person connected to a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub user_name: String,
    pub location: Location,
    /// Label of the conversation area this participant occupies, if any.
    /// Only the room controller sets this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_area: Option<String>,
}

impl Participant {
    /// Creates a participant with a fresh ID, standing at the origin.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::next(),
            user_name: user_name.into(),
            location: Location::default(),
            active_area: None,
        }
    }

    /// Builder-style helper to place the participant somewhere.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

// ---------------------------------------------------------------------------
// ConversationArea
// ---------------------------------------------------------------------------

/// A labeled rectangle that groups the participants inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationArea {
    pub label: String,
    pub topic: String,
    pub bounding_box: BoundingBox,
    /// Participants in this area. Duplicate-free; order carries no meaning.
    #[serde(default)]
    pub occupants: Vec<ParticipantId>,
}

impl ConversationArea {
    /// Creates an unoccupied area.
    pub fn new(
        label: impl Into<String>,
        topic: impl Into<String>,
        bounding_box: BoundingBox,
    ) -> Self {
        Self {
            label: label.into(),
            topic: topic.into(),
            bounding_box,
            occupants: Vec::new(),
        }
    }

    /// Adds an occupant. Returns `false` if they were already present.
    pub fn add_occupant(&mut self, id: ParticipantId) -> bool {
        if self.occupants.contains(&id) {
            return false;
        }
        self.occupants.push(id);
        true
    }

    /// Removes an occupant. Returns `false` if they were not present.
    pub fn remove_occupant(&mut self, id: ParticipantId) -> bool {
        let before = self.occupants.len();
        self.occupants.retain(|occupant| *occupant != id);
        self.occupants.len() != before
    }

    pub fn has_occupant(&self, id: ParticipantId) -> bool {
        self.occupants.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Events and listings
// ---------------------------------------------------------------------------

/// A room notification in serializable form.
///
/// One variant per listener callback. Internally tagged, so an event
/// looks like `{ "type": "ParticipantMoved", "participant": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoomEvent {
    ParticipantJoined { participant: Participant },
    ParticipantMoved { participant: Participant },
    ParticipantDisconnected { participant: Participant },
    ConversationAreaUpdated { area: ConversationArea },
    ConversationAreaDestroyed { area: ConversationArea },
    RoomDestroyed,
}

/// A summary of a publicly listed room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListEntry {
    pub room_id: RoomId,
    pub friendly_name: String,
    pub current_occupancy: usize,
    pub maximum_occupancy: usize,
}
