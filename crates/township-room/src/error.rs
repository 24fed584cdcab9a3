//! Error types for the room layer.

use township_protocol::{ParticipantId, RoomId};
use township_session::SessionError;

/// Reasons a conversation area is refused.
///
/// These are validation outcomes, not faults: the room is untouched
/// whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversationAreaError {
    /// Every area needs a label to be addressed by.
    #[error("conversation area label must not be empty")]
    EmptyLabel,

    /// Every area needs a topic.
    #[error("conversation area topic must not be empty")]
    EmptyTopic,

    /// An area with this label already exists in the room.
    #[error("conversation area {0:?} already exists")]
    DuplicateLabel(String),

    /// The candidate's rectangle overlaps an existing area.
    #[error("conversation area {label:?} overlaps {existing:?}")]
    Overlapping { label: String, existing: String },
}

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The participant is already in this room.
    #[error("participant {0} already in room {1}")]
    AlreadyInRoom(ParticipantId, RoomId),

    /// The participant is not in this room.
    #[error("participant {0} not in room {1}")]
    NotInRoom(ParticipantId, RoomId),

    /// The video provisioner refused to issue a token. The room was
    /// not modified.
    #[error("could not admit participant: {0}")]
    Provisioning(#[source] SessionError),

    /// A conversation area failed validation.
    #[error(transparent)]
    ConversationArea(#[from] ConversationAreaError),

    /// The administrative password did not match.
    #[error("invalid update password for room {0}")]
    InvalidPassword(RoomId),

    /// The request is not valid for the room as it stands.
    /// For example, renaming a room to an empty name.
    #[error("invalid room operation: {0}")]
    InvalidState(String),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
