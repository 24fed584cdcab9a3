//! Unified error type for Township.

use township_protocol::ProtocolError;
use township_room::{ConversationAreaError, RoomError};
use township_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TownshipError {
    /// An encode/decode error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (provisioning, duplicate session).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (not found, bad password, unavailable).
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl From<ConversationAreaError> for TownshipError {
    fn from(err: ConversationAreaError) -> Self {
        Self::Room(RoomError::ConversationArea(err))
    }
}
