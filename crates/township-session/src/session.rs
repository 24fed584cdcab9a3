//! The session record.

use township_protocol::ParticipantId;

/// A participant's live connection to one room.
///
/// Created when the participant is admitted and destroyed when they
/// leave. Handed back to the caller of `add_participant` so the transport
/// can give both tokens to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Which participant this session belongs to.
    pub participant_id: ParticipantId,

    /// Opaque credential the client presents on every request.
    /// A 32-character hex string (128 bits of randomness).
    pub session_token: String,

    /// Room-scoped token for the video service.
    pub video_token: String,
}
