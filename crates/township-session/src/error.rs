//! Error types for the session layer.

use township_protocol::ParticipantId;

/// Errors that can occur while creating sessions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The video provisioner could not issue a token.
    /// Carries the provisioner's own description of what went wrong.
    #[error("video token provisioning failed: {0}")]
    Provisioning(String),

    /// The participant already has a live session in this registry.
    #[error("participant {0} already has an active session")]
    AlreadyConnected(ParticipantId),
}
