//! The video-provisioning seam.
//!
//! Township doesn't talk to a video service itself. Every room needs a
//! token per participant from *some* provider (a hosted video API, a
//! self-hosted SFU, a test fake), so the room layer is generic over the
//! [`VideoProvisioner`] trait and the provider is injected when the room
//! directory is built.

use township_protocol::{ParticipantId, RoomId};

use crate::{generate_token, SessionError};

/// Issues room-scoped video access tokens.
///
/// # Trait bounds
///
/// - `Send + Sync` → one provisioner is shared by every room and may be
///   called from many tasks at once, for different participants.
/// - `'static` → it lives as long as the room directory.
///
/// The call may be slow (it usually crosses the network). Rooms never
/// hold their state while waiting on it.
///
/// # Example
///
/// ```rust
/// use township_protocol::{ParticipantId, RoomId};
/// use township_session::{SessionError, VideoProvisioner};
///
/// /// Refuses every request, e.g. while the video service is down.
/// struct Offline;
///
/// impl VideoProvisioner for Offline {
///     async fn get_token(
///         &self,
///         _room_id: RoomId,
///         _participant_id: ParticipantId,
///     ) -> Result<String, SessionError> {
///         Err(SessionError::Provisioning("video service offline".into()))
///     }
/// }
/// ```
pub trait VideoProvisioner: Send + Sync + 'static {
    /// Returns a token that lets `participant_id` join the video channel
    /// of `room_id`.
    ///
    /// # Errors
    /// Returns [`SessionError::Provisioning`] if the provider refuses or
    /// cannot be reached.
    fn get_token(
        &self,
        room_id: RoomId,
        participant_id: ParticipantId,
    ) -> impl std::future::Future<Output = Result<String, SessionError>> + Send;
}

/// A provisioner for local development: mints random tokens and never
/// fails. The tokens are not accepted by any real video service.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevProvisioner;

impl VideoProvisioner for DevProvisioner {
    async fn get_token(
        &self,
        room_id: RoomId,
        participant_id: ParticipantId,
    ) -> Result<String, SessionError> {
        tracing::debug!(%room_id, %participant_id, "issuing dev video token");
        Ok(format!("dev-{}-{}-{}", room_id.0, participant_id.0, generate_token()))
    }
}
