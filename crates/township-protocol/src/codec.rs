//! Codec trait and implementations for serializing room events.
//!
//! The room layer never touches bytes. A transport that wants to push
//! [`RoomEvent`](crate::RoomEvent)s to clients picks a [`Codec`] and
//! encodes whatever the listeners hand it. [`JsonCodec`] is the only
//! implementation today.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` so a single codec value can be shared by
/// every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use township_protocol::{Codec, JsonCodec, RoomEvent};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&RoomEvent::RoomDestroyed).unwrap();
/// assert_eq!(bytes, br#"{"type":"RoomDestroyed"}"#);
///
/// let decoded: RoomEvent = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, RoomEvent::RoomDestroyed);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
