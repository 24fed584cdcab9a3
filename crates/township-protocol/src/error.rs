//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding protocol types.
///
/// The inner `serde_json::Error` is kept so callers can see exactly
/// which field or byte offset was at fault.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields,
    /// or an unknown event `type` tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
