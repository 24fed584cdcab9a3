//! Room configuration.

use serde::{Deserialize, Serialize};

/// Metadata for a room instance.
///
/// None of this affects how participants or conversation areas behave;
/// it is what the room directory shows and what administrators edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Human-readable room name shown in listings. Must not be empty.
    pub friendly_name: String,

    /// Whether the room appears in the public room listing.
    pub is_public: bool,

    /// Advertised maximum occupancy. Reported in listings, not enforced.
    pub capacity: usize,

    /// Command channel size for the room actor. When the channel fills
    /// up, callers wait (bounded channel backpressure).
    pub channel_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            friendly_name: "Township".to_string(),
            is_public: true,
            capacity: 50,
            channel_size: 64,
        }
    }
}

impl RoomConfig {
    /// A default config with the given friendly name.
    pub fn named(friendly_name: impl Into<String>) -> Self {
        Self {
            friendly_name: friendly_name.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper to hide the room from public listings.
    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }
}
