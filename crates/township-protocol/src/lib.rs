//! Shared vocabulary for Township rooms.
//!
//! This crate defines the types every other layer speaks:
//!
//! - **Identity** ([`ParticipantId`], [`RoomId`]): newtype wrappers so
//!   the two can never be confused.
//! - **Space** ([`Location`], [`Direction`], [`BoundingBox`]): where a
//!   participant stands and how conversation areas are shaped.
//! - **Domain records** ([`Participant`], [`ConversationArea`]): the
//!   state a room controller owns and hands to listeners.
//! - **Events** ([`RoomEvent`], [`RoomListEntry`]): serializable forms of
//!   room notifications and directory listings.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those types become
//!   bytes for whatever transport sits above.
//!
//! ```text
//! Room layer (controller, listeners) → Protocol (types, events) → bytes
//! ```

mod codec;
mod error;
pub mod geometry;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use geometry::{BoundingBox, Bounds, Corners, Point};
pub use types::{
    ConversationArea, Direction, Location, Participant, ParticipantId,
    RoomEvent, RoomId, RoomListEntry,
};
