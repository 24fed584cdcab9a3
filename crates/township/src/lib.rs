//! # Township
//!
//! Shared 2-D rooms where participants walk around and gather in
//! conversation areas.
//!
//! A [`RoomManager`](township_room::RoomManager) hosts rooms; each room is
//! an actor that owns its participants, sessions, and conversation areas
//! and tells its [`RoomListener`](township_room::RoomListener)s about
//! every change. Video access is delegated to an injected
//! [`VideoProvisioner`](township_session::VideoProvisioner).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use township::prelude::*;
//!
//! # async fn run() -> Result<(), TownshipError> {
//! let mut rooms = RoomManager::new(DevProvisioner);
//! let created = rooms.create_room(RoomConfig::named("Plaza"))?;
//! let room = rooms.room(created.room_id)?;
//!
//! let (listener, mut events) = ChannelListener::channel();
//! room.subscribe(listener).await?;
//! let session = room.add_participant(Participant::new("ada")).await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod telemetry;

pub use error::TownshipError;

pub mod prelude {
    //! Everything needed to host rooms, in one import.

    pub use crate::TownshipError;
    pub use township_protocol::{
        BoundingBox, Codec, ConversationArea, Direction, JsonCodec,
        Location, Participant, ParticipantId, RoomEvent, RoomId,
        RoomListEntry,
    };
    pub use township_room::{
        ChannelListener, ConversationAreaError, CreatedRoom, ListenerId,
        RoomConfig, RoomController, RoomError, RoomHandle, RoomInfo,
        RoomListener, RoomManager, TracingListener,
    };
    pub use township_session::{
        DevProvisioner, Session, SessionError, VideoProvisioner,
    };
}
