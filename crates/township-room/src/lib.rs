//! Room controllers for Township.
//!
//! Each room runs as an isolated Tokio task (actor model) that exclusively
//! owns a [`RoomController`]: its participants, sessions, conversation
//! areas, and listeners. Operations on one room run one at a time, in the
//! order they arrive; different rooms share nothing.
//!
//! # Key types
//!
//! - [`RoomController`]: the room state and every operation on it
//! - [`RoomListener`]: the observer trait notified of every change
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomManager`]: creates, lists, updates, and deletes rooms
//! - [`RoomConfig`]: room metadata (name, listing, capacity)

mod config;
mod controller;
mod error;
mod listener;
mod manager;
mod room;

pub use config::RoomConfig;
pub use controller::{RoomController, RoomInfo};
pub use error::{ConversationAreaError, RoomError};
pub use listener::{
    ChannelListener, EventSender, ListenerId, ListenerRegistry,
    RoomListener, TracingListener,
};
pub use manager::{CreatedRoom, RoomManager};
pub use room::RoomHandle;
