//! The `RoomListener` trait and the registry that fans events out to it.
//!
//! Whatever needs to react to a room (a socket forwarding updates to a
//! browser, an audit log, a test recorder) implements [`RoomListener`]
//! and subscribes. The controller calls every listener, synchronously and
//! in subscription order, after each change it makes.

use std::panic::{self, AssertUnwindSafe};

use tokio::sync::mpsc;
use township_protocol::{ConversationArea, Participant, RoomEvent};

/// An observer of room state changes.
///
/// Every method has a no-op default so implementors only write the
/// callbacks they care about.
///
/// Listeners run inside the room actor. A slow listener delays the room;
/// a panicking listener is caught and logged, and the remaining listeners
/// are still notified.
pub trait RoomListener: Send + 'static {
    /// A participant was admitted to the room.
    fn on_participant_joined(&self, _participant: &Participant) {}

    /// A participant's location changed.
    fn on_participant_moved(&self, _participant: &Participant) {}

    /// A participant left the room.
    fn on_participant_disconnected(&self, _participant: &Participant) {}

    /// A conversation area was created or its occupants changed.
    fn on_conversation_area_updated(&self, _area: &ConversationArea) {}

    /// A conversation area was removed from the room.
    fn on_conversation_area_destroyed(&self, _area: &ConversationArea) {}

    /// The room is being torn down.
    fn on_room_destroyed(&self) {}
}

/// Identifies a subscription so it can be cancelled later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The listeners of one room, in subscription order.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<(ListenerId, Box<dyn RoomListener>)>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener to the end of the notification order.
    pub fn subscribe(&mut self, listener: Box<dyn RoomListener>) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` (and does nothing) if the id
    /// is unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Calls `notify` once per listener, in subscription order.
    ///
    /// Each call is isolated: if a listener panics, the panic is logged
    /// and the next listener is called anyway.
    pub fn notify(&self, event: &'static str, notify: impl Fn(&dyn RoomListener)) {
        for (id, listener) in &self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                notify(listener.as_ref());
            }));
            if outcome.is_err() {
                tracing::warn!(
                    listener = id.0,
                    event,
                    "listener panicked, continuing with the rest"
                );
            }
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Built-in listeners
// ---------------------------------------------------------------------------

/// Channel sender that receives a room's events.
pub type EventSender = mpsc::UnboundedSender<RoomEvent>;

/// Forwards every notification as a [`RoomEvent`] on a channel.
///
/// This is the bridge to a transport: the connection task holds the
/// receiver, encodes each event, and writes it to the socket. Events
/// are silently dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: EventSender,
}

impl ChannelListener {
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }

    /// Creates a listener together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RoomEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: RoomEvent) {
        let _ = self.sender.send(event);
    }
}

impl RoomListener for ChannelListener {
    fn on_participant_joined(&self, participant: &Participant) {
        self.send(RoomEvent::ParticipantJoined {
            participant: participant.clone(),
        });
    }

    fn on_participant_moved(&self, participant: &Participant) {
        self.send(RoomEvent::ParticipantMoved {
            participant: participant.clone(),
        });
    }

    fn on_participant_disconnected(&self, participant: &Participant) {
        self.send(RoomEvent::ParticipantDisconnected {
            participant: participant.clone(),
        });
    }

    fn on_conversation_area_updated(&self, area: &ConversationArea) {
        self.send(RoomEvent::ConversationAreaUpdated { area: area.clone() });
    }

    fn on_conversation_area_destroyed(&self, area: &ConversationArea) {
        self.send(RoomEvent::ConversationAreaDestroyed { area: area.clone() });
    }

    fn on_room_destroyed(&self) {
        self.send(RoomEvent::RoomDestroyed);
    }
}

/// Logs every notification through `tracing` at debug level.
#[derive(Debug, Clone, Default)]
pub struct TracingListener {
    room: String,
}

impl TracingListener {
    /// `room` is attached to every log line as the `room` field.
    pub fn new(room: impl Into<String>) -> Self {
        Self { room: room.into() }
    }
}

impl RoomListener for TracingListener {
    fn on_participant_joined(&self, participant: &Participant) {
        tracing::debug!(room = %self.room, participant_id = %participant.id, user = %participant.user_name, "participant joined");
    }

    fn on_participant_moved(&self, participant: &Participant) {
        tracing::debug!(
            room = %self.room,
            participant_id = %participant.id,
            x = participant.location.x,
            y = participant.location.y,
            "participant moved"
        );
    }

    fn on_participant_disconnected(&self, participant: &Participant) {
        tracing::debug!(room = %self.room, participant_id = %participant.id, "participant disconnected");
    }

    fn on_conversation_area_updated(&self, area: &ConversationArea) {
        tracing::debug!(
            room = %self.room,
            label = %area.label,
            occupants = area.occupants.len(),
            "conversation area updated"
        );
    }

    fn on_conversation_area_destroyed(&self, area: &ConversationArea) {
        tracing::debug!(room = %self.room, label = %area.label, "conversation area destroyed");
    }

    fn on_room_destroyed(&self) {
        tracing::debug!(room = %self.room, "room destroyed");
    }
}
