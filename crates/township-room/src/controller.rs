//! The room controller: all state of one room and every operation on it.
//!
//! The controller is synchronous and owns its collections outright. The
//! room actor ([`crate::RoomHandle`]) wraps it so that operations from
//! many tasks are applied one at a time; tests drive it directly.

use township_protocol::{
    ConversationArea, Location, Participant, ParticipantId, RoomId,
};
use township_session::{generate_token, Session, SessionRegistry};

use crate::{
    ConversationAreaError, ListenerId, ListenerRegistry, RoomConfig,
    RoomError, RoomListener,
};

/// A snapshot of room metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub friendly_name: String,
    pub is_public: bool,
    /// Number of participants currently in the room.
    pub occupancy: usize,
    pub capacity: usize,
}

/// Owns one room's participants, sessions, conversation areas, and
/// listeners.
#[derive(Debug)]
pub struct RoomController {
    room_id: RoomId,
    config: RoomConfig,
    update_password: String,
    participants: Vec<Participant>,
    sessions: SessionRegistry,
    areas: Vec<ConversationArea>,
    listeners: ListenerRegistry,
}

impl RoomController {
    /// Creates an empty room with a freshly generated update password.
    pub fn new(room_id: RoomId, config: RoomConfig) -> Self {
        Self {
            room_id,
            config,
            update_password: generate_token(),
            participants: Vec::new(),
            sessions: SessionRegistry::new(),
            areas: Vec::new(),
            listeners: ListenerRegistry::new(),
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn friendly_name(&self) -> &str {
        &self.config.friendly_name
    }

    pub fn is_public(&self) -> bool {
        self.config.is_public
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// The administrative password required to edit or delete the room.
    pub fn update_password(&self) -> &str {
        &self.update_password
    }

    pub fn check_password(&self, password: &str) -> bool {
        self.update_password == password
    }

    pub fn occupancy(&self) -> usize {
        self.participants.len()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn conversation_areas(&self) -> &[ConversationArea] {
        &self.areas
    }

    pub fn conversation_area(&self, label: &str) -> Option<&ConversationArea> {
        self.areas.iter().find(|a| a.label == label)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id,
            friendly_name: self.config.friendly_name.clone(),
            is_public: self.config.is_public,
            occupancy: self.participants.len(),
            capacity: self.config.capacity,
        }
    }

    // -----------------------------------------------------------------
    // Metadata
    // -----------------------------------------------------------------

    /// Applies a metadata update after checking the password.
    ///
    /// Nothing is changed unless every part of the update is valid.
    pub fn update_metadata(
        &mut self,
        password: &str,
        friendly_name: Option<String>,
        is_public: Option<bool>,
    ) -> Result<(), RoomError> {
        if !self.check_password(password) {
            return Err(RoomError::InvalidPassword(self.room_id));
        }
        if friendly_name.as_deref().is_some_and(str::is_empty) {
            return Err(RoomError::InvalidState(
                "friendly name must not be empty".into(),
            ));
        }
        if let Some(name) = friendly_name {
            self.config.friendly_name = name;
        }
        if let Some(public) = is_public {
            self.config.is_public = public;
        }
        tracing::info!(
            room_id = %self.room_id,
            friendly_name = %self.config.friendly_name,
            is_public = self.config.is_public,
            "room metadata updated"
        );
        Ok(())
    }

    // -----------------------------------------------------------------
    // Participants and sessions
    // -----------------------------------------------------------------

    /// Admits a participant whose video token has already been issued.
    ///
    /// Registers the session and the participant, then notifies every
    /// listener of the join. Any `active_area` the caller set is cleared:
    /// membership starts empty and only the room assigns it.
    pub fn add_participant(
        &mut self,
        mut participant: Participant,
        video_token: String,
    ) -> Result<Session, RoomError> {
        let participant_id = participant.id;
        let room_id = self.room_id;
        let session = self
            .sessions
            .create(participant_id, video_token)
            .map_err(|_| RoomError::AlreadyInRoom(participant_id, room_id))?
            .clone();

        participant.active_area = None;
        self.participants.push(participant);
        tracing::info!(
            room_id = %self.room_id,
            %participant_id,
            participants = self.participants.len(),
            "participant joined"
        );

        if let Some(joined) = self.participants.last() {
            self.listeners
                .notify("participant_joined", |l| l.on_participant_joined(joined));
        }
        Ok(session)
    }

    /// Removes a participant and their session.
    ///
    /// If they occupied a conversation area, they are removed from it
    /// (area updated, and destroyed if it is now empty). The disconnect
    /// notification is always sent. Sessions that are no longer live,
    /// including an old session of a participant who has since rejoined,
    /// are ignored.
    pub fn remove_participant(&mut self, session: &Session) {
        let participant_id = session.participant_id;
        if self.sessions.get(&participant_id) != Some(session) {
            tracing::debug!(
                room_id = %self.room_id,
                %participant_id,
                "remove for stale or unknown session, ignoring"
            );
            return;
        }
        self.sessions.remove(participant_id);

        let Some(index) =
            self.participants.iter().position(|p| p.id == participant_id)
        else {
            tracing::debug!(
                room_id = %self.room_id,
                %participant_id,
                "remove for unknown participant, ignoring"
            );
            return;
        };
        let participant = self.participants.remove(index);

        if let Some(label) = participant.active_area.as_deref() {
            self.leave_area(participant_id, label, true);
        }

        tracing::info!(
            room_id = %self.room_id,
            %participant_id,
            participants = self.participants.len(),
            "participant left"
        );
        self.listeners.notify("participant_disconnected", |l| {
            l.on_participant_disconnected(&participant)
        });
    }

    /// Finds the session owning a credential token.
    pub fn lookup_session(&self, token: &str) -> Option<&Session> {
        self.sessions.lookup(token)
    }

    // -----------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------

    /// Moves a participant, updating conversation-area membership when
    /// the reported conversation label changes.
    ///
    /// Notifications go out in this order: old area updated, new area
    /// updated, participant moved. An area emptied here is kept.
    pub fn update_participant_location(
        &mut self,
        participant_id: ParticipantId,
        location: Location,
    ) -> Result<(), RoomError> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or(RoomError::NotInRoom(participant_id, self.room_id))?;

        let current = self.participants[index].active_area.clone();
        if current != location.conversation_label {
            if let Some(old) = current.as_deref() {
                self.participants[index].active_area = None;
                self.leave_area(participant_id, old, false);
            }
            if let Some(new) = location.conversation_label.as_deref() {
                if let Some(area) =
                    self.areas.iter_mut().find(|a| a.label == new)
                {
                    area.add_occupant(participant_id);
                    self.participants[index].active_area =
                        Some(area.label.clone());
                    tracing::debug!(
                        room_id = %self.room_id,
                        %participant_id,
                        label = %area.label,
                        "participant entered conversation area"
                    );
                    let area = &*area;
                    self.listeners.notify("conversation_area_updated", |l| {
                        l.on_conversation_area_updated(area)
                    });
                }
            }
        }

        let participant = &mut self.participants[index];
        participant.location = location;
        let participant = &*participant;
        self.listeners
            .notify("participant_moved", |l| l.on_participant_moved(participant));
        Ok(())
    }

    /// Drops `participant_id` from the area labelled `label` and notifies
    /// the update. With `destroy_if_empty`, an area left without
    /// occupants is removed from the room and its destruction notified.
    fn leave_area(
        &mut self,
        participant_id: ParticipantId,
        label: &str,
        destroy_if_empty: bool,
    ) {
        let Some(index) = self.areas.iter().position(|a| a.label == label)
        else {
            return;
        };
        self.areas[index].remove_occupant(participant_id);
        tracing::debug!(
            room_id = %self.room_id,
            %participant_id,
            label,
            "participant left conversation area"
        );
        let area = &self.areas[index];
        self.listeners.notify("conversation_area_updated", |l| {
            l.on_conversation_area_updated(area)
        });

        if destroy_if_empty && self.areas[index].is_empty() {
            let area = self.areas.remove(index);
            tracing::info!(
                room_id = %self.room_id,
                label = %area.label,
                "conversation area destroyed"
            );
            self.listeners.notify("conversation_area_destroyed", |l| {
                l.on_conversation_area_destroyed(&area)
            });
        }
    }

    // -----------------------------------------------------------------
    // Conversation areas
    // -----------------------------------------------------------------

    /// Creates a conversation area and pulls in everyone standing in it.
    ///
    /// The candidate is validated in full before anything changes. Any
    /// occupants it carries are discarded; occupants are recomputed from
    /// participant positions (strictly inside the rectangle).
    ///
    /// A participant pulled in here only has `active_area` overwritten. If
    /// they were still listed in another area, they stay in its occupant
    /// list, and that area will not empty out (or be destroyed) when they
    /// disconnect.
    pub fn add_conversation_area(
        &mut self,
        candidate: ConversationArea,
    ) -> Result<(), ConversationAreaError> {
        if let Err(reason) = self.validate_area(&candidate) {
            tracing::debug!(
                room_id = %self.room_id,
                label = %candidate.label,
                %reason,
                "conversation area rejected"
            );
            return Err(reason);
        }

        let mut area = candidate;
        area.occupants.clear();
        for participant in &mut self.participants {
            if area.bounding_box.contains(participant.location.point()) {
                area.add_occupant(participant.id);
                participant.active_area = Some(area.label.clone());
            }
        }

        tracing::info!(
            room_id = %self.room_id,
            label = %area.label,
            occupants = area.occupants.len(),
            "conversation area created"
        );
        self.listeners.notify("conversation_area_updated", |l| {
            l.on_conversation_area_updated(&area)
        });
        self.areas.push(area);
        Ok(())
    }

    fn validate_area(
        &self,
        candidate: &ConversationArea,
    ) -> Result<(), ConversationAreaError> {
        if candidate.label.is_empty() {
            return Err(ConversationAreaError::EmptyLabel);
        }
        if candidate.topic.is_empty() {
            return Err(ConversationAreaError::EmptyTopic);
        }
        if self.conversation_area(&candidate.label).is_some() {
            return Err(ConversationAreaError::DuplicateLabel(
                candidate.label.clone(),
            ));
        }
        let bounds = candidate.bounding_box.bounds();
        if let Some(existing) = self
            .areas
            .iter()
            .find(|a| a.bounding_box.bounds().overlaps(&bounds))
        {
            return Err(ConversationAreaError::Overlapping {
                label: candidate.label.clone(),
                existing: existing.label.clone(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Listeners and lifecycle
    // -----------------------------------------------------------------

    pub fn subscribe(&mut self, listener: Box<dyn RoomListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Tells every listener the room is going away. Room state is left
    /// as is; dropping the controller is up to its owner.
    pub fn destroy(&self) {
        tracing::info!(room_id = %self.room_id, "room destroyed");
        self.listeners
            .notify("room_destroyed", |l| l.on_room_destroyed());
    }
}
