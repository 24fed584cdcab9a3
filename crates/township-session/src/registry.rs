//! The session registry: every live session in one room.
//!
//! # Concurrency note
//!
//! `SessionRegistry` is a plain pair of `HashMap`s with no locking. It is
//! owned by a room controller, which in turn is owned by a single room
//! actor task, so every access is already serialized.

use std::collections::HashMap;

use rand::Rng;
use township_protocol::ParticipantId;

use crate::{Session, SessionError};

/// Tracks sessions by participant and by credential token.
///
/// The two maps are always kept in sync: every session appears in
/// `sessions` under its participant and in `tokens` under its
/// credential token.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// Sessions keyed by participant. A participant has at most one.
    sessions: HashMap<ParticipantId, Session>,

    /// Index from credential token to participant, so the transport can
    /// validate a request without scanning every session.
    tokens: HashMap<String, ParticipantId>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for `participant_id`, minting a fresh credential
    /// token and storing the given video token alongside it.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if the participant
    /// already has a session. The registry is unchanged in that case.
    pub fn create(
        &mut self,
        participant_id: ParticipantId,
        video_token: String,
    ) -> Result<&Session, SessionError> {
        if self.sessions.contains_key(&participant_id) {
            return Err(SessionError::AlreadyConnected(participant_id));
        }

        let session_token = generate_token();
        self.tokens.insert(session_token.clone(), participant_id);

        tracing::debug!(%participant_id, "session created");

        let session = self.sessions.entry(participant_id).or_insert(Session {
            participant_id,
            session_token,
            video_token,
        });
        Ok(session)
    }

    /// Removes a participant's session, returning it if one existed.
    pub fn remove(&mut self, participant_id: ParticipantId) -> Option<Session> {
        let session = self.sessions.remove(&participant_id)?;
        self.tokens.remove(&session.session_token);
        tracing::debug!(%participant_id, "session removed");
        Some(session)
    }

    /// Finds the session that owns `token`. Exact match only.
    pub fn lookup(&self, token: &str) -> Option<&Session> {
        let participant_id = self.tokens.get(token)?;
        self.sessions.get(participant_id)
    }

    /// Looks up a session by participant.
    pub fn get(&self, participant_id: &ParticipantId) -> Option<&Session> {
        self.sessions.get(participant_id)
    }

    /// Returns the number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Generates an unguessable token: 16 random bytes as 32 lowercase hex
/// characters.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
