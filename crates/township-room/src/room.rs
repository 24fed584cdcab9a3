//! Room actor: an isolated Tokio task that owns a [`RoomController`].
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Commands are applied one at a time in the
//! order they arrive, so every operation sees a consistent room.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use township_protocol::{ConversationArea, Location, Participant, ParticipantId, RoomId};
use township_session::{Session, VideoProvisioner};

use crate::{ListenerId, RoomConfig, RoomController, RoomError, RoomInfo, RoomListener};

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in each variant is the reply channel: the caller
/// sends a command and waits for the response on it.
pub(crate) enum RoomCommand {
    /// Admit a participant whose video token is already issued.
    Join {
        participant: Participant,
        video_token: String,
        reply: oneshot::Sender<Result<Session, RoomError>>,
    },

    /// Remove a participant and their session.
    Leave {
        session: Session,
        reply: oneshot::Sender<()>,
    },

    /// Apply a movement update.
    Move {
        participant_id: ParticipantId,
        location: Location,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Create a conversation area.
    AddArea {
        area: ConversationArea,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    Subscribe {
        listener: Box<dyn RoomListener>,
        reply: oneshot::Sender<ListenerId>,
    },

    Unsubscribe {
        id: ListenerId,
        reply: oneshot::Sender<bool>,
    },

    LookupSession {
        token: String,
        reply: oneshot::Sender<Option<Session>>,
    },

    Participants {
        reply: oneshot::Sender<Vec<Participant>>,
    },

    ConversationAreas {
        reply: oneshot::Sender<Vec<ConversationArea>>,
    },

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    /// Edit room metadata, guarded by the update password.
    Update {
        password: String,
        friendly_name: Option<String>,
        is_public: Option<bool>,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    VerifyPassword {
        password: String,
        reply: oneshot::Sender<bool>,
    },

    /// Notify listeners and stop the actor.
    Destroy { reply: oneshot::Sender<()> },
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone: an `mpsc::Sender` plus a shared provisioner.
pub struct RoomHandle<P: VideoProvisioner> {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
    provisioner: Arc<P>,
}

impl<P: VideoProvisioner> Clone for RoomHandle<P> {
    fn clone(&self) -> Self {
        Self {
            room_id: self.room_id,
            sender: self.sender.clone(),
            provisioner: Arc::clone(&self.provisioner),
        }
    }
}

impl<P: VideoProvisioner> RoomHandle<P> {
    /// Returns the room's unique ID.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Sends a command built around a fresh reply channel and waits for
    /// the answer.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Admits a participant and returns their new session.
    ///
    /// The video token is requested first, from this task; the room is
    /// only contacted once it has been issued. If provisioning fails the
    /// room never hears about the participant.
    pub async fn add_participant(
        &self,
        participant: Participant,
    ) -> Result<Session, RoomError> {
        let video_token = self
            .provisioner
            .get_token(self.room_id, participant.id)
            .await
            .map_err(|e| {
                tracing::warn!(
                    room_id = %self.room_id,
                    participant_id = %participant.id,
                    error = %e,
                    "video token provisioning failed"
                );
                RoomError::Provisioning(e)
            })?;

        self.request(|reply| RoomCommand::Join {
            participant,
            video_token,
            reply,
        })
        .await?
    }

    /// Removes a participant. Unknown sessions are ignored.
    pub async fn remove_participant(&self, session: Session) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Leave { session, reply }).await
    }

    /// Applies a movement update for a participant.
    pub async fn update_participant_location(
        &self,
        participant_id: ParticipantId,
        location: Location,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Move {
            participant_id,
            location,
            reply,
        })
        .await?
    }

    /// Creates a conversation area.
    ///
    /// Validation failures come back as [`RoomError::ConversationArea`].
    pub async fn add_conversation_area(
        &self,
        area: ConversationArea,
    ) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::AddArea { area, reply })
            .await?
    }

    /// Registers a listener; it is notified after all earlier ones.
    pub async fn subscribe(
        &self,
        listener: impl RoomListener,
    ) -> Result<ListenerId, RoomError> {
        let listener: Box<dyn RoomListener> = Box::new(listener);
        self.request(|reply| RoomCommand::Subscribe { listener, reply })
            .await
    }

    /// Cancels a subscription. Returns `false` for unknown ids.
    pub async fn unsubscribe(&self, id: ListenerId) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::Unsubscribe { id, reply })
            .await
    }

    /// Finds the session owning a credential token.
    pub async fn lookup_session(
        &self,
        token: &str,
    ) -> Result<Option<Session>, RoomError> {
        let token = token.to_string();
        self.request(|reply| RoomCommand::LookupSession { token, reply })
            .await
    }

    /// Returns a copy of the current participant list.
    pub async fn participants(&self) -> Result<Vec<Participant>, RoomError> {
        self.request(|reply| RoomCommand::Participants { reply }).await
    }

    /// Returns a copy of the current conversation areas.
    pub async fn conversation_areas(
        &self,
    ) -> Result<Vec<ConversationArea>, RoomError> {
        self.request(|reply| RoomCommand::ConversationAreas { reply })
            .await
    }

    /// Requests the current room info.
    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::GetInfo { reply }).await
    }

    /// Edits room metadata if `password` matches.
    pub async fn update(
        &self,
        password: &str,
        friendly_name: Option<String>,
        is_public: Option<bool>,
    ) -> Result<(), RoomError> {
        let password = password.to_string();
        self.request(|reply| RoomCommand::Update {
            password,
            friendly_name,
            is_public,
            reply,
        })
        .await?
    }

    pub async fn verify_password(&self, password: &str) -> Result<bool, RoomError> {
        let password = password.to_string();
        self.request(|reply| RoomCommand::VerifyPassword { password, reply })
            .await
    }

    /// Notifies every listener that the room is gone and stops the actor.
    /// Later calls on any handle return [`RoomError::Unavailable`].
    pub async fn destroy(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Destroy { reply }).await
    }
}

/// The actor loop state. Runs inside a Tokio task.
struct RoomActor {
    controller: RoomController,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until destroyed or every
    /// handle is dropped.
    async fn run(mut self) {
        let room_id = self.controller.room_id();
        tracing::info!(%room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            if self.handle(cmd).is_break() {
                break;
            }
        }

        tracing::info!(%room_id, "room actor stopped");
    }

    fn handle(&mut self, cmd: RoomCommand) -> std::ops::ControlFlow<()> {
        let room = &mut self.controller;
        match cmd {
            RoomCommand::Join {
                participant,
                video_token,
                reply,
            } => {
                let _ = reply.send(room.add_participant(participant, video_token));
            }
            RoomCommand::Leave { session, reply } => {
                room.remove_participant(&session);
                let _ = reply.send(());
            }
            RoomCommand::Move {
                participant_id,
                location,
                reply,
            } => {
                let _ = reply
                    .send(room.update_participant_location(participant_id, location));
            }
            RoomCommand::AddArea { area, reply } => {
                let _ = reply.send(room.add_conversation_area(area).map_err(RoomError::from));
            }
            RoomCommand::Subscribe { listener, reply } => {
                let _ = reply.send(room.subscribe(listener));
            }
            RoomCommand::Unsubscribe { id, reply } => {
                let _ = reply.send(room.unsubscribe(id));
            }
            RoomCommand::LookupSession { token, reply } => {
                let _ = reply.send(room.lookup_session(&token).cloned());
            }
            RoomCommand::Participants { reply } => {
                let _ = reply.send(room.participants().to_vec());
            }
            RoomCommand::ConversationAreas { reply } => {
                let _ = reply.send(room.conversation_areas().to_vec());
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(room.info());
            }
            RoomCommand::Update {
                password,
                friendly_name,
                is_public,
                reply,
            } => {
                let _ = reply.send(room.update_metadata(&password, friendly_name, is_public));
            }
            RoomCommand::VerifyPassword { password, reply } => {
                let _ = reply.send(room.check_password(&password));
            }
            RoomCommand::Destroy { reply } => {
                room.destroy();
                let _ = reply.send(());
                return std::ops::ControlFlow::Break(());
            }
        }
        std::ops::ControlFlow::Continue(())
    }
}

/// Spawns a new room actor task and returns a handle to it, together
/// with the room's update password.
pub(crate) fn spawn_room<P: VideoProvisioner>(
    room_id: RoomId,
    config: RoomConfig,
    provisioner: Arc<P>,
) -> (RoomHandle<P>, String) {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let controller = RoomController::new(room_id, config);
    let password = controller.update_password().to_string();

    let actor = RoomActor {
        controller,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    let handle = RoomHandle {
        room_id,
        sender: tx,
        provisioner,
    };
    (handle, password)
}
