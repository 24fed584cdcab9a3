//! Integration tests for rooms driven through the manager and actor handles.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use township_protocol::{
    BoundingBox, ConversationArea, Location, Participant, ParticipantId,
    RoomEvent, RoomId,
};
use township_room::{
    ChannelListener, ConversationAreaError, RoomConfig, RoomError,
    RoomManager, TracingListener,
};
use township_session::{SessionError, VideoProvisioner};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Notify;

// =========================================================================
// Fake provisioners
// =========================================================================

/// Issues predictable tokens and counts calls. Can be switched to fail.
/// Clones share the same counters, so a test keeps one to inspect.
#[derive(Clone, Default)]
struct FakeProvisioner {
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl VideoProvisioner for FakeProvisioner {
    async fn get_token(
        &self,
        room_id: RoomId,
        participant_id: ParticipantId,
    ) -> Result<String, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SessionError::Provisioning("video service down".into()));
        }
        Ok(format!("video:{}:{}", room_id.0, participant_id.0))
    }
}

/// Takes a while to answer, to exercise concurrent joins.
struct SlowProvisioner;

impl VideoProvisioner for SlowProvisioner {
    async fn get_token(
        &self,
        _room_id: RoomId,
        participant_id: ParticipantId,
    ) -> Result<String, SessionError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(format!("slow:{}", participant_id.0))
    }
}

/// Holds every request until the test opens the gate. `started` fires
/// once a request is parked.
#[derive(Clone, Default)]
struct GatedProvisioner {
    started: Arc<Notify>,
    gate: Arc<Notify>,
}

impl VideoProvisioner for GatedProvisioner {
    async fn get_token(
        &self,
        _room_id: RoomId,
        participant_id: ParticipantId,
    ) -> Result<String, SessionError> {
        self.started.notify_one();
        self.gate.notified().await;
        Ok(format!("gated:{}", participant_id.0))
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn manager() -> (RoomManager<FakeProvisioner>, FakeProvisioner) {
    let fake = FakeProvisioner::default();
    (RoomManager::new(fake.clone()), fake)
}

fn square(label: &str, x: f64, y: f64, size: f64) -> ConversationArea {
    ConversationArea::new(label, "talk", BoundingBox::new(x, y, size, size))
}

fn drain(rx: &mut UnboundedReceiver<RoomEvent>) -> Vec<RoomEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// =========================================================================
// Participant lifecycle through the actor
// =========================================================================

#[tokio::test]
async fn test_add_participant_returns_session_with_video_token() {
    let (mut mgr, fake) = manager();
    let created = mgr.create_room(RoomConfig::named("Plaza")).unwrap();
    let room = mgr.room(created.room_id).unwrap();
    let participant = Participant::new("ada");
    let id = participant.id;

    let session = room.add_participant(participant).await.unwrap();

    assert_eq!(session.participant_id, id);
    assert_eq!(
        session.video_token,
        format!("video:{}:{}", created.room_id.0, id.0)
    );
    assert_eq!(fake.calls.load(Ordering::SeqCst), 1);

    let found = room.lookup_session(&session.session_token).await.unwrap();
    assert_eq!(found, Some(session));
}

#[tokio::test]
async fn test_provisioning_failure_leaves_room_unchanged() {
    let (mut mgr, fake) = manager();
    let created = mgr.create_room(RoomConfig::named("Plaza")).unwrap();
    let room = mgr.room(created.room_id).unwrap();
    let (listener, mut rx) = ChannelListener::channel();
    room.subscribe(listener).await.unwrap();
    room.add_participant(Participant::new("ada")).await.unwrap();
    let before = room.participants().await.unwrap();
    drain(&mut rx);

    fake.failing.store(true, Ordering::SeqCst);
    let result = room.add_participant(Participant::new("bob")).await;

    assert!(matches!(
        result,
        Err(RoomError::Provisioning(SessionError::Provisioning(_)))
    ));
    assert_eq!(room.participants().await.unwrap(), before);
    assert_eq!(room.get_info().await.unwrap().occupancy, 1);
    assert!(drain(&mut rx).is_empty(), "no join should be announced");
}

#[tokio::test]
async fn test_lookup_unknown_token_is_none() {
    let (mut mgr, _) = manager();
    let created = mgr.create_room(RoomConfig::default()).unwrap();
    let room = mgr.room(created.room_id).unwrap();

    assert_eq!(room.lookup_session("nope").await.unwrap(), None);
}

#[tokio::test]
async fn test_pending_provisioning_does_not_block_the_room() {
    let gated = GatedProvisioner::default();
    let mut mgr = RoomManager::new(gated.clone());
    let created = mgr.create_room(RoomConfig::named("Lobby")).unwrap();
    let room = mgr.room(created.room_id).unwrap();

    let joining = {
        let room = room.clone();
        tokio::spawn(async move {
            room.add_participant(Participant::new("ada")).await
        })
    };
    gated.started.notified().await;

    let still_serving = tokio::time::timeout(Duration::from_secs(1), async {
        room.add_conversation_area(square("bench", 0.0, 0.0, 10.0))
            .await
            .unwrap();
        room.participants().await.unwrap()
    })
    .await
    .expect("room stalled while a video token was pending");
    assert!(still_serving.is_empty());

    gated.gate.notify_one();
    let session = joining.await.unwrap().unwrap();
    assert!(session.video_token.starts_with("gated:"));
    assert_eq!(room.participants().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_replayed_old_session_leaves_current_one_alone() {
    let (mut mgr, _) = manager();
    let created = mgr.create_room(RoomConfig::named("Plaza")).unwrap();
    let room = mgr.room(created.room_id).unwrap();
    let participant = Participant::new("ada");

    let old = room.add_participant(participant.clone()).await.unwrap();
    room.remove_participant(old.clone()).await.unwrap();
    let current = room.add_participant(participant).await.unwrap();

    room.remove_participant(old).await.unwrap();

    assert_eq!(room.get_info().await.unwrap().occupancy, 1);
    assert_eq!(
        room.lookup_session(&current.session_token).await.unwrap(),
        Some(current)
    );
}

#[tokio::test]
async fn test_concurrent_joins_are_all_recorded_once() {
    let mut mgr = RoomManager::new(SlowProvisioner);
    let created = mgr.create_room(RoomConfig::named("Busy")).unwrap();
    let room = mgr.room(created.room_id).unwrap();

    let mut tasks = Vec::new();
    let mut ids = Vec::new();
    for i in 0..16 {
        let participant = Participant::new(format!("p{i}"));
        ids.push(participant.id);
        let room = room.clone();
        tasks.push(tokio::spawn(async move {
            room.add_participant(participant).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let participants = room.participants().await.unwrap();
    assert_eq!(participants.len(), ids.len());
    for id in ids {
        assert_eq!(
            participants.iter().filter(|p| p.id == id).count(),
            1,
            "{id} should appear exactly once"
        );
    }
}

// =========================================================================
// Conversation areas end to end
// =========================================================================

#[tokio::test]
async fn test_full_conversation_lifecycle_events() {
    let (mut mgr, _) = manager();
    let created = mgr.create_room(RoomConfig::named("Plaza")).unwrap();
    let room = mgr.room(created.room_id).unwrap();
    let (listener, mut rx) = ChannelListener::channel();
    room.subscribe(listener).await.unwrap();
    room.subscribe(TracingListener::new("plaza")).await.unwrap();

    // Ada stands where the area will be; Bob walks in later.
    let ada = Participant::new("ada").at(Location::at(1.0, 1.0));
    let ada_id = ada.id;
    let ada_session = room.add_participant(ada).await.unwrap();
    let bob = Participant::new("bob").at(Location::at(40.0, 40.0));
    let bob_id = bob.id;
    let bob_session = room.add_participant(bob).await.unwrap();

    room.add_conversation_area(square("fountain", 0.0, 0.0, 10.0))
        .await
        .unwrap();
    let areas = room.conversation_areas().await.unwrap();
    assert_eq!(areas[0].occupants, vec![ada_id]);

    room.update_participant_location(
        bob_id,
        Location::at(2.0, -2.0).in_conversation("fountain"),
    )
    .await
    .unwrap();

    room.remove_participant(ada_session).await.unwrap();
    room.remove_participant(bob_session).await.unwrap();

    let events = drain(&mut rx);
    let kinds: Vec<String> = events
        .iter()
        .map(|e| match e {
            RoomEvent::ParticipantJoined { participant } => {
                format!("joined {}", participant.user_name)
            }
            RoomEvent::ParticipantMoved { participant } => {
                format!("moved {}", participant.user_name)
            }
            RoomEvent::ParticipantDisconnected { participant } => {
                format!("left {}", participant.user_name)
            }
            RoomEvent::ConversationAreaUpdated { area } => {
                format!("updated {} ({})", area.label, area.occupants.len())
            }
            RoomEvent::ConversationAreaDestroyed { area } => {
                format!("destroyed {}", area.label)
            }
            RoomEvent::RoomDestroyed => "room destroyed".to_string(),
        })
        .collect();

    assert_eq!(
        kinds,
        vec![
            "joined ada",
            "joined bob",
            "updated fountain (1)",
            "updated fountain (2)",
            "moved bob",
            "updated fountain (1)",
            "left ada",
            "updated fountain (0)",
            "destroyed fountain",
            "left bob",
        ]
    );
    assert!(room.conversation_areas().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_area_validation_errors_surface_through_handle() {
    let (mut mgr, _) = manager();
    let created = mgr.create_room(RoomConfig::default()).unwrap();
    let room = mgr.room(created.room_id).unwrap();

    room.add_conversation_area(square("a", 0.0, 0.0, 10.0))
        .await
        .unwrap();
    room.add_conversation_area(square("b", 20.0, 0.0, 10.0))
        .await
        .unwrap();

    let overlap = room
        .add_conversation_area(square("c", 8.0, 0.0, 10.0))
        .await;
    assert!(matches!(
        overlap,
        Err(RoomError::ConversationArea(
            ConversationAreaError::Overlapping { .. }
        ))
    ));

    let dup = room
        .add_conversation_area(square("a", 100.0, 100.0, 10.0))
        .await;
    assert!(matches!(
        dup,
        Err(RoomError::ConversationArea(
            ConversationAreaError::DuplicateLabel(_)
        ))
    ));

    assert_eq!(room.conversation_areas().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_move_unknown_participant_is_an_error() {
    let (mut mgr, _) = manager();
    let created = mgr.create_room(RoomConfig::default()).unwrap();
    let room = mgr.room(created.room_id).unwrap();

    let result = room
        .update_participant_location(ParticipantId(987_654), Location::at(0.0, 0.0))
        .await;

    assert!(matches!(result, Err(RoomError::NotInRoom(..))));
}

#[tokio::test]
async fn test_unsubscribe_unknown_listener_is_noop() {
    let (mut mgr, _) = manager();
    let created = mgr.create_room(RoomConfig::default()).unwrap();
    let room = mgr.room(created.room_id).unwrap();
    let (listener, mut rx) = ChannelListener::channel();
    let id = room.subscribe(listener).await.unwrap();

    assert!(room.unsubscribe(id).await.unwrap());
    assert!(!room.unsubscribe(id).await.unwrap());

    room.add_participant(Participant::new("ada")).await.unwrap();
    assert!(drain(&mut rx).is_empty());
}

// =========================================================================
// RoomManager
// =========================================================================

#[tokio::test]
async fn test_create_room_returns_unique_ids_and_passwords() {
    let (mut mgr, _) = manager();
    let r1 = mgr.create_room(RoomConfig::named("One")).unwrap();
    let r2 = mgr.create_room(RoomConfig::named("Two")).unwrap();

    assert_ne!(r1.room_id, r2.room_id);
    assert_ne!(r1.update_password, r2.update_password);
    assert_eq!(mgr.room_count(), 2);
    assert!(mgr.room_ids().contains(&r1.room_id));
}

#[tokio::test]
async fn test_create_room_rejects_empty_name() {
    let (mut mgr, _) = manager();
    let result = mgr.create_room(RoomConfig::named(""));
    assert!(matches!(result, Err(RoomError::InvalidState(_))));
    assert_eq!(mgr.room_count(), 0);
}

#[tokio::test]
async fn test_room_not_found() {
    let (mgr, _) = manager();
    assert!(matches!(
        mgr.room(RoomId(999_999)),
        Err(RoomError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_public_rooms_hides_private_and_reports_occupancy() {
    let (mut mgr, _) = manager();
    let public = mgr.create_room(RoomConfig::named("Open")).unwrap();
    mgr.create_room(RoomConfig::named("Hidden").private()).unwrap();
    mgr.room(public.room_id)
        .unwrap()
        .add_participant(Participant::new("ada"))
        .await
        .unwrap();

    let listed = mgr.list_public_rooms().await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].room_id, public.room_id);
    assert_eq!(listed[0].friendly_name, "Open");
    assert_eq!(listed[0].current_occupancy, 1);
    assert_eq!(listed[0].maximum_occupancy, 50);
}

#[tokio::test]
async fn test_update_room_checks_password() {
    let (mut mgr, _) = manager();
    let created = mgr.create_room(RoomConfig::named("Open")).unwrap();

    let wrong = mgr
        .update_room(created.room_id, "guess", Some("Stolen".into()), None)
        .await;
    assert!(matches!(wrong, Err(RoomError::InvalidPassword(_))));

    mgr.update_room(
        created.room_id,
        &created.update_password,
        Some("Renamed".into()),
        Some(false),
    )
    .await
    .unwrap();

    let info = mgr.room(created.room_id).unwrap().get_info().await.unwrap();
    assert_eq!(info.friendly_name, "Renamed");
    assert!(!info.is_public);
    assert!(mgr.list_public_rooms().await.is_empty());
}

#[tokio::test]
async fn test_delete_room_with_wrong_password_keeps_room() {
    let (mut mgr, _) = manager();
    let created = mgr.create_room(RoomConfig::named("Open")).unwrap();

    let result = mgr.delete_room(created.room_id, "guess").await;

    assert!(matches!(result, Err(RoomError::InvalidPassword(_))));
    assert_eq!(mgr.room_count(), 1);
    assert!(mgr.room(created.room_id).unwrap().get_info().await.is_ok());
}

#[tokio::test]
async fn test_delete_room_notifies_and_stops_actor() {
    let (mut mgr, _) = manager();
    let created = mgr.create_room(RoomConfig::named("Open")).unwrap();
    let room = mgr.room(created.room_id).unwrap();
    let (listener, mut rx) = ChannelListener::channel();
    room.subscribe(listener).await.unwrap();

    mgr.delete_room(created.room_id, &created.update_password)
        .await
        .unwrap();

    assert_eq!(rx.recv().await, Some(RoomEvent::RoomDestroyed));
    assert_eq!(mgr.room_count(), 0);
    assert!(matches!(
        room.get_info().await,
        Err(RoomError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_rooms_are_independent() {
    let (mut mgr, _) = manager();
    let a_id = mgr.create_room(RoomConfig::named("A")).unwrap().room_id;
    let b_id = mgr.create_room(RoomConfig::named("B")).unwrap().room_id;
    let a = mgr.room(a_id).unwrap();
    let b = mgr.room(b_id).unwrap();

    a.add_participant(Participant::new("ada")).await.unwrap();
    a.add_conversation_area(square("fountain", 0.0, 0.0, 10.0))
        .await
        .unwrap();

    assert_eq!(b.get_info().await.unwrap().occupancy, 0);
    assert!(b.conversation_areas().await.unwrap().is_empty());
    b.add_conversation_area(square("fountain", 0.0, 0.0, 10.0))
        .await
        .unwrap();
}
