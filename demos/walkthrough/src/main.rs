//! A scripted afternoon in a Township room.
//!
//! Run with `RUST_LOG=debug cargo run -p walkthrough` to see the room's
//! own logs alongside the events a client would receive.

use township::prelude::*;

#[tokio::main]
async fn main() -> Result<(), TownshipError> {
    township::telemetry::init("info");

    let mut rooms = RoomManager::new(DevProvisioner);
    let created = rooms.create_room(RoomConfig::named("Town Square"))?;
    let room = rooms.room(created.room_id)?;

    let (listener, mut events) = ChannelListener::channel();
    room.subscribe(listener).await?;
    room.subscribe(TracingListener::new("Town Square")).await?;

    // Two people arrive: one by the fountain, one at the gate.
    let ada = Participant::new("ada").at(Location::at(2.0, 1.0));
    let ada_id = ada.id;
    let ada_session = room.add_participant(ada).await?;
    let bob = Participant::new("bob").at(Location::at(60.0, -30.0));
    let bob_id = bob.id;
    let bob_session = room.add_participant(bob).await?;
    tracing::info!(session = %ada_session.session_token, "ada's credential");

    // The fountain becomes a conversation area; ada is already inside.
    room.add_conversation_area(ConversationArea::new(
        "fountain",
        "weekend plans",
        BoundingBox::new(0.0, 0.0, 20.0, 20.0),
    ))
    .await?;

    // A second area flush against the first is fine; an overlapping one is not.
    room.add_conversation_area(ConversationArea::new(
        "bench",
        "reading corner",
        BoundingBox::new(20.0, 0.0, 20.0, 20.0),
    ))
    .await?;
    if let Err(e) = room
        .add_conversation_area(ConversationArea::new(
            "kiosk",
            "snacks",
            BoundingBox::new(5.0, 5.0, 10.0, 10.0),
        ))
        .await
    {
        tracing::info!(error = %e, "kiosk refused");
    }

    // Bob walks over and joins the fountain conversation, ada wanders off.
    room.update_participant_location(
        bob_id,
        Location::at(-3.0, 4.0).in_conversation("fountain"),
    )
    .await?;
    room.update_participant_location(ada_id, Location::at(-40.0, 40.0))
        .await?;

    room.remove_participant(ada_session).await?;
    room.remove_participant(bob_session).await?;

    for entry in rooms.list_public_rooms().await {
        tracing::info!(
            room_id = %entry.room_id,
            name = %entry.friendly_name,
            occupancy = entry.current_occupancy,
            "listed"
        );
    }

    rooms
        .delete_room(created.room_id, &created.update_password)
        .await?;

    let codec = JsonCodec;
    while let Some(event) = events.recv().await {
        let bytes = codec.encode(&event)?;
        println!("{}", String::from_utf8_lossy(&bytes));
    }

    Ok(())
}
