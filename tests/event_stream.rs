//! The push-notification surface: mutation events reach live subscribers,
//! idle listeners get heartbeats, and a gone subscriber never blocks a
//! mutation.

mod common;

use common::{ctx, rome_draft, seeded_store};
use std::time::Duration;
use travel_catalog::{DestinationChanges, FrameKind};

const WAIT: Duration = Duration::from_millis(100);
const IDLE: Duration = Duration::from_millis(10);

/// One update while subscribed delivers exactly one `updated` frame
/// carrying the new price.
#[tokio::test]
async fn an_update_delivers_exactly_one_updated_frame() {
    let store = seeded_store();
    let c = ctx();

    let rome = store.create(rome_draft(), &c).await.unwrap();

    let mut sub = store.events().subscribe();
    let greeting = sub.next_frame(WAIT).await.unwrap();
    assert_eq!(greeting.kind, FrameKind::Connected);

    store
        .patch(rome.id(), DestinationChanges::price(165.0), None, &c)
        .await
        .unwrap();

    let frame = sub.next_frame(WAIT).await.unwrap();
    assert_eq!(frame.kind, FrameKind::Updated);
    let payload = frame.data.unwrap();
    assert_eq!(payload.id, rome.id());
    assert_eq!(payload.price_per_day, Some(165.0));

    // Exactly one: the next thing on an idle stream is a heartbeat.
    let idle = sub.next_frame(IDLE).await.unwrap();
    assert_eq!(idle.kind, FrameKind::Heartbeat);
}

#[tokio::test]
async fn each_mutation_kind_produces_its_frame() {
    let store = seeded_store();
    let c = ctx();

    let mut sub = store.events().subscribe();
    sub.next_frame(WAIT).await.unwrap(); // connected

    let rome = store.create(rome_draft(), &c).await.unwrap();
    let created = sub.next_frame(WAIT).await.unwrap();
    assert_eq!(created.kind, FrameKind::Created);
    let payload = created.data.unwrap();
    assert_eq!(payload.country.as_deref(), Some("Italy"));
    assert_eq!(payload.price_per_day, Some(140.0));

    store
        .replace(rome.id(), DestinationChanges::price(150.0), None, &c)
        .await
        .unwrap();
    assert_eq!(sub.next_frame(WAIT).await.unwrap().kind, FrameKind::Updated);

    store.delete(rome.id(), None, &c).await.unwrap();
    let deleted = sub.next_frame(WAIT).await.unwrap();
    assert_eq!(deleted.kind, FrameKind::Deleted);
    let tombstone = deleted.data.unwrap();
    assert_eq!(tombstone.id, rome.id());
    assert_eq!(tombstone.name, "Rome");
    // Deleted events carry the minimal projection only.
    assert!(tombstone.country.is_none());
    assert!(tombstone.price_per_day.is_none());
}

#[tokio::test]
async fn rejected_mutations_publish_nothing() {
    let store = seeded_store();
    let c = ctx();

    let mut sub = store.events().subscribe();
    sub.next_frame(WAIT).await.unwrap(); // connected

    // Conflict on create, NotFound on update: no event either way.
    store.create(rome_draft(), &c).await.unwrap();
    sub.next_frame(WAIT).await.unwrap(); // created (the successful one)

    store
        .create(rome_draft(), &c)
        .await
        .expect_err("duplicate natural key");
    store
        .patch(99, DestinationChanges::price(1.0), None, &c)
        .await
        .expect_err("missing id");

    let idle = sub.next_frame(IDLE).await.unwrap();
    assert_eq!(idle.kind, FrameKind::Heartbeat);
}

#[tokio::test]
async fn a_departed_subscriber_never_blocks_a_mutation() {
    let store = seeded_store();
    let c = ctx();

    let sub = store.events().subscribe();
    let mut survivor = store.events().subscribe();
    drop(sub);
    assert_eq!(store.events().subscriber_count(), 1);

    // The mutation still succeeds and the survivor still hears it.
    store.create(rome_draft(), &c).await.unwrap();

    survivor.next_frame(WAIT).await.unwrap(); // connected
    let frame = survivor.next_frame(WAIT).await.unwrap();
    assert_eq!(frame.kind, FrameKind::Created);
}

#[tokio::test]
async fn subscribers_only_see_events_published_while_registered() {
    let store = seeded_store();
    let c = ctx();

    // Mutation before anyone subscribes: never replayed.
    let rome = store.create(rome_draft(), &c).await.unwrap();

    let mut sub = store.events().subscribe();
    assert!(sub.connected_since() <= chrono::Utc::now());
    sub.next_frame(WAIT).await.unwrap(); // connected

    store.delete(rome.id(), None, &c).await.unwrap();
    let frame = sub.next_frame(WAIT).await.unwrap();
    assert_eq!(frame.kind, FrameKind::Deleted);
}

#[tokio::test]
async fn frames_render_as_sse_data_lines() {
    let store = seeded_store();
    let c = ctx();

    let mut sub = store.events().subscribe();
    sub.next_frame(WAIT).await.unwrap(); // connected

    store.create(rome_draft(), &c).await.unwrap();
    let frame = sub.next_frame(WAIT).await.unwrap();

    let line = frame.to_sse();
    assert!(line.starts_with("data: {"));
    assert!(line.ends_with("\n\n"));
    assert!(line.contains("\"type\":\"created\""));
    assert!(line.contains("\"name\":\"Rome\""));
}
