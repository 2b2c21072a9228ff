// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the node loop: uniform persist/publish on local
//! mutations, reconciliation of inbound snapshots, echo suppression, and
//! request-sync answering.

use antri_core::{AntriError, SnapshotPayload, SnapshotStore, SyncEvent, Ticket, TicketId,
    TicketStatus};
use antri_test_utils::RoomHarness;

fn remote_payload(number: u32) -> SnapshotPayload {
    SnapshotPayload {
        tickets: vec![Ticket {
            id: TicketId(format!("ghost-{number}")),
            number,
            name: "Ghost".into(),
            contact: "0800".into(),
            created_at: 1_700_000_000_000,
            status: TicketStatus::Waiting,
        }],
        current_number: None,
        last_number: number,
        calling_started_at: None,
    }
}

#[tokio::test]
async fn local_mutation_is_persisted_and_published() {
    let mut harness = RoomHarness::new();
    let a = harness.join_node().await.unwrap();

    let number = harness.handle(a).register("Alice", "0811").await.unwrap();
    assert_eq!(number, 1);

    // Published exactly once for the mutation.
    assert_eq!(harness.transport(a).publish_count().await, 1);
    let published = harness.transport(a).published().await;
    assert_eq!(published[0].last_number, 1);

    // And durable: the slot holds the same state.
    let stored = harness.node(a).storage.load().await.unwrap().unwrap();
    assert_eq!(stored.last_number, 1);
    assert_eq!(stored.tickets.len(), 1);
}

#[tokio::test]
async fn rejected_registration_neither_persists_nor_publishes() {
    let mut harness = RoomHarness::new();
    let a = harness.join_node().await.unwrap();

    let err = harness.handle(a).register("", "0811").await.unwrap_err();
    assert!(matches!(err, AntriError::InvalidInput(_)));

    assert_eq!(harness.transport(a).publish_count().await, 0);
    let stored = harness.node(a).storage.load().await.unwrap().unwrap();
    assert!(stored.tickets.is_empty());
}

#[tokio::test]
async fn adopted_snapshot_is_persisted_but_never_republished() {
    let mut harness = RoomHarness::new();
    let a = harness.join_node().await.unwrap();

    harness
        .inject(SyncEvent::QueueUpdate(remote_payload(5)))
        .await;
    harness.settle().await;

    let snapshot = harness.handle(a).snapshot().await.unwrap();
    assert_eq!(snapshot.last_number, 5);
    assert_eq!(snapshot.tickets[0].name, "Ghost");

    // Persisted...
    let stored = harness.node(a).storage.load().await.unwrap().unwrap();
    assert_eq!(stored.last_number, 5);
    // ...but not echoed back into the room.
    assert_eq!(harness.transport(a).publish_count().await, 0);
}

#[tokio::test]
async fn adopting_the_same_snapshot_twice_is_idempotent() {
    let mut harness = RoomHarness::new();
    let a = harness.join_node().await.unwrap();

    harness
        .inject(SyncEvent::QueueUpdate(remote_payload(5)))
        .await;
    harness.settle().await;
    let once = harness.handle(a).snapshot().await.unwrap();

    harness
        .inject(SyncEvent::QueueUpdate(remote_payload(5)))
        .await;
    harness.settle().await;
    let twice = harness.handle(a).snapshot().await.unwrap();

    assert_eq!(once, twice);
}

#[tokio::test]
async fn request_sync_is_answered_only_with_state_to_offer() {
    let mut harness = RoomHarness::new();
    let a = harness.join_node().await.unwrap();

    // Empty queue: a request must go unanswered.
    harness.inject(SyncEvent::RequestSync).await;
    harness.settle().await;
    assert_eq!(harness.transport(a).publish_count().await, 0);

    harness.handle(a).register("Alice", "0811").await.unwrap();
    assert_eq!(harness.transport(a).publish_count().await, 1);

    harness.inject(SyncEvent::RequestSync).await;
    harness.settle().await;
    assert_eq!(harness.transport(a).publish_count().await, 2);
    let answers = harness.transport(a).published().await;
    assert_eq!(answers[1].last_number, 1);
}

#[tokio::test]
async fn every_operator_action_publishes_the_full_snapshot() {
    let mut harness = RoomHarness::new();
    let a = harness.join_node().await.unwrap();
    let handle = harness.handle(a).clone();

    handle.register("Alice", "0811").await.unwrap();
    handle.register("Bob", "0812").await.unwrap();
    assert_eq!(handle.call_next().await.unwrap(), Some(1));
    assert!(handle.complete(1).await.unwrap());
    assert!(handle.call(2).await.unwrap());
    assert!(handle.skip(2).await.unwrap());
    handle.reset().await.unwrap();

    let published = harness.transport(a).published().await;
    assert_eq!(published.len(), 7);
    // The reset snapshot is the last word.
    let last = published.last().unwrap();
    assert!(last.tickets.is_empty());
    assert_eq!(last.last_number, 0);
}

#[tokio::test]
async fn noop_transitions_do_not_publish() {
    let mut harness = RoomHarness::new();
    let a = harness.join_node().await.unwrap();
    let handle = harness.handle(a).clone();

    handle.register("Alice", "0811").await.unwrap();
    assert_eq!(harness.transport(a).publish_count().await, 1);

    // Completing a ticket that was never called changes nothing.
    assert!(!handle.complete(1).await.unwrap());
    // Unknown numbers are silent no-ops.
    assert!(!handle.call(99).await.unwrap());
    assert_eq!(harness.transport(a).publish_count().await, 1);
}

#[tokio::test]
async fn local_only_node_works_without_a_transport() {
    let mut harness = RoomHarness::new();
    let a = harness.join_local_node().await.unwrap();
    let handle = harness.handle(a).clone();

    handle.register("Alice", "0811").await.unwrap();
    assert_eq!(handle.call_next().await.unwrap(), Some(1));

    let stored = harness.node(a).storage.load().await.unwrap().unwrap();
    assert_eq!(stored.current_number, Some(1));
}

#[tokio::test]
async fn cold_start_restores_the_persisted_queue() {
    let mut harness = RoomHarness::new();
    let a = harness.join_local_node().await.unwrap();
    let handle = harness.handle(a).clone();

    handle.register("Alice", "0811").await.unwrap();
    handle.register("Bob", "0812").await.unwrap();
    handle.call_next().await.unwrap();

    harness.restart_node(a).await.unwrap();

    let snapshot = harness.handle(a).snapshot().await.unwrap();
    assert_eq!(snapshot.tickets.len(), 2);
    assert_eq!(snapshot.current_number, Some(1));
    assert_eq!(snapshot.last_number, 2);

    // The allocator continues where it left off.
    assert_eq!(harness.handle(a).register("Cara", "0813").await.unwrap(), 3);
}
