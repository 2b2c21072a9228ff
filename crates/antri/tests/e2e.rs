// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end multi-device scenarios.
//!
//! Each test wires several nodes -- operator console, display, kiosk --
//! into one mock room with isolated temp databases, and checks that queue
//! state converges the way a real counter would see it.

use antri_core::{SyncEvent, SyncTransport, TicketStatus};
use antri_test_utils::RoomHarness;

#[tokio::test]
async fn registration_on_one_device_reaches_the_others() {
    let mut harness = RoomHarness::new();
    let kiosk = harness.join_node().await.unwrap();
    let display = harness.join_node().await.unwrap();

    let number = harness
        .handle(kiosk)
        .register("Alice", "0811")
        .await
        .unwrap();
    assert_eq!(number, 1);
    harness.settle().await;

    let seen = harness.handle(display).snapshot().await.unwrap();
    assert_eq!(seen.tickets.len(), 1);
    assert_eq!(seen.tickets[0].name, "Alice");
    assert_eq!(seen.last_number, 1);

    harness.shutdown().await;
}

#[tokio::test]
async fn full_counter_flow_across_operator_and_display() {
    let mut harness = RoomHarness::new();
    let operator = harness.join_node().await.unwrap();
    let display = harness.join_node().await.unwrap();

    // Two visitors sign up at the kiosk (same device as operator here).
    assert_eq!(
        harness
            .handle(operator)
            .register("Alice", "0811")
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        harness
            .handle(operator)
            .register("Bob", "0812")
            .await
            .unwrap(),
        2
    );

    // Operator calls the first ticket; the display follows.
    assert_eq!(harness.handle(operator).call_next().await.unwrap(), Some(1));
    harness.settle().await;
    let seen = harness.handle(display).snapshot().await.unwrap();
    assert_eq!(seen.current_number, Some(1));
    assert!(seen.calling_started_at.is_some());

    // Serving done: countdown stops everywhere, number stays up.
    assert!(harness.handle(operator).complete(1).await.unwrap());
    harness.settle().await;
    let seen = harness.handle(display).snapshot().await.unwrap();
    assert_eq!(seen.current_number, Some(1));
    assert!(seen.calling_started_at.is_none());
    assert_eq!(seen.tickets[0].status, TicketStatus::Completed);

    // Next ticket.
    assert_eq!(harness.handle(operator).call_next().await.unwrap(), Some(2));
    harness.settle().await;
    let seen = harness.handle(display).snapshot().await.unwrap();
    assert_eq!(seen.current_number, Some(2));

    harness.shutdown().await;
}

#[tokio::test]
async fn late_joiner_bootstraps_from_a_peer() {
    let mut harness = RoomHarness::new();
    let veteran = harness.join_node().await.unwrap();
    harness
        .handle(veteran)
        .register("Alice", "0811")
        .await
        .unwrap();
    harness
        .handle(veteran)
        .register("Bob", "0812")
        .await
        .unwrap();

    // A display powers on with an empty database and asks the room for
    // state, as the transport does automatically after connecting.
    let late = harness.join_node().await.unwrap();
    assert!(
        harness
            .handle(late)
            .snapshot()
            .await
            .unwrap()
            .tickets
            .is_empty()
    );
    harness
        .transport(late)
        .request_sync()
        .await
        .unwrap();
    harness.settle().await;

    let seen = harness.handle(late).snapshot().await.unwrap();
    assert_eq!(seen.tickets.len(), 2);
    assert_eq!(seen.last_number, 2);

    // And the late joiner continues the sequence, not restarts it.
    assert_eq!(
        harness.handle(late).register("Cara", "0813").await.unwrap(),
        3
    );

    harness.shutdown().await;
}

#[tokio::test]
async fn empty_late_joiner_cannot_blank_out_the_room() {
    let mut harness = RoomHarness::new();
    let veteran = harness.join_node().await.unwrap();
    harness
        .handle(veteran)
        .register("Alice", "0811")
        .await
        .unwrap();

    // The empty device's bootstrap request must not be answered by itself,
    // and it publishes nothing unprompted.
    let late = harness.join_node().await.unwrap();
    harness.transport(late).request_sync().await.unwrap();
    harness.settle().await;

    let veteran_state = harness.handle(veteran).snapshot().await.unwrap();
    assert_eq!(veteran_state.tickets.len(), 1);
    assert_eq!(harness.transport(late).publish_count().await, 0);

    harness.shutdown().await;
}

#[tokio::test]
async fn last_delivered_snapshot_wins_everywhere() {
    let mut harness = RoomHarness::new();
    let a = harness.join_node().await.unwrap();
    let b = harness.join_node().await.unwrap();

    // Two conflicting histories arrive back to back from outside devices.
    let first = antri_core::SnapshotPayload {
        last_number: 10,
        ..Default::default()
    };
    let second = antri_core::SnapshotPayload {
        last_number: 3,
        ..Default::default()
    };

    harness.inject(SyncEvent::QueueUpdate(first)).await;
    harness.inject(SyncEvent::QueueUpdate(second)).await;
    harness.settle().await;

    // No vector clocks: the later delivery wins on every device, even
    // though it describes "less" history.
    assert_eq!(harness.handle(a).snapshot().await.unwrap().last_number, 3);
    assert_eq!(harness.handle(b).snapshot().await.unwrap().last_number, 3);

    harness.shutdown().await;
}

#[tokio::test]
async fn reset_propagates_to_every_device() {
    let mut harness = RoomHarness::new();
    let operator = harness.join_node().await.unwrap();
    let display = harness.join_node().await.unwrap();

    harness
        .handle(operator)
        .register("Alice", "0811")
        .await
        .unwrap();
    harness.settle().await;

    harness.handle(operator).reset().await.unwrap();
    harness.settle().await;

    let seen = harness.handle(display).snapshot().await.unwrap();
    assert!(seen.tickets.is_empty());
    assert_eq!(seen.last_number, 0);
    assert_eq!(seen.current_number, None);

    // Numbering restarts in the new epoch on any device.
    assert_eq!(
        harness
            .handle(display)
            .register("Dana", "0814")
            .await
            .unwrap(),
        1
    );

    harness.shutdown().await;
}

#[tokio::test]
async fn adopted_state_survives_a_device_restart() {
    let mut harness = RoomHarness::new();
    let operator = harness.join_node().await.unwrap();
    let display = harness.join_node().await.unwrap();

    harness
        .handle(operator)
        .register("Alice", "0811")
        .await
        .unwrap();
    harness.handle(operator).call_next().await.unwrap();
    harness.settle().await;

    // The display adopted and persisted the state; after a power cycle it
    // comes back without asking the room.
    harness.restart_node(display).await.unwrap();
    let seen = harness.handle(display).snapshot().await.unwrap();
    assert_eq!(seen.tickets.len(), 1);
    assert_eq!(seen.current_number, Some(1));

    harness.shutdown().await;
}
