// SPDX-FileCopyrightText: 2026 Antri Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authoritative in-memory queue state for the local process.
//!
//! `QueueStore` owns the [`QueueSnapshot`] and is the single place state is
//! mutated, whether the mutation originates locally (operator, kiosk) or
//! from an adopted remote snapshot. Triggering persistence and publication
//! after a mutation is the caller's (the node loop's) concern.

use antri_core::{
    AntriError, QueueSnapshot, RoomConfig, SnapshotPayload, Ticket, TicketId, TicketStatus, now_ms,
};
use tracing::{debug, info};

/// Ticket store plus sequence allocator over one owned snapshot.
#[derive(Debug, Default)]
pub struct QueueStore {
    snapshot: QueueSnapshot,
}

impl QueueStore {
    /// Wraps an existing snapshot, typically one restored from storage.
    pub fn new(snapshot: QueueSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &QueueSnapshot {
        &self.snapshot
    }

    pub fn room_config(&self) -> Option<&RoomConfig> {
        self.snapshot.room_config.as_ref()
    }

    pub fn set_room_config(&mut self, room_config: Option<RoomConfig>) {
        self.snapshot.room_config = room_config;
    }

    /// Registers a visitor and returns the assigned ticket number.
    ///
    /// Numbers are `last_number + 1`, strictly increasing, never reused even
    /// for skipped or completed tickets.
    pub fn register(&mut self, name: &str, contact: &str) -> Result<u32, AntriError> {
        if name.trim().is_empty() {
            return Err(AntriError::InvalidInput("name must not be empty".into()));
        }
        if contact.trim().is_empty() {
            return Err(AntriError::InvalidInput("contact must not be empty".into()));
        }

        let number = self.snapshot.last_number + 1;
        self.snapshot.tickets.push(Ticket {
            id: TicketId(uuid::Uuid::new_v4().to_string()),
            number,
            name: name.to_string(),
            contact: contact.to_string(),
            created_at: now_ms(),
            status: TicketStatus::Waiting,
        });
        self.snapshot.last_number = number;

        info!(number, name, "ticket registered");
        Ok(number)
    }

    /// `Waiting -> Calling`. Starts the call window for the ticket.
    ///
    /// Returns `false` without touching state for unknown ids or illegal
    /// transitions; a second call while another ticket is active is allowed
    /// (the operator console permits out-of-order calls).
    pub fn call(&mut self, id: &TicketId) -> bool {
        self.transition(id, TicketStatus::Calling)
    }

    /// Calls the waiting ticket with the smallest number (strict FIFO by
    /// registration order). Returns the called number, or `None` when the
    /// waiting list is empty.
    pub fn call_next(&mut self) -> Option<u32> {
        let next = self
            .snapshot
            .tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Waiting)
            .min_by_key(|t| t.number)
            .map(|t| t.id.clone())?;
        if self.call(&next) {
            self.snapshot.current_number
        } else {
            None
        }
    }

    /// `Calling -> Completed`.
    pub fn complete(&mut self, id: &TicketId) -> bool {
        self.transition(id, TicketStatus::Completed)
    }

    /// `Calling -> Skipped`.
    pub fn skip(&mut self, id: &TicketId) -> bool {
        self.transition(id, TicketStatus::Skipped)
    }

    /// Clears every ticket and returns the sequence to 0. Irreversible;
    /// confirmation is the boundary's responsibility, not the store's.
    pub fn reset(&mut self) {
        info!(dropped = self.snapshot.tickets.len(), "queue reset");
        self.snapshot.tickets.clear();
        self.snapshot.current_number = None;
        self.snapshot.last_number = 0;
        self.snapshot.calling_started_at = None;
    }

    /// Wholesale replacement of the replicated state by an accepted remote
    /// snapshot. Room configuration is local and stays untouched.
    pub fn adopt(&mut self, payload: SnapshotPayload) {
        debug!(
            tickets = payload.tickets.len(),
            last_number = payload.last_number,
            "adopting remote snapshot"
        );
        self.snapshot.tickets = payload.tickets;
        self.snapshot.current_number = payload.current_number;
        self.snapshot.last_number = payload.last_number;
        self.snapshot.calling_started_at = payload.calling_started_at;
    }

    fn transition(&mut self, id: &TicketId, to: TicketStatus) -> bool {
        let Some(ticket) = self.snapshot.tickets.iter_mut().find(|t| &t.id == id) else {
            debug!(?id, "status transition for unknown ticket ignored");
            return false;
        };

        let legal = matches!(
            (ticket.status, to),
            (TicketStatus::Waiting, TicketStatus::Calling)
                | (TicketStatus::Calling, TicketStatus::Completed)
                | (TicketStatus::Calling, TicketStatus::Skipped)
        );
        if !legal {
            debug!(number = ticket.number, from = %ticket.status, to = %to, "illegal transition ignored");
            return false;
        }

        ticket.status = to;
        let number = ticket.number;
        match to {
            TicketStatus::Calling => {
                self.snapshot.current_number = Some(number);
                self.snapshot.calling_started_at = Some(now_ms());
                info!(number, "ticket called");
            }
            TicketStatus::Completed | TicketStatus::Skipped => {
                // The countdown stops; current_number stays as "last called".
                if self.snapshot.current_number == Some(number) {
                    self.snapshot.calling_started_at = None;
                }
                info!(number, status = %to, "ticket closed");
            }
            TicketStatus::Waiting => unreachable!("no transition targets Waiting"),
        }
        true
    }

    // --- Read views for consoles and displays ---

    /// Waiting tickets, smallest number first.
    pub fn waiting(&self) -> Vec<&Ticket> {
        let mut list: Vec<&Ticket> = self
            .snapshot
            .tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Waiting)
            .collect();
        list.sort_by_key(|t| t.number);
        list
    }

    /// Tickets currently being served, most recently created first.
    pub fn active(&self) -> Vec<&Ticket> {
        let mut list: Vec<&Ticket> = self
            .snapshot
            .tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Calling)
            .collect();
        list.sort_by_key(|t| std::cmp::Reverse(t.created_at));
        list
    }

    /// Completed tickets, newest first, capped for history strips.
    pub fn recently_completed(&self, limit: usize) -> Vec<&Ticket> {
        let mut list: Vec<&Ticket> = self
            .snapshot
            .tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Completed)
            .collect();
        list.sort_by_key(|t| std::cmp::Reverse(t.created_at));
        list.truncate(limit);
        list
    }

    /// The first `limit` tickets in line, for "next up" panels.
    pub fn next_up(&self, limit: usize) -> Vec<&Ticket> {
        let mut list = self.waiting();
        list.truncate(limit);
        list
    }

    pub fn find_by_number(&self, number: u32) -> Option<&Ticket> {
        self.snapshot.tickets.iter().find(|t| t.number == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store_with(names: &[&str]) -> QueueStore {
        let mut store = QueueStore::default();
        for name in names {
            store.register(name, "0812").expect("register");
        }
        store
    }

    fn id_of(store: &QueueStore, number: u32) -> TicketId {
        store.find_by_number(number).expect("ticket").id.clone()
    }

    #[test]
    fn register_assigns_increasing_numbers_without_gaps() {
        let mut store = QueueStore::default();
        for expected in 1..=5 {
            let number = store.register("Visitor", "0812").expect("register");
            assert_eq!(number, expected);
        }
        assert_eq!(store.snapshot().last_number, 5);
    }

    #[test]
    fn register_rejects_blank_input() {
        let mut store = QueueStore::default();
        assert!(matches!(
            store.register("", "0812"),
            Err(AntriError::InvalidInput(_))
        ));
        assert!(matches!(
            store.register("Alice", "   "),
            Err(AntriError::InvalidInput(_))
        ));
        assert!(store.snapshot().tickets.is_empty());
    }

    #[test]
    fn numbers_are_not_reused_after_skip_or_complete() {
        let mut store = store_with(&["a", "b"]);
        store.call_next();
        store.skip(&id_of(&store, 1));
        let number = store.register("c", "0812").expect("register");
        assert_eq!(number, 3);
    }

    #[test]
    fn call_next_is_fifo_by_number() {
        let mut store = store_with(&["a", "b", "c"]);
        assert_eq!(store.call_next(), Some(1));
        store.complete(&id_of(&store, 1));
        assert_eq!(store.call_next(), Some(2));
        store.complete(&id_of(&store, 2));
        assert_eq!(store.call_next(), Some(3));
        store.complete(&id_of(&store, 3));
        assert_eq!(store.call_next(), None);
    }

    #[test]
    fn only_waiting_tickets_can_be_called() {
        let mut store = store_with(&["a"]);
        let id = id_of(&store, 1);
        assert!(store.call(&id));
        // Calling -> Calling is illegal.
        assert!(!store.call(&id));
        assert!(store.complete(&id));
        // Completed is terminal.
        assert!(!store.call(&id));
        assert!(!store.skip(&id));
    }

    #[test]
    fn only_calling_tickets_can_be_closed() {
        let mut store = store_with(&["a"]);
        let id = id_of(&store, 1);
        assert!(!store.complete(&id));
        assert!(!store.skip(&id));
        assert_eq!(store.snapshot().tickets[0].status, TicketStatus::Waiting);
    }

    #[test]
    fn unknown_id_is_a_silent_noop() {
        let mut store = store_with(&["a"]);
        let before = store.snapshot().clone();
        assert!(!store.call(&TicketId("missing".into())));
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn closing_the_current_ticket_stops_the_countdown_but_keeps_the_number() {
        let mut store = store_with(&["a"]);
        store.call_next();
        assert!(store.snapshot().calling_started_at.is_some());

        store.complete(&id_of(&store, 1));
        assert_eq!(store.snapshot().current_number, Some(1));
        assert!(store.snapshot().calling_started_at.is_none());
    }

    #[test]
    fn closing_a_non_current_ticket_keeps_the_countdown() {
        let mut store = store_with(&["a", "b"]);
        let first = id_of(&store, 1);
        store.call(&first);
        // Operator calls a second ticket out of order; it becomes current.
        let second = id_of(&store, 2);
        store.call(&second);
        assert_eq!(store.snapshot().current_number, Some(2));

        // Completing the first must not stop ticket 2's countdown.
        store.complete(&first);
        assert_eq!(store.snapshot().current_number, Some(2));
        assert!(store.snapshot().calling_started_at.is_some());
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = store_with(&["a", "b"]);
        store.call_next();
        store.reset();

        let snapshot = store.snapshot();
        assert!(snapshot.tickets.is_empty());
        assert_eq!(snapshot.current_number, None);
        assert_eq!(snapshot.last_number, 0);
        assert_eq!(snapshot.calling_started_at, None);

        // The sequence restarts from 1 in the new epoch.
        assert_eq!(store.register("c", "0812").expect("register"), 1);
    }

    #[test]
    fn adopt_replaces_replicated_state_and_keeps_room_config() {
        let mut store = QueueStore::default();
        store.set_room_config(Some(RoomConfig {
            endpoint: "wss://relay.example".into(),
            credential: "secret".into(),
            room_id: "booth".into(),
        }));
        store.register("local", "0812").expect("register");

        let remote = SnapshotPayload {
            tickets: vec![],
            current_number: Some(7),
            last_number: 7,
            calling_started_at: Some(1_700_000_000_000),
        };
        store.adopt(remote.clone());

        assert!(store.snapshot().tickets.is_empty());
        assert_eq!(store.snapshot().current_number, Some(7));
        assert_eq!(store.snapshot().last_number, 7);
        assert!(store.room_config().is_some());

        // Applying the same snapshot twice leaves state identical.
        let once = store.snapshot().clone();
        store.adopt(remote);
        assert_eq!(store.snapshot(), &once);
    }

    #[test]
    fn read_views_partition_the_queue() {
        let mut store = store_with(&["a", "b", "c", "d"]);
        store.call_next();
        store.complete(&id_of(&store, 1));
        store.call_next();

        assert_eq!(
            store.waiting().iter().map(|t| t.number).collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(store.active().len(), 1);
        assert_eq!(store.active()[0].number, 2);
        assert_eq!(store.recently_completed(15).len(), 1);
        assert_eq!(store.next_up(1).len(), 1);
        assert_eq!(store.next_up(1)[0].number, 3);
    }

    #[test]
    fn end_to_end_scenario() {
        let mut store = QueueStore::default();
        assert_eq!(store.register("Alice", "0811").expect("register"), 1);
        assert_eq!(store.register("Bob", "0812").expect("register"), 2);

        assert_eq!(store.call_next(), Some(1));
        assert_eq!(store.snapshot().current_number, Some(1));
        assert_eq!(
            store.find_by_number(1).expect("ticket").status,
            TicketStatus::Calling
        );

        assert!(store.complete(&id_of(&store, 1)));
        assert_eq!(store.snapshot().current_number, Some(1));
        assert!(store.snapshot().calling_started_at.is_none());
        assert_eq!(
            store.find_by_number(1).expect("ticket").status,
            TicketStatus::Completed
        );

        assert_eq!(store.call_next(), Some(2));
        assert_eq!(store.snapshot().current_number, Some(2));
    }

    proptest! {
        #[test]
        fn numbering_is_strictly_increasing_by_one(count in 1usize..40) {
            let mut store = QueueStore::default();
            let mut issued = Vec::new();
            for i in 0..count {
                issued.push(store.register(&format!("v{i}"), "0812").expect("register"));
            }
            for (i, number) in issued.iter().enumerate() {
                prop_assert_eq!(*number, (i + 1) as u32);
            }
        }

        #[test]
        fn repeated_call_next_drains_in_number_order(count in 1usize..20) {
            let mut store = QueueStore::default();
            for i in 0..count {
                store.register(&format!("v{i}"), "0812").expect("register");
            }
            let mut called = Vec::new();
            while let Some(number) = store.call_next() {
                let id = store.find_by_number(number).expect("ticket").id.clone();
                called.push(number);
                store.complete(&id);
            }
            let expected: Vec<u32> = (1..=count as u32).collect();
            prop_assert_eq!(called, expected);
        }
    }
}
