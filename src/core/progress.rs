//! # Per-client progress tracker with sequence-based ordering.
//!
//! Keeps the live state of every client that is still in flight, so a shutdown
//! that runs past its grace period can name the clients it is waiting for.
//!
//! ## Architecture
//! ```text
//! ClientActor ──► Bus ──► center listener ──► ProgressTracker::update()
//!                                                      │
//!                                                      ▼
//!                                       HashMap<ClientId, Progress>
//!                                          (id → {last_seq, state})
//! ```
//!
//! ## Rules
//! - `ClientArrived` / `ClientWaiting` / `TaskFinished` → [`ClientState::Waiting`]
//! - `ClientAdmitted` / `TaskStarted` → [`ClientState::InStation`]
//! - `ClientFinished` / `ClientAbandoned` → entry removed, terminal counter bumped
//! - Events with `seq <= last_seq` for the same client are **rejected** (stale)
//!
//! A client publishes its events from one task, so its terminal event is the
//! last one the listener sees for it. Only in-flight clients stay in memory,
//! which keeps an open run bounded by the number of live workers.

use std::collections::HashMap;

use tokio::sync::{Notify, RwLock, futures::Notified};

use crate::{
    client::ClientId,
    events::{Event, EventKind},
    station::StationId,
};

/// Where an in-flight client currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Between tasks, scanning or backing off.
    Waiting,
    /// Holding a slot at the given station.
    InStation(StationId),
}

#[derive(Debug, Clone, Copy)]
struct Progress {
    last_seq: u64,
    state: ClientState,
}

#[derive(Debug, Default)]
struct Inner {
    clients: HashMap<ClientId, Progress>,
    done: usize,
    abandoned: usize,
}

/// Thread-safe tracker of per-client progress.
///
/// ### Responsibilities
/// - Provides the stuck-client list when a closed run exceeds its grace period
/// - Answers "where is client N" for tests and tooling
/// - Rejects stale events using sequence numbers
#[derive(Debug, Default)]
pub struct ProgressTracker {
    inner: RwLock<Inner>,
    left: Notify,
}

impl ProgressTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a client lifecycle event; returns true if it was applied.
    ///
    /// Events without a client, and events older than the last one applied
    /// for that client, are ignored.
    pub async fn update(&self, ev: &Event) -> bool {
        let Some(id) = ev.client else {
            return false;
        };
        let next = match ev.kind {
            EventKind::ClientArrived | EventKind::ClientWaiting | EventKind::TaskFinished => {
                Some(ClientState::Waiting)
            }
            EventKind::ClientAdmitted | EventKind::TaskStarted => match ev.station {
                Some(station) => Some(ClientState::InStation(station)),
                None => return false,
            },
            EventKind::ClientFinished | EventKind::ClientAbandoned => None,
            _ => return false,
        };

        let mut inner = self.inner.write().await;
        if inner
            .clients
            .get(&id)
            .is_some_and(|p| ev.seq <= p.last_seq)
        {
            return false;
        }
        match next {
            Some(state) => {
                inner.clients.insert(
                    id,
                    Progress {
                        last_seq: ev.seq,
                        state,
                    },
                );
            }
            None => {
                inner.clients.remove(&id);
                if ev.kind == EventKind::ClientFinished {
                    inner.done += 1;
                } else {
                    inner.abandoned += 1;
                }
                drop(inner);
                self.left.notify_waiters();
            }
        }
        true
    }

    /// Resolves on the next finished or abandoned client after this call.
    pub(crate) fn left(&self) -> Notified<'_> {
        self.left.notified()
    }

    /// Current state of one client, or `None` once it has left (or was never seen).
    pub async fn state_of(&self, id: ClientId) -> Option<ClientState> {
        self.inner.read().await.clients.get(&id).map(|p| p.state)
    }

    /// Sorted ids of clients that are still waiting or in a station.
    pub async fn snapshot_in_flight(&self) -> Vec<ClientId> {
        let inner = self.inner.read().await;
        let mut ids: Vec<ClientId> = inner.clients.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of clients currently tracked.
    pub async fn len(&self) -> usize {
        self.inner.read().await.clients.len()
    }

    /// True when no client is in flight.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.clients.is_empty()
    }

    /// Number of clients that completed every task.
    pub async fn done(&self) -> usize {
        self.inner.read().await.done
    }

    /// Number of clients cancelled before completing.
    pub async fn abandoned(&self) -> usize {
        self.inner.read().await.abandoned
    }

    /// Finished plus abandoned clients.
    pub async fn settled(&self) -> usize {
        let inner = self.inner.read().await;
        inner.done + inner.abandoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::TaskKind;

    fn ev(kind: EventKind, id: u64) -> Event {
        Event::new(kind).with_client(ClientId::new(id))
    }

    #[tokio::test]
    async fn follows_client_through_a_station() {
        let t = ProgressTracker::new();
        assert!(t.update(&ev(EventKind::ClientArrived, 1)).await);
        assert_eq!(t.state_of(ClientId::new(1)).await, Some(ClientState::Waiting));

        t.update(&ev(EventKind::ClientAdmitted, 1).with_task_kind(TaskKind::Navigation))
            .await;
        assert_eq!(
            t.state_of(ClientId::new(1)).await,
            Some(ClientState::InStation(TaskKind::Navigation.station()))
        );
        assert_eq!(t.snapshot_in_flight().await, vec![ClientId::new(1)]);

        t.update(&ev(EventKind::ClientFinished, 1)).await;
        assert!(t.snapshot_in_flight().await.is_empty());
        assert_eq!(t.state_of(ClientId::new(1)).await, None);
        assert_eq!(t.done().await, 1);
    }

    #[tokio::test]
    async fn terminal_events_release_entries() {
        let t = ProgressTracker::new();
        for id in 1..=100 {
            t.update(&ev(EventKind::ClientArrived, id)).await;
        }
        assert_eq!(t.len().await, 100);

        for id in 1..=100 {
            let kind = if id % 4 == 0 {
                EventKind::ClientAbandoned
            } else {
                EventKind::ClientFinished
            };
            assert!(t.update(&ev(kind, id)).await);
        }

        assert!(t.is_empty().await);
        assert_eq!(t.done().await, 75);
        assert_eq!(t.abandoned().await, 25);
        assert_eq!(t.settled().await, 100);
    }

    #[tokio::test]
    async fn leaving_client_wakes_waiter() {
        let t = ProgressTracker::new();
        t.update(&ev(EventKind::ClientArrived, 1)).await;

        let left = t.left();
        t.update(&ev(EventKind::ClientWaiting, 1)).await;
        t.update(&ev(EventKind::ClientAbandoned, 1)).await;

        tokio::time::timeout(std::time::Duration::from_secs(1), left)
            .await
            .expect("abandon should wake the waiter");
    }

    #[tokio::test]
    async fn stale_events_are_rejected() {
        let t = ProgressTracker::new();
        let early = ev(EventKind::ClientWaiting, 7);
        let late = ev(EventKind::TaskStarted, 7).with_task_kind(TaskKind::Engine);

        assert!(t.update(&late).await);
        assert!(!t.update(&early).await);
        assert_eq!(
            t.state_of(ClientId::new(7)).await,
            Some(ClientState::InStation(TaskKind::Engine.station()))
        );
    }

    #[tokio::test]
    async fn snapshot_is_sorted_and_ignores_non_client_events() {
        let t = ProgressTracker::new();
        for id in [3, 1, 2] {
            t.update(&ev(EventKind::ClientArrived, id)).await;
        }
        assert!(!t.update(&Event::new(EventKind::ShutdownRequested)).await);
        assert_eq!(
            t.snapshot_in_flight().await,
            vec![ClientId::new(1), ClientId::new(2), ClientId::new(3)]
        );
    }
}
