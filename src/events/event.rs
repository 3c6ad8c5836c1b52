//! # Events emitted by client workers and the service center.
//!
//! [`EventKind`] classifies events in two groups:
//! - **Client lifecycle**: arrived, waiting, admitted, task started/finished, finished
//! - **Shutdown**: requested, all stopped, grace exceeded
//!
//! [`Event`] carries the metadata a sink needs to render each transition.
//!
//! ## Ordering guarantees
//! Each event has a globally unique, monotonically increasing `seq`. Per client,
//! events are published from a single worker, so `seq` order is causal order.
//!
//! ## Example
//! ```rust
//! use stationvisor::{ClientId, Event, EventKind, TaskKind};
//!
//! let ev = Event::new(EventKind::ClientAdmitted)
//!     .with_client(ClientId::new(3))
//!     .with_task_kind(TaskKind::Engine);
//!
//! assert_eq!(ev.kind, EventKind::ClientAdmitted);
//! assert_eq!(ev.station.map(|s| s.get()), Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::{
    client::ClientId,
    station::{StationId, TaskKind},
};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Client lifecycle ===
    /// Client entered the service center.
    ///
    /// Sets: `client`, `remaining`
    ClientArrived,

    /// Scan found no free slot at any eligible station; client backs off.
    ///
    /// Sets: `client`, `attempt` (failed scans in this round, 1-based), `delay_ms`
    ClientWaiting,

    /// Client occupied a station slot.
    ///
    /// Sets: `client`, `station`, `task_kind`, `attempt` (failed scans before admission)
    ClientAdmitted,

    /// Task began at the occupied station.
    ///
    /// Sets: `client`, `station`, `task_kind`, `service_ms`
    TaskStarted,

    /// Task completed; the slot is released right after.
    ///
    /// Sets: `client`, `station`, `task_kind`, `remaining`
    TaskFinished,

    /// Every required task is complete.
    ///
    /// Sets: `client`, `remaining` (= 0)
    ClientFinished,

    /// Client worker was cancelled before finishing (shutdown).
    ///
    /// Sets: `client`, `remaining`
    ClientAbandoned,

    // === Shutdown ===
    /// Shutdown requested (OS signal or explicit hook).
    ShutdownRequested,

    /// All joined clients stopped within the grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some clients did not stop in time.
    GraceExceeded,
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    pub client: Option<ClientId>,
    pub station: Option<StationId>,
    pub task_kind: Option<TaskKind>,
    /// Failed scans in the current admission round.
    pub attempt: Option<u32>,
    /// Backoff before the next scan in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Service time of the started task in milliseconds (compact).
    pub service_ms: Option<u32>,
    /// Tasks still pending for the client.
    pub remaining: Option<u8>,
    /// Human-readable reason (shutdown cause, stuck clients, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            client: None,
            station: None,
            task_kind: None,
            attempt: None,
            delay_ms: None,
            service_ms: None,
            remaining: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_client(mut self, id: ClientId) -> Self {
        self.client = Some(id);
        self
    }

    /// Attaches the task kind and the station servicing it.
    #[inline]
    pub fn with_task_kind(mut self, kind: TaskKind) -> Self {
        self.task_kind = Some(kind);
        self.station = Some(kind.station());
        self
    }

    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(as_compact_ms(d));
        self
    }

    /// Attaches a service time (stored as milliseconds).
    #[inline]
    pub fn with_service(mut self, d: Duration) -> Self {
        self.service_ms = Some(as_compact_ms(d));
        self
    }

    #[inline]
    pub fn with_remaining(mut self, remaining: usize) -> Self {
        self.remaining = Some(remaining.min(usize::from(u8::MAX)) as u8);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for the per-client lifecycle kinds.
    #[inline]
    pub fn is_client_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ClientArrived
                | EventKind::ClientWaiting
                | EventKind::ClientAdmitted
                | EventKind::TaskStarted
                | EventKind::TaskFinished
                | EventKind::ClientFinished
                | EventKind::ClientAbandoned
        )
    }
}

fn as_compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}
