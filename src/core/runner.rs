//! # Service of one task at an occupied station.
//!
//! [`serve_once`] runs a single task for a client that already holds a
//! [`StationSlot`], publishes the lifecycle events and gives the slot back.
//!
//! ## Event flow
//! ```text
//! Completed:
//!   publish TaskStarted → sleep(service) → mark complete → publish TaskFinished → release
//!
//! Cancelled:
//!   publish TaskStarted → token cancelled → release (task stays pending)
//! ```
//!
//! ## Rules
//! - The slot is released **after** the task is marked complete and `TaskFinished` is published.
//! - The slot is released exactly once on every path (drop of [`StationSlot`]).
//! - A cancelled service never marks the task complete.

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    client::Client,
    events::{Bus, Event, EventKind},
    service::ServiceTime,
    station::StationSlot,
};

/// How a single service ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Served {
    Completed,
    Cancelled,
}

/// Serves the task of `slot`'s station for `client`, then releases the slot.
pub(crate) async fn serve_once(
    slot: StationSlot<'_>,
    client: &mut Client,
    service: &dyn ServiceTime,
    token: &CancellationToken,
    bus: &Bus,
) -> Served {
    let kind = slot.kind();
    let id = client.id();
    let duration = service.duration(id, kind);

    bus.publish(
        Event::new(EventKind::TaskStarted)
            .with_client(id)
            .with_task_kind(kind)
            .with_service(duration),
    );

    let sleep = time::sleep(duration);
    tokio::pin!(sleep);
    select! {
        _ = &mut sleep => {}
        _ = token.cancelled() => {
            drop(slot);
            return Served::Cancelled;
        }
    }

    client.mark_complete(kind);
    bus.publish(
        Event::new(EventKind::TaskFinished)
            .with_client(id)
            .with_task_kind(kind)
            .with_remaining(client.remaining()),
    );
    drop(slot);
    Served::Completed
}
