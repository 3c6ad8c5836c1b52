//! # ClientActor: admission loop for a single client.
//!
//! Drives one [`Client`] through every pending task:
//! - first-fit scan over the stations of pending tasks, in [`TaskKind::ALL`] order,
//! - delays per [`BackoffPolicy`] when every eligible station is full,
//! - early wake-up when any eligible station releases a slot,
//! - cooperative cancellation via [`CancellationToken`].
//!
//! ## Architecture
//! ```text
//! ServiceCenter ──► ClientActor::run()
//!
//! publish ClientArrived
//! loop while tasks remain {
//!   ├─► arm release signals of pending stations
//!   ├─► scan pending kinds in order: station.try_slot()
//!   │     ├─► Some(slot) → publish ClientAdmitted
//!   │     │                serve_once() ─► TaskStarted / TaskFinished / release
//!   │     └─► None       → publish ClientWaiting
//!   │                      select { backoff sleep | any release | cancelled }
//! }
//! publish ClientFinished   (or ClientAbandoned on cancellation)
//! ```
//!
//! ## Rules
//! - A client holds **at most one** slot at a time.
//! - Each task kind is admitted **at most once** per client.
//! - The failed-scan counter **resets** after each admission.
//! - Release signals are armed **before** the scan, so a release racing the
//!   scan still wakes the client.

use std::sync::Arc;

use futures::future::select_all;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    client::Client,
    core::runner::{Served, serve_once},
    events::{Bus, Event, EventKind},
    policies::BackoffPolicy,
    service::ServiceTime,
    station::StationSet,
};

/// Runs the admission protocol for one client.
///
/// ### Responsibilities
/// - **Admission**: first-fit scan over stations of pending tasks
/// - **Waiting**: backoff sleep, cut short by a release at any eligible station
/// - **Execution**: serves each admitted task via [`serve_once`]
/// - **Event publishing**: reports every state transition to the bus
pub struct ClientActor {
    client: Client,
    stations: StationSet,
    service: Arc<dyn ServiceTime>,
    backoff: BackoffPolicy,
    bus: Bus,
}

impl ClientActor {
    /// Creates a new actor for `client`.
    pub fn new(
        client: Client,
        stations: StationSet,
        service: Arc<dyn ServiceTime>,
        backoff: BackoffPolicy,
        bus: Bus,
    ) -> Self {
        Self {
            client,
            stations,
            service,
            backoff,
            bus,
        }
    }

    /// Runs until every task is complete or `token` is cancelled.
    ///
    /// Returns the client record; on cancellation it still lists the tasks
    /// that were completed.
    ///
    /// ### Cancellation semantics
    /// The token is observed at the top of every scan, during the backoff wait
    /// and during service. A slot held at cancellation is released before
    /// this returns.
    pub async fn run(mut self, token: CancellationToken) -> Client {
        let id = self.client.id();
        self.bus.publish(
            Event::new(EventKind::ClientArrived)
                .with_client(id)
                .with_remaining(self.client.remaining()),
        );

        let stations = self.stations.clone();
        let mut failed: u32 = 0;

        while !self.client.is_done() {
            if token.is_cancelled() {
                return self.abandon();
            }

            let wakes: Vec<_> = self
                .client
                .pending()
                .map(|kind| Box::pin(stations.get(kind).released()))
                .collect();

            let slot = self
                .client
                .pending()
                .find_map(|kind| stations.get(kind).try_slot());

            let Some(slot) = slot else {
                let delay = self.backoff.next(failed);
                failed = failed.saturating_add(1);
                self.bus.publish(
                    Event::new(EventKind::ClientWaiting)
                        .with_client(id)
                        .with_attempt(failed)
                        .with_delay(delay),
                );

                let sleep = time::sleep(delay);
                tokio::pin!(sleep);
                select! {
                    _ = &mut sleep => {}
                    _ = select_all(wakes) => {}
                    _ = token.cancelled() => {
                        return self.abandon();
                    }
                }
                continue;
            };
            drop(wakes);

            self.bus.publish(
                Event::new(EventKind::ClientAdmitted)
                    .with_client(id)
                    .with_task_kind(slot.kind())
                    .with_attempt(failed),
            );
            failed = 0;

            let served = serve_once(
                slot,
                &mut self.client,
                self.service.as_ref(),
                &token,
                &self.bus,
            )
            .await;
            if served == Served::Cancelled {
                return self.abandon();
            }
        }

        self.bus.publish(
            Event::new(EventKind::ClientFinished)
                .with_client(id)
                .with_remaining(0),
        );
        self.client
    }

    fn abandon(self) -> Client {
        self.bus.publish(
            Event::new(EventKind::ClientAbandoned)
                .with_client(self.client.id())
                .with_remaining(self.client.remaining()),
        );
        self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientId;
    use crate::service::FixedServiceTime;
    use crate::station::TaskKind;
    use std::time::Duration;

    fn actor(id: u64, stations: &StationSet, bus: &Bus, service_ms: u64) -> ClientActor {
        ClientActor::new(
            Client::new(ClientId::new(id)),
            stations.clone(),
            Arc::new(FixedServiceTime(Duration::from_millis(service_ms))),
            BackoffPolicy::default(),
            bus.clone(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn lone_client_visits_stations_in_order() {
        let stations = StationSet::new(1);
        let bus = Bus::new(64);

        let client = actor(1, &stations, &bus, 500)
            .run(CancellationToken::new())
            .await;

        assert!(client.is_done());
        assert_eq!(client.history(), &TaskKind::ALL);
        assert_eq!(stations.total_occupancy(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn client_visits_only_required_stations() {
        let stations = StationSet::new(1);
        let bus = Bus::new(64);
        let a = ClientActor::new(
            Client::with_required(ClientId::new(1), [TaskKind::Steering, TaskKind::Battery]),
            stations.clone(),
            Arc::new(FixedServiceTime(Duration::from_millis(100))),
            BackoffPolicy::default(),
            bus,
        );

        let client = a.run(CancellationToken::new()).await;

        assert!(client.is_done());
        assert_eq!(client.history(), &[TaskKind::Battery, TaskKind::Steering]);
        assert_eq!(stations.get(TaskKind::Engine).admissions(), 0);
        assert_eq!(stations.get(TaskKind::Navigation).admissions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn busy_first_station_is_skipped() {
        let stations = StationSet::new(1);
        let bus = Bus::new(64);
        assert!(stations.get(TaskKind::Battery).try_acquire());

        let handle = tokio::spawn(actor(1, &stations, &bus, 100).run(CancellationToken::new()));
        time::sleep(Duration::from_secs(1)).await;
        stations.get(TaskKind::Battery).release();

        let client = handle.await.unwrap();
        assert!(client.is_done());
        assert_eq!(
            client.history(),
            &[
                TaskKind::Engine,
                TaskKind::Steering,
                TaskKind::Navigation,
                TaskKind::Battery
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn waits_then_admits_after_release() {
        let stations = StationSet::new(1);
        let bus = Bus::new(256);
        let mut rx = bus.subscribe();
        for k in TaskKind::ALL {
            assert!(stations.get(k).try_acquire());
        }

        let handle = tokio::spawn(actor(9, &stations, &bus, 100).run(CancellationToken::new()));
        time::sleep(Duration::from_millis(250)).await;
        for k in TaskKind::ALL {
            stations.get(k).release();
        }

        let client = handle.await.unwrap();
        assert!(client.is_done());
        assert_eq!(stations.total_occupancy(), 0);

        let mut waits = 0;
        let mut admitted_after = None;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::ClientWaiting => waits += 1,
                EventKind::ClientAdmitted if admitted_after.is_none() => {
                    admitted_after = ev.attempt;
                }
                _ => {}
            }
        }
        assert!(waits >= 2);
        assert_eq!(admitted_after, Some(waits));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_while_waiting_is_abandoned() {
        let stations = StationSet::new(1);
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        for k in TaskKind::ALL {
            assert!(stations.get(k).try_acquire());
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(actor(3, &stations, &bus, 100).run(token.clone()));
        time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        let client = handle.await.unwrap();
        assert_eq!(client.remaining(), 4);

        let mut last = None;
        while let Ok(ev) = rx.try_recv() {
            last = Some(ev.kind);
        }
        assert_eq!(last, Some(EventKind::ClientAbandoned));
        for k in TaskKind::ALL {
            stations.get(k).release();
        }
    }
}
