//! # ServiceCenter: spawns clients, fans out events, and shuts down.
//!
//! The [`ServiceCenter`] owns the stations, the event bus, the progress tracker
//! and the subscribers. It turns an [`ArrivalSource`] into client workers and
//! handles the shutdown path.
//!
//! ## High-level architecture
//! ```text
//! run(source):
//!   validate config for the source         (ConfigError before any spawn)
//!   listener: Bus.subscribe() ─► ProgressTracker::update ─► SubscriberSet::emit
//!
//! Closed { clients: N }:
//!   ClientActor × N ─► JoinSet<Client>   (child token each)
//!   select {
//!     all joined         → RunReport
//!     shutdown requested → cancel, wait_all_with_grace(cfg.grace)
//!                             ├─ joined in time → AllStoppedWithin, RunReport
//!                             └─ timeout        → GraceExceeded, RuntimeError (stuck clients)
//!   }
//!
//! Open { interval }:
//!   every interval: spawn ClientActor, drop its JoinHandle
//!   shutdown requested → cancel, drain_open(cfg.grace)
//!                             ├─ every arrival left the tracker → AllStoppedWithin, RunReport
//!                             └─ timeout                        → GraceExceeded, RuntimeError
//!
//! Shutdown requested = OS signal | ServiceCenter::shutdown()
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use stationvisor::{ArrivalSource, Config, FixedServiceTime, ServiceCenter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { capacity: 2, ..Config::default() };
//!     let center = ServiceCenter::builder(cfg)
//!         .with_service_time(FixedServiceTime(Duration::from_millis(5)))
//!         .build()?;
//!
//!     let report = center.run(ArrivalSource::Closed { clients: 6 }).await?;
//!     assert!(report.all_done());
//!     Ok(())
//! }
//! ```

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::broadcast::error::{RecvError, TryRecvError},
    task::{JoinHandle, JoinSet},
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use super::{
    admission::ClientActor, arrival::ArrivalSource, builder::ServiceCenterBuilder,
    progress::ProgressTracker, report::RunReport, shutdown,
};
use crate::{
    client::{Client, ClientIds},
    config::Config,
    error::{CenterError, RuntimeError},
    events::{Bus, Event, EventKind},
    service::ServiceTime,
    station::StationSet,
    subscribers::{Subscribe, SubscriberSet, panic_message},
};

/// Coordinates client workers, event delivery and graceful shutdown.
pub struct ServiceCenter {
    cfg: Config,
    stations: StationSet,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    progress: Arc<ProgressTracker>,
    service: Arc<dyn ServiceTime>,
    ids: ClientIds,
    runtime_token: CancellationToken,
    os_signals: bool,
}

impl ServiceCenter {
    /// Starts building a center from `cfg`.
    pub fn builder(cfg: Config) -> ServiceCenterBuilder {
        ServiceCenterBuilder::new(cfg)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_internal(
        cfg: Config,
        stations: StationSet,
        bus: Bus,
        subscribers: Vec<Arc<dyn Subscribe>>,
        progress: Arc<ProgressTracker>,
        service: Arc<dyn ServiceTime>,
        ids: ClientIds,
        runtime_token: CancellationToken,
        os_signals: bool,
    ) -> Self {
        Self {
            cfg,
            stations,
            bus,
            subscribers,
            progress,
            service,
            ids,
            runtime_token,
            os_signals,
        }
    }

    /// Runs clients from `source` until it is exhausted or shutdown is requested.
    pub async fn run(&self, source: ArrivalSource) -> Result<RunReport, CenterError> {
        match source {
            ArrivalSource::Closed { clients } => self.run_closed(clients).await,
            ArrivalSource::Open { interval } => self.run_open(interval).await,
        }
    }

    /// Closed system: starts `clients` workers at once and joins all of them.
    ///
    /// Returns the report once every client finished. After a shutdown request
    /// the remaining clients get [`Config::grace`] to stop; the report then
    /// lists them as abandoned.
    pub async fn run_closed(&self, clients: usize) -> Result<RunReport, CenterError> {
        self.cfg.validate_closed(clients)?;
        tracing::info!(clients, capacity = self.cfg.capacity, "closed run starting");

        let listener = self.spawn_listener();
        let token = self.runtime_token.child_token();

        let mut set = JoinSet::new();
        for _ in 0..clients {
            let actor = self.actor();
            set.spawn(actor.run(token.child_token()));
        }

        let res = self.drive_shutdown(&mut set, &token).await;
        listener.finish().await;

        let joined = res?;
        tracing::info!(
            finished = joined.iter().filter(|c| c.is_done()).count(),
            clients,
            "closed run complete"
        );
        Ok(RunReport::new(clients as u64, joined, &self.stations))
    }

    /// Open system: admits one new client every `interval` until shutdown.
    ///
    /// Workers are detached. On shutdown they are cancelled and the run waits
    /// up to [`Config::grace`] for the terminal event of every client, so the
    /// listener sees each one leave before it stops.
    pub async fn run_open(&self, interval: Duration) -> Result<RunReport, CenterError> {
        self.cfg.validate_open(interval)?;
        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            capacity = self.cfg.capacity,
            "open run starting"
        );

        let listener = self.spawn_listener();
        let token = self.runtime_token.child_token();

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let signal = shutdown::os_signal(self.os_signals);
        tokio::pin!(signal);

        let mut arrived: u64 = 0;
        let stopped = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let actor = self.actor();
                    drop(tokio::spawn(actor.run(token.child_token())));
                    arrived += 1;
                }
                _ = self.runtime_token.cancelled() => break Ok("shutdown requested"),
                res = &mut signal => break res,
            }
        };

        let res = match stopped {
            Ok(reason) => {
                self.bus.publish(Event::new(EventKind::ShutdownRequested).with_reason(reason));
                token.cancel();
                self.drain_open(arrived)
                    .await
                    .map(|()| RunReport::new(arrived, Vec::new(), &self.stations))
                    .map_err(CenterError::from)
            }
            Err(e) => {
                token.cancel();
                Err(CenterError::from(RuntimeError::Signal(e)))
            }
        };
        listener.finish().await;
        tracing::info!(arrived, "open run stopped");
        res
    }

    /// Requests shutdown of the current and every later run.
    pub fn shutdown(&self) {
        self.runtime_token.cancel();
    }

    /// Stations shared by every client of this center.
    pub fn stations(&self) -> &StationSet {
        &self.stations
    }

    /// Live per-client progress.
    pub fn progress(&self) -> &Arc<ProgressTracker> {
        &self.progress
    }

    /// Event bus; receivers see events published after they subscribe.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    fn actor(&self) -> ClientActor {
        ClientActor::new(
            Client::new(self.ids.next_id()),
            self.stations.clone(),
            Arc::clone(&self.service),
            self.cfg.backoff,
            self.bus.clone(),
        )
    }

    /// Forwards bus events to the tracker and the subscribers until finished.
    fn spawn_listener(&self) -> Listener {
        let mut rx = self.bus.subscribe();
        let subs = SubscriberSet::new(self.subscribers.clone());
        let progress = Arc::clone(&self.progress);
        let stop = CancellationToken::new();

        let handle = tokio::spawn({
            let stop = stop.clone();
            async move {
                loop {
                    tokio::select! {
                        biased;
                        res = rx.recv() => match res {
                            Ok(ev) => forward(&ev, &progress, &subs).await,
                            Err(RecvError::Lagged(skipped)) => {
                                tracing::warn!(skipped, "event listener lagged");
                            }
                            Err(RecvError::Closed) => break,
                        },
                        _ = stop.cancelled() => {
                            loop {
                                match rx.try_recv() {
                                    Ok(ev) => forward(&ev, &progress, &subs).await,
                                    Err(TryRecvError::Lagged(_)) => continue,
                                    Err(_) => break,
                                }
                            }
                            break;
                        }
                    }
                }
                subs.shutdown().await;
            }
        });

        Listener { stop, handle }
    }

    /// Joins every client, or switches to the grace wait on a shutdown request.
    async fn drive_shutdown(
        &self,
        set: &mut JoinSet<Client>,
        token: &CancellationToken,
    ) -> Result<Vec<Client>, RuntimeError> {
        let mut joined = Vec::with_capacity(set.len());
        let mut panicked = None;

        let requested = tokio::select! {
            res = shutdown::os_signal(self.os_signals) => Some(res),
            _ = self.runtime_token.cancelled() => Some(Ok("shutdown requested")),
            _ = join_all(set, &mut joined, &mut panicked) => None,
        };

        if let Some(res) = requested {
            let reason = match res {
                Ok(reason) => reason,
                Err(e) => {
                    token.cancel();
                    return Err(RuntimeError::Signal(e));
                }
            };
            self.bus.publish(Event::new(EventKind::ShutdownRequested).with_reason(reason));
            token.cancel();
            self.wait_all_with_grace(set, &mut joined, &mut panicked).await?;
        }

        match panicked {
            Some(reason) => Err(RuntimeError::WorkerPanicked { reason }),
            None => Ok(joined),
        }
    }

    /// Waits up to [`Config::grace`] for the remaining clients.
    ///
    /// Publishes [`EventKind::AllStoppedWithin`] on success, or
    /// [`EventKind::GraceExceeded`] and returns [`RuntimeError::GraceExceeded`]
    /// with the clients still in flight.
    async fn wait_all_with_grace(
        &self,
        set: &mut JoinSet<Client>,
        joined: &mut Vec<Client>,
        panicked: &mut Option<String>,
    ) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let in_time = time::timeout(grace, join_all(set, joined, panicked))
            .await
            .is_ok();
        if in_time {
            self.bus.publish(Event::new(EventKind::AllStoppedWithin));
            return Ok(());
        }

        set.abort_all();
        Err(self.grace_exceeded().await)
    }

    /// Waits up to [`Config::grace`] until every one of `arrived` detached
    /// clients has finished or been abandoned.
    async fn drain_open(&self, arrived: u64) -> Result<(), RuntimeError> {
        let progress = &self.progress;
        let drained = async {
            loop {
                let left = progress.left();
                if progress.settled().await as u64 >= arrived {
                    break;
                }
                left.await;
            }
        };
        if time::timeout(self.cfg.grace, drained).await.is_ok() {
            self.bus.publish(Event::new(EventKind::AllStoppedWithin));
            return Ok(());
        }
        Err(self.grace_exceeded().await)
    }

    /// Publishes [`EventKind::GraceExceeded`] naming the clients still in flight.
    async fn grace_exceeded(&self) -> RuntimeError {
        let stuck = self.progress.snapshot_in_flight().await;
        let names: Vec<String> = stuck.iter().map(ToString::to_string).collect();
        self.bus
            .publish(Event::new(EventKind::GraceExceeded).with_reason(names.join(",")));
        RuntimeError::GraceExceeded {
            grace: self.cfg.grace,
            stuck,
        }
    }
}

impl Drop for ServiceCenter {
    fn drop(&mut self) {
        self.runtime_token.cancel();
    }
}

struct Listener {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

impl Listener {
    /// Delivers everything already on the bus, then stops the subscriber workers.
    async fn finish(self) {
        self.stop.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "event listener failed");
        }
    }
}

async fn forward(ev: &Event, progress: &ProgressTracker, subs: &SubscriberSet) {
    progress.update(ev).await;
    subs.emit(ev);
}

async fn join_all(
    set: &mut JoinSet<Client>,
    joined: &mut Vec<Client>,
    panicked: &mut Option<String>,
) {
    while let Some(res) = set.join_next().await {
        match res {
            Ok(client) => joined.push(client),
            Err(e) if e.is_panic() => {
                let reason = panic_message(e.into_panic().as_ref());
                tracing::error!(%reason, "client worker panicked");
                panicked.get_or_insert(reason);
            }
            Err(e) => {
                tracing::warn!(error = %e, "client worker cancelled");
            }
        }
    }
}
