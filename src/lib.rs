//! # stationvisor
//!
//! **Stationvisor** runs clients through a fixed set of capacity-bounded
//! service stations.
//!
//! Every client must complete one task of each [`TaskKind`], in any order.
//! A client never queues at a station: it scans the stations of its pending
//! tasks in a fixed order, takes the first free slot, and otherwise backs off
//! and scans again. A release at any eligible station cuts the backoff short.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!               ArrivalSource
//!        Closed { N }  │  Open { interval }
//!                      ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  ServiceCenter                                                │
//! │  - StationSet (4 stations, shared capacity)                   │
//! │  - Bus (broadcast events)                                     │
//! │  - ProgressTracker (per-client state, stuck list on shutdown) │
//! │  - SubscriberSet (fans out to user subscribers)               │
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        ▼                  ▼                  ▼
//!   ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//!   │ ClientActor │    │ ClientActor │    │ ClientActor │
//!   │ (scan loop) │    │ (scan loop) │    │ (scan loop) │
//!   └──────┬──────┘    └──────┬──────┘    └──────┬──────┘
//!          │ try_slot / release (per-station mutex + Notify)
//!          ▼
//!   Station 1: battery   Station 2: engine   Station 3: steering   Station 4: navigation
//!
//!   ClientActor ── publish(Event) ──► Bus ──► listener ──► ProgressTracker
//!                                                     └──► SubscriberSet ──► LogWriter, ...
//! ```
//!
//! ### Client lifecycle
//! ```text
//! ClientArrived
//! loop while tasks remain {
//!   ├─► scan pending kinds in order, first free station wins
//!   │     ├─ admitted ─► ClientAdmitted ─► TaskStarted ─► sleep(service) ─► TaskFinished ─► release
//!   │     └─ all full ─► ClientWaiting ─► sleep(backoff) | any eligible release | cancelled
//! }
//! ClientFinished            (ClientAbandoned when cancelled by shutdown)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types                                  |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Stations**      | Bounded occupancy with release signalling.               | [`Station`], [`StationSet`], [`StationSlot`] |
//! | **Clients**       | Identity and completed-task record.                      | [`Client`], [`ClientId`]                   |
//! | **Admission**     | First-fit scan, backoff, early wake-up.                  | [`ClientActor`], [`BackoffPolicy`]         |
//! | **Runs**          | Closed and open arrival, graceful shutdown.              | [`ServiceCenter`], [`ArrivalSource`]       |
//! | **Observability** | Events at every transition, pluggable subscribers.       | [`Event`], [`Subscribe`], [`LogWriter`]    |
//! | **Errors**        | Fatal configuration and runtime failures.                | [`ConfigError`], [`RuntimeError`]          |
//! | **Logging**       | `tracing-subscriber` setup for binaries.                 | [`logger_init`], [`LoggerConfig`]          |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use stationvisor::{Config, FixedServiceTime, LogWriter, ServiceCenter, Subscribe, TaskKind};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { capacity: 2, ..Config::default() };
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
//!
//!     let center = ServiceCenter::builder(cfg)
//!         .with_subscribers(subs)
//!         .with_service_time(FixedServiceTime(Duration::from_millis(10)))
//!         .build()?;
//!
//!     let report = center.run_closed(6).await?;
//!     assert_eq!(report.finished(), 6);
//!     assert!(report.station(TaskKind::Battery).map_or(false, |s| s.peak <= 2));
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod core;
mod error;
mod events;
mod logger;
mod policies;
mod service;
mod station;
mod subscribers;

// ---- Public re-exports ----

pub use client::{Client, ClientId, ClientIds};
pub use config::Config;
pub use core::{
    ArrivalSource, ClientActor, ClientState, ProgressTracker, RunReport, ServiceCenter,
    ServiceCenterBuilder, StationStats,
};
pub use error::{CenterError, ConfigError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use logger::{LoggerConfig, LoggerError, LoggerFormat, logger_init};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use service::{FixedServiceTime, RandomServiceTime, ServiceTime};
pub use station::{Station, StationId, StationSet, StationSlot, TaskKind};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
