//! # Logging subscriber rendering events through `tracing`.
//!
//! [`LogWriter`] turns every [`Event`] into one structured `tracing` record.
//! Lifecycle transitions are logged at `info`, the busy-wait chatter
//! (`ClientWaiting`) at `debug`, and shutdown trouble at `warn`.
//!
//! ## Output (text format)
//! ```text
//! INFO arrived client=client-1 remaining=4
//! DEBUG waiting client=client-2 attempt=1 delay_ms=100
//! INFO admitted client=client-2 station=station-3 task=steering attempt=4
//! INFO task started client=client-2 station=station-3 task=steering service_ms=812
//! INFO task finished client=client-2 station=station-3 task=steering remaining=2
//! INFO finished client=client-2
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use stationvisor::{Config, LogWriter, ServiceCenter, Subscribe};
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
//! let center = ServiceCenter::builder(Config::default())
//!     .with_subscribers(subs)
//!     .build()?;
//! center.run_closed(4).await?;
//! # Ok(()) }
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Subscriber that logs each state transition with `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let client = e.client.map(tracing::field::display);
        let station = e.station.map(tracing::field::display);
        let task = e.task_kind.map(|k| k.as_str());

        match e.kind {
            EventKind::ClientArrived => {
                info!(seq = e.seq, client, remaining = e.remaining, "arrived");
            }
            EventKind::ClientWaiting => {
                debug!(
                    seq = e.seq,
                    client,
                    attempt = e.attempt,
                    delay_ms = e.delay_ms,
                    "waiting"
                );
            }
            EventKind::ClientAdmitted => {
                info!(seq = e.seq, client, station, task, attempt = e.attempt, "admitted");
            }
            EventKind::TaskStarted => {
                info!(seq = e.seq, client, station, task, service_ms = e.service_ms, "task started");
            }
            EventKind::TaskFinished => {
                info!(seq = e.seq, client, station, task, remaining = e.remaining, "task finished");
            }
            EventKind::ClientFinished => {
                info!(seq = e.seq, client, "finished");
            }
            EventKind::ClientAbandoned => {
                warn!(seq = e.seq, client, remaining = e.remaining, "abandoned");
            }
            EventKind::ShutdownRequested => {
                info!(seq = e.seq, reason = e.reason.as_deref(), "shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                info!(seq = e.seq, "all clients stopped within grace");
            }
            EventKind::GraceExceeded => {
                warn!(seq = e.seq, stuck = e.reason.as_deref(), "grace exceeded");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
