//! # Demo: closed_center
//!
//! Six clients share four stations of capacity two. A custom subscriber prints
//! a compact occupancy trace next to the `tracing` output of [`LogWriter`].
//!
//! ```text
//! ServiceCenter::run_closed(6)
//!     ├─► ClientActor × 6 ─► publish(ClientAdmitted / TaskFinished / ...)
//!     └─► listener ─► ProgressTracker.update()
//!                  └─► SubscriberSet.emit() ─► LogWriter, OccupancyTrace
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example closed_center
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use stationvisor::{
    Config, Event, EventKind, LogWriter, LoggerConfig, ServiceCenter, Subscribe, TaskKind,
    logger_init,
};

/// Keeps a running occupancy per station from admissions and finishes.
#[derive(Default)]
struct OccupancyTrace {
    per_station: [AtomicI64; TaskKind::COUNT],
}

#[async_trait::async_trait]
impl Subscribe for OccupancyTrace {
    async fn on_event(&self, ev: &Event) {
        let (Some(kind), Some(client)) = (ev.task_kind, ev.client) else {
            return;
        };
        let slot = &self.per_station[kind.index()];
        let now = match ev.kind {
            EventKind::ClientAdmitted => slot.fetch_add(1, Ordering::Relaxed) + 1,
            EventKind::TaskFinished => slot.fetch_sub(1, Ordering::Relaxed) - 1,
            _ => return,
        };
        println!("[trace] {client} {:<10} {kind:<10} occupancy={now}", label(ev.kind));
    }

    fn name(&self) -> &'static str {
        "occupancy_trace"
    }
}

fn label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::ClientAdmitted => "admitted",
        _ => "finished",
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger_init(&LoggerConfig::default())?;

    let cfg = Config {
        capacity: 2,
        clients: 6,
        ..Config::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter), Arc::new(OccupancyTrace::default())];
    let center = ServiceCenter::builder(cfg.clone()).with_subscribers(subs).build()?;

    let report = center.run_closed(cfg.clients).await?;

    println!();
    for st in &report.stations {
        println!(
            "{} ({}): peak {}/{} admissions {}",
            st.station, st.kind, st.peak, st.capacity, st.admissions
        );
    }
    for client in &report.clients {
        let order: Vec<&str> = client.history().iter().map(|k| k.as_str()).collect();
        println!("{}: {}", client.id(), order.join(" -> "));
    }
    Ok(())
}
