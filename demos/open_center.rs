//! # Demo: open_center
//!
//! Generates one client every 300ms against stations of capacity one, then
//! requests shutdown after five seconds. Detached clients are cancelled and
//! give their slots back.
//!
//! ## Run
//! ```bash
//! cargo run --example open_center
//! # or stop it early with Ctrl-C
//! ```

use std::sync::Arc;
use std::time::Duration;

use stationvisor::{
    Config, LogWriter, LoggerConfig, RandomServiceTime, ServiceCenter, logger_init,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger_init(&LoggerConfig {
        level: "stationvisor=debug".into(),
        ..LoggerConfig::default()
    })?;

    let cfg = Config {
        capacity: 1,
        arrival_interval: Duration::from_millis(300),
        ..Config::default()
    };
    let center = ServiceCenter::builder(cfg.clone())
        .with_subscriber(Arc::new(LogWriter))
        .with_service_time(RandomServiceTime::OPEN)
        .build()?;

    let (report, ()) = tokio::join!(center.run_open(cfg.arrival_interval), async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        center.shutdown();
    });
    let report = report?;

    println!();
    println!("arrived: {}", report.arrived);
    for st in &report.stations {
        println!("{}: peak {} admissions {}", st.station, st.peak, st.admissions);
    }
    Ok(())
}
