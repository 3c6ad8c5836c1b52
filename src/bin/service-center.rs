//! service-center: run a closed or open service center from the command line.
//!
//! ```text
//! service-center closed <clients> <capacity>
//! service-center open <capacity> [--interval-ms 1000]
//! ```
//!
//! Invalid capacity or client count is reported before any client starts and
//! exits non-zero. A closed run that completes exits zero.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use stationvisor::{
    ArrivalSource, CenterError, Config, LogWriter, LoggerConfig, LoggerFormat, RandomServiceTime,
    ServiceCenter, logger_init,
};

#[derive(Parser)]
#[command(name = "service-center")]
#[command(about = "Clients visiting four capacity-bounded service stations", long_about = None)]
struct Args {
    /// Log filter directive (e.g. `info`, `stationvisor=debug`)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    log_format: LoggerFormat,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Fixed population; exits when every client has finished
    Closed {
        /// Number of clients
        #[arg(allow_negative_numbers = true)]
        clients: i64,
        /// Occupants allowed per station
        #[arg(allow_negative_numbers = true)]
        capacity: i64,
    },
    /// One new client per interval until interrupted
    Open {
        /// Occupants allowed per station
        #[arg(allow_negative_numbers = true)]
        capacity: i64,
        /// Milliseconds between arrivals
        #[arg(long, default_value = "1000")]
        interval_ms: u64,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log = LoggerConfig {
        format: args.log_format,
        level: args.log_level.clone(),
        ..LoggerConfig::default()
    };
    if let Err(e) = logger_init(&log) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(args.mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CenterError>() {
                Some(CenterError::Config(cfg)) => {
                    tracing::error!(label = cfg.as_label(), "invalid configuration: {cfg}");
                }
                _ => tracing::error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(mode: Mode) -> anyhow::Result<()> {
    let (cfg, source) = match mode {
        Mode::Closed { clients, capacity } => {
            let cfg = Config {
                capacity: non_negative(capacity),
                clients: non_negative(clients),
                ..Config::default()
            };
            let source = ArrivalSource::closed_from(&cfg);
            (cfg, source)
        }
        Mode::Open {
            capacity,
            interval_ms,
        } => {
            let cfg = Config {
                capacity: non_negative(capacity),
                arrival_interval: Duration::from_millis(interval_ms),
                service_min: RandomServiceTime::OPEN.min,
                service_max: RandomServiceTime::OPEN.max,
                ..Config::default()
            };
            let source = ArrivalSource::open_from(&cfg);
            (cfg, source)
        }
    };
    source.validate(&cfg).map_err(CenterError::from)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(async move {
        let center = ServiceCenter::builder(cfg)
            .with_subscriber(std::sync::Arc::new(LogWriter))
            .build()
            .map_err(CenterError::from)?;

        let report = center.run(source).await?;
        for st in &report.stations {
            tracing::info!(
                station = %st.station,
                task = st.kind.as_str(),
                peak = st.peak,
                admissions = st.admissions,
                "station summary"
            );
        }
        tracing::info!(arrived = report.arrived, finished = report.finished(), "done");
        Ok::<(), anyhow::Error>(())
    })
}

/// Negative counts collapse to zero so validation reports them.
fn non_negative(v: i64) -> usize {
    usize::try_from(v).unwrap_or(0)
}
