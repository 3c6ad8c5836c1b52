//! Process-wide `tracing` setup.
//!
//! Library code only emits `tracing` records; binaries and demos call
//! [`logger_init`] once to install a subscriber.
//!
//! ```no_run
//! use stationvisor::{LoggerConfig, LoggerFormat, logger_init};
//!
//! let cfg = LoggerConfig {
//!     format: LoggerFormat::Json,
//!     level: "stationvisor=debug".into(),
//!     ..LoggerConfig::default()
//! };
//! logger_init(&cfg).expect("logger");
//! ```

mod config;
mod error;
mod format;
mod log;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;

/// Installs the global subscriber described by `cfg`.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => log::Logger::text(cfg),
        LoggerFormat::Json => log::Logger::json(cfg),
    }
}
