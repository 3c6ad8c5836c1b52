//! Error types used by the service center runtime.
//!
//! This module defines two main error enums:
//!
//! - [`ConfigError`]: invalid startup configuration, rejected before any client starts.
//! - [`RuntimeError`]: failures of the running system itself.
//!
//! Contention on a full station is **not** an error: it is handled entirely by the
//! admission loop and only surfaces as an informational [`EventKind::ClientWaiting`](crate::EventKind::ClientWaiting).
//!
//! Both types provide an `as_label` helper for logs/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::client::ClientId;

/// # Errors produced by configuration validation.
///
/// All variants are fatal: they are reported once and the process stops before
/// any worker is spawned.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Station capacity must allow at least one occupant.
    #[error("station capacity must be greater than zero")]
    ZeroCapacity,

    /// A closed system needs at least one client.
    #[error("client count must be greater than zero")]
    ZeroClients,

    /// An open system needs a non-zero arrival interval.
    #[error("arrival interval must be greater than zero")]
    ZeroInterval,

    /// Service time bounds are inverted.
    #[error("invalid service time range: min {min:?} > max {max:?}")]
    InvalidServiceTime {
        /// Lower bound.
        min: Duration,
        /// Upper bound.
        max: Duration,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use stationvisor::ConfigError;
    ///
    /// assert_eq!(ConfigError::ZeroCapacity.as_label(), "config_zero_capacity");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroCapacity => "config_zero_capacity",
            ConfigError::ZeroClients => "config_zero_clients",
            ConfigError::ZeroInterval => "config_zero_interval",
            ConfigError::InvalidServiceTime { .. } => "config_invalid_service_time",
        }
    }
}

/// # Errors produced by the running service center.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some clients were still in flight.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Clients that did not finish in time.
        stuck: Vec<ClientId>,
    },

    /// OS signal listeners could not be installed.
    #[error("failed to install shutdown signal handlers: {0}")]
    Signal(#[from] std::io::Error),

    /// A client worker panicked instead of returning its record.
    #[error("client worker panicked: {reason}")]
    WorkerPanicked {
        /// Panic payload or join error text.
        reason: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use stationvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::Signal(_) => "runtime_signal_init",
            RuntimeError::WorkerPanicked { .. } => "runtime_worker_panicked",
        }
    }
}

/// Top-level error for the entry points that both validate and run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CenterError {
    /// Rejected before anything started.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl CenterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CenterError::Config(e) => e.as_label(),
            CenterError::Runtime(e) => e.as_label(),
        }
    }

    /// True for errors raised before any worker was spawned.
    pub fn is_config(&self) -> bool {
        matches!(self, CenterError::Config(_))
    }
}
