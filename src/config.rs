//! # Service center configuration.
//!
//! Provides [`Config`], the centralized settings for a run.
//!
//! Config is used in two ways:
//! 1. **Center creation**: `ServiceCenter::builder(config).build()` validates it.
//! 2. **Entry points**: `run_closed` / `run_open` re-validate the variant-specific fields.
//!
//! ## Validation
//! - `capacity = 0` → [`ConfigError::ZeroCapacity`]
//! - `clients = 0` (closed only) → [`ConfigError::ZeroClients`]
//! - `arrival_interval = 0s` (open only) → [`ConfigError::ZeroInterval`]
//! - `service_min > service_max` → [`ConfigError::InvalidServiceTime`]

use std::time::Duration;

use crate::{error::ConfigError, policies::BackoffPolicy, service::RandomServiceTime};

/// Runtime configuration of a service center.
///
/// ## Field semantics
/// - `capacity`: concurrent occupants per station (same for every station)
/// - `clients`: population size of a closed run
/// - `arrival_interval`: gap between generated clients in an open run
/// - `backoff`: delay schedule between failed admission scans
/// - `service_min` / `service_max`: bounds of the default random service time
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `grace`: how long a run waits for clients after a shutdown request
#[derive(Clone, Debug)]
pub struct Config {
    pub capacity: usize,
    pub clients: usize,
    pub arrival_interval: Duration,
    pub backoff: BackoffPolicy,
    pub service_min: Duration,
    pub service_max: Duration,
    /// Slow subscribers that lag more than this many events skip the oldest ones.
    pub bus_capacity: usize,
    pub grace: Duration,
}

impl Config {
    /// Checks the fields shared by both arrival variants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.service_min > self.service_max {
            return Err(ConfigError::InvalidServiceTime {
                min: self.service_min,
                max: self.service_max,
            });
        }
        Ok(())
    }

    /// Checks a closed population of `clients`.
    pub fn validate_closed(&self, clients: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if clients == 0 {
            return Err(ConfigError::ZeroClients);
        }
        Ok(())
    }

    /// Checks an open run generating one client per `interval`.
    pub fn validate_open(&self, interval: Duration) -> Result<(), ConfigError> {
        self.validate()?;
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// Default random service time derived from `service_min`/`service_max`.
    pub fn service_time(&self) -> RandomServiceTime {
        RandomServiceTime::new(self.service_min, self.service_max)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `capacity = 1`, `clients = 4`
    /// - `arrival_interval = 1s`
    /// - `backoff = BackoffPolicy::default()` (fixed 100ms)
    /// - service time 0.5s..=1.5s
    /// - `bus_capacity = 1024`, `grace = 10s`
    fn default() -> Self {
        Self {
            capacity: 1,
            clients: 4,
            arrival_interval: Duration::from_secs(1),
            backoff: BackoffPolicy::default(),
            service_min: RandomServiceTime::CLOSED.min,
            service_max: RandomServiceTime::CLOSED.max,
            bus_capacity: 1024,
            grace: Duration::from_secs(10),
        }
    }
}
