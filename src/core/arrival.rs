//! # Arrival sources.
//!
//! An [`ArrivalSource`] decides how clients enter the center:
//!
//! ```text
//! Closed { clients: N }   spawn N workers at once, join them all, report
//! Open   { interval }     one detached worker per interval until shutdown
//! ```

use std::time::Duration;

use crate::{config::Config, error::ConfigError};

/// How clients are generated for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalSource {
    /// A fixed population started together; the run ends when all of them finish.
    Closed {
        /// Population size.
        clients: usize,
    },
    /// An unbounded stream, one client per `interval`; the run ends on shutdown.
    Open {
        /// Gap between consecutive arrivals.
        interval: Duration,
    },
}

impl ArrivalSource {
    /// Closed source using [`Config::clients`].
    pub fn closed_from(cfg: &Config) -> Self {
        ArrivalSource::Closed {
            clients: cfg.clients,
        }
    }

    /// Open source using [`Config::arrival_interval`].
    pub fn open_from(cfg: &Config) -> Self {
        ArrivalSource::Open {
            interval: cfg.arrival_interval,
        }
    }

    /// Validates `cfg` together with this source's own parameter.
    pub fn validate(&self, cfg: &Config) -> Result<(), ConfigError> {
        match *self {
            ArrivalSource::Closed { clients } => cfg.validate_closed(clients),
            ArrivalSource::Open { interval } => cfg.validate_open(interval),
        }
    }

    /// True for the open variant.
    pub fn is_open(&self) -> bool {
        matches!(self, ArrivalSource::Open { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_follow_config() {
        let cfg = Config {
            clients: 7,
            arrival_interval: Duration::from_millis(250),
            ..Config::default()
        };
        assert_eq!(ArrivalSource::closed_from(&cfg), ArrivalSource::Closed { clients: 7 });
        assert!(ArrivalSource::open_from(&cfg).is_open());
    }

    #[test]
    fn validation_is_variant_specific() {
        let cfg = Config::default();
        assert_eq!(
            ArrivalSource::Closed { clients: 0 }.validate(&cfg),
            Err(ConfigError::ZeroClients)
        );
        assert_eq!(
            ArrivalSource::Open {
                interval: Duration::ZERO
            }
            .validate(&cfg),
            Err(ConfigError::ZeroInterval)
        );

        let bad = Config {
            capacity: 0,
            ..Config::default()
        };
        assert_eq!(
            ArrivalSource::open_from(&bad).validate(&bad),
            Err(ConfigError::ZeroCapacity)
        );
    }
}
