//! # Service time: how long one task takes at a station.
//!
//! The admission loop treats task execution as an opaque delay. The length of
//! that delay comes from a [`ServiceTime`] provider so runs can be random
//! (realistic) or fixed (deterministic tests).
//!
//! - [`RandomServiceTime`] uniform in `[min, max]`
//! - [`FixedServiceTime`] always the same duration

use std::time::Duration;

use rand::Rng;

use crate::{client::ClientId, station::TaskKind};

/// Duration provider for one task at one station.
pub trait ServiceTime: Send + Sync + 'static {
    /// Returns how long `client` occupies the station servicing `kind`.
    fn duration(&self, client: ClientId, kind: TaskKind) -> Duration;
}

/// Constant service time.
#[derive(Clone, Copy, Debug)]
pub struct FixedServiceTime(pub Duration);

impl ServiceTime for FixedServiceTime {
    fn duration(&self, _client: ClientId, _kind: TaskKind) -> Duration {
        self.0
    }
}

/// Uniformly random service time in `[min, max]`.
#[derive(Clone, Copy, Debug)]
pub struct RandomServiceTime {
    pub min: Duration,
    pub max: Duration,
}

impl RandomServiceTime {
    /// Bounds used by the closed system (0.5s to 1.5s).
    pub const CLOSED: Self = Self {
        min: Duration::from_millis(500),
        max: Duration::from_millis(1500),
    };

    /// Bounds used by the open system (0.5s to 2.5s).
    pub const OPEN: Self = Self {
        min: Duration::from_millis(500),
        max: Duration::from_millis(2500),
    };

    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }
}

impl Default for RandomServiceTime {
    fn default() -> Self {
        Self::CLOSED
    }
}

impl ServiceTime for RandomServiceTime {
    fn duration(&self, _client: ClientId, _kind: TaskKind) -> Duration {
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        if min_ms >= max_ms {
            return self.min;
        }
        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    }
}

impl<F> ServiceTime for F
where
    F: Fn(ClientId, TaskKind) -> Duration + Send + Sync + 'static,
{
    fn duration(&self, client: ClientId, kind: TaskKind) -> Duration {
        self(client, kind)
    }
}
