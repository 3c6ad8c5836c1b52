use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{center::ServiceCenter, progress::ProgressTracker};
use crate::{
    client::ClientIds,
    config::Config,
    error::ConfigError,
    events::Bus,
    service::ServiceTime,
    station::StationSet,
    subscribers::Subscribe,
};

/// Builder for a [`ServiceCenter`].
pub struct ServiceCenterBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    service: Option<Arc<dyn ServiceTime>>,
    os_signals: bool,
}

impl ServiceCenterBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            service: None,
            os_signals: true,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Each subscriber gets a dedicated worker with a bounded queue for every run.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Replaces the random service time derived from the config.
    pub fn with_service_time(mut self, service: impl ServiceTime) -> Self {
        self.service = Some(Arc::new(service));
        self
    }

    /// Whether runs listen for OS termination signals (default `true`).
    ///
    /// Embedders that own signal handling turn this off and call
    /// [`ServiceCenter::shutdown`] themselves.
    pub fn with_os_signals(mut self, enabled: bool) -> Self {
        self.os_signals = enabled;
        self
    }

    /// Validates the shared config fields and builds the center.
    ///
    /// Nothing is spawned here; workers start with [`ServiceCenter::run`].
    pub fn build(self) -> Result<ServiceCenter, ConfigError> {
        self.cfg.validate()?;

        let service: Arc<dyn ServiceTime> = match self.service {
            Some(s) => s,
            None => Arc::new(self.cfg.service_time()),
        };
        let stations = StationSet::new(self.cfg.capacity);
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        Ok(ServiceCenter::new_internal(
            self.cfg,
            stations,
            bus,
            self.subscribers,
            Arc::new(ProgressTracker::new()),
            service,
            ClientIds::new(),
            CancellationToken::new(),
            self.os_signals,
        ))
    }
}
