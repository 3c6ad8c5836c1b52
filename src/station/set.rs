use std::sync::Arc;

use super::{Station, TaskKind};

/// The fixed set of stations, one per [`TaskKind`], in scan order.
///
/// Cheap to clone; all clones share the same stations.
#[derive(Clone, Debug)]
pub struct StationSet {
    stations: Arc<[Station; TaskKind::COUNT]>,
}

impl StationSet {
    /// Creates one station per task kind, all with the same capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            stations: Arc::new(TaskKind::ALL.map(|kind| Station::new(kind, capacity))),
        }
    }

    /// Station servicing `kind`.
    #[inline]
    pub fn get(&self, kind: TaskKind) -> &Station {
        &self.stations[kind.index()]
    }

    /// Stations in deterministic scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Sum of current occupancy across all stations.
    pub fn total_occupancy(&self) -> usize {
        self.iter().map(Station::occupancy).sum()
    }
}
