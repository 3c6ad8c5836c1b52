//! # Outcome of a run.

use crate::{
    client::Client,
    station::{StationId, StationSet, TaskKind},
};

/// Counters of one station at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationStats {
    pub station: StationId,
    pub kind: TaskKind,
    pub capacity: usize,
    /// Highest occupancy ever observed.
    pub peak: usize,
    /// Successful admissions since the center was built.
    pub admissions: u64,
    /// Occupancy when the report was taken.
    pub occupancy: usize,
}

/// What a run produced.
///
/// Closed runs list every joined client (sorted by id); open runs detach their
/// workers, so `clients` is empty and only `arrived` counts them.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub arrived: u64,
    pub clients: Vec<Client>,
    pub stations: Vec<StationStats>,
}

impl RunReport {
    pub(crate) fn new(arrived: u64, mut clients: Vec<Client>, stations: &StationSet) -> Self {
        clients.sort_unstable_by_key(|c| c.id());
        let stations = stations
            .iter()
            .map(|st| StationStats {
                station: st.id(),
                kind: st.kind(),
                capacity: st.capacity(),
                peak: st.peak(),
                admissions: st.admissions(),
                occupancy: st.occupancy(),
            })
            .collect();
        Self {
            arrived,
            clients,
            stations,
        }
    }

    /// Number of joined clients that completed every task.
    pub fn finished(&self) -> usize {
        self.clients.iter().filter(|c| c.is_done()).count()
    }

    /// True when every joined client completed every task.
    pub fn all_done(&self) -> bool {
        self.clients.iter().all(Client::is_done)
    }

    /// Stats of the station servicing `kind`.
    pub fn station(&self, kind: TaskKind) -> Option<&StationStats> {
        self.stations.iter().find(|s| s.kind == kind)
    }
}
