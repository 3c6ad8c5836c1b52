use std::fmt;

/// Maintenance task kinds. Each station services exactly one kind.
///
/// The declaration order is the deterministic station scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskKind {
    Battery,
    Engine,
    Steering,
    Navigation,
}

impl TaskKind {
    /// Number of task kinds (and therefore stations).
    pub const COUNT: usize = 4;

    /// All kinds in scan order.
    pub const ALL: [TaskKind; TaskKind::COUNT] = [
        TaskKind::Battery,
        TaskKind::Engine,
        TaskKind::Steering,
        TaskKind::Navigation,
    ];

    /// Zero-based position in [`TaskKind::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Station servicing this kind.
    #[inline]
    pub fn station(self) -> StationId {
        StationId(self.index() as u8 + 1)
    }

    /// Human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Battery => "battery",
            TaskKind::Engine => "engine",
            TaskKind::Steering => "steering",
            TaskKind::Navigation => "navigation system",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Stable station identity, 1-based for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(u8);

impl StationId {
    /// Raw 1-based id.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Task kind serviced by this station.
    #[inline]
    pub fn kind(self) -> TaskKind {
        TaskKind::ALL[usize::from(self.0) - 1]
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_ids_follow_scan_order() {
        let ids: Vec<u8> = TaskKind::ALL.iter().map(|k| k.station().get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn station_id_maps_back_to_kind() {
        for kind in TaskKind::ALL {
            assert_eq!(kind.station().kind(), kind);
        }
        assert_eq!(TaskKind::Navigation.station().to_string(), "station-4");
    }
}
