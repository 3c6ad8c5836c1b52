//! Capacity-bounded service stations.
//!
//! ## Contents
//! - [`TaskKind`] the four task kinds, one per station, in fixed scan order
//! - [`StationId`] stable 1-based station identity
//! - [`Station`] occupancy counter + release signal
//! - [`StationSlot`] occupied slot, released on drop
//! - [`StationSet`] the fixed set of stations shared by every client
//!
//! ## Quick wiring
//! ```text
//! StationSet ──► core::admission::ClientActor
//!      └─► for kind in TaskKind::ALL (skip completed):
//!            station.try_acquire() ─► first success wins
//!            ... serve ...
//!            station.release()     ─► occupancy -1, notify waiters
//! ```

mod kind;
mod set;
mod station;

pub use kind::{StationId, TaskKind};
pub use set::StationSet;
pub use station::{Station, StationSlot};
