//! # Station: one capacity-bounded resource.
//!
//! A [`Station`] owns an occupancy counter guarded by its own mutex and a
//! [`Notify`] used as the release signal.
//!
//! ## Rules
//! - `0 <= occupancy <= capacity` at every observable point.
//! - The mutex is held only for the counter update, never across an `.await`.
//! - Every successful [`Station::try_acquire`] must be paired with exactly one
//!   [`Station::release`]; an unpaired release is a caller bug.
//! - Release wakes every client currently parked on [`Station::released`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{Notify, futures::Notified};

use super::{StationId, TaskKind};

#[derive(Debug, Default)]
struct Occupancy {
    current: usize,
    peak: usize,
    admissions: u64,
}

/// Capacity-bounded service station.
#[derive(Debug)]
pub struct Station {
    kind: TaskKind,
    capacity: usize,
    occupancy: Mutex<Occupancy>,
    released: Notify,
}

impl Station {
    /// Creates an empty station servicing `kind`.
    ///
    /// Capacity is validated by [`Config`](crate::Config) before stations exist;
    /// a zero-capacity station simply never admits anyone.
    pub fn new(kind: TaskKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            occupancy: Mutex::new(Occupancy::default()),
            released: Notify::new(),
        }
    }

    /// Station identity.
    #[inline]
    pub fn id(&self) -> StationId {
        self.kind.station()
    }

    /// Task kind serviced here.
    #[inline]
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Maximum concurrent occupants.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Non-blocking attempt to occupy one slot.
    ///
    /// Returns `true` and increments occupancy iff a slot was free.
    pub fn try_acquire(&self) -> bool {
        let mut occ = self.lock();
        if occ.current >= self.capacity {
            return false;
        }
        occ.current += 1;
        occ.peak = occ.peak.max(occ.current);
        occ.admissions += 1;
        true
    }

    /// Like [`Station::try_acquire`], but returns a slot that releases on drop.
    pub fn try_slot(&self) -> Option<StationSlot<'_>> {
        self.try_acquire().then(|| StationSlot { station: self })
    }

    /// Frees one slot and wakes clients waiting on this station.
    pub fn release(&self) {
        {
            let mut occ = self.lock();
            if occ.current == 0 {
                debug_assert!(false, "release without matching acquire");
                tracing::error!(station = %self.id(), "release without matching acquire");
                return;
            }
            occ.current -= 1;
        }
        self.released.notify_waiters();
    }

    /// Resolves on the next [`Station::release`] after this call.
    ///
    /// The future counts releases from the moment it is created, even if it is
    /// polled later, so create it **before** scanning to avoid missing a wake-up.
    pub fn released(&self) -> Notified<'_> {
        self.released.notified()
    }

    /// Current number of occupants.
    pub fn occupancy(&self) -> usize {
        self.lock().current
    }

    /// Highest occupancy observed since creation.
    pub fn peak(&self) -> usize {
        self.lock().peak
    }

    /// Number of successful acquisitions since creation.
    pub fn admissions(&self) -> u64 {
        self.lock().admissions
    }

    // The counter is always consistent when the guard drops, so a poisoned
    // lock carries no torn state.
    fn lock(&self) -> MutexGuard<'_, Occupancy> {
        self.occupancy.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An occupied slot at a [`Station`].
///
/// While held it counts against the station's capacity; dropping it releases
/// the slot exactly once, including when the holder is cancelled or panics.
pub struct StationSlot<'a> {
    station: &'a Station,
}

impl StationSlot<'_> {
    /// The station this slot belongs to.
    pub fn station(&self) -> &Station {
        self.station
    }

    /// Task kind serviced by the occupied station.
    pub fn kind(&self) -> TaskKind {
        self.station.kind
    }
}

impl Drop for StationSlot<'_> {
    fn drop(&mut self) {
        self.station.release();
    }
}

impl std::fmt::Debug for StationSlot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationSlot")
            .field("station", &self.station.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn acquire_up_to_capacity() {
        let st = Station::new(TaskKind::Engine, 2);
        assert!(st.try_acquire());
        assert!(st.try_acquire());
        assert!(!st.try_acquire());
        assert_eq!(st.occupancy(), 2);
        assert_eq!(st.admissions(), 2);
    }

    #[test]
    fn release_frees_a_slot() {
        let st = Station::new(TaskKind::Battery, 1);
        assert!(st.try_acquire());
        assert!(!st.try_acquire());
        st.release();
        assert_eq!(st.occupancy(), 0);
        assert!(st.try_acquire());
        assert_eq!(st.peak(), 1);
    }

    #[test]
    fn slot_releases_on_drop() {
        let st = Station::new(TaskKind::Engine, 1);
        let slot = st.try_slot().expect("free slot");
        assert_eq!(slot.kind(), TaskKind::Engine);
        assert!(st.try_slot().is_none());
        drop(slot);
        assert_eq!(st.occupancy(), 0);
        assert!(st.try_slot().is_some());
    }

    #[test]
    fn zero_capacity_never_admits() {
        let st = Station::new(TaskKind::Steering, 0);
        assert!(!st.try_acquire());
        assert_eq!(st.occupancy(), 0);
    }

    #[test]
    fn concurrent_acquire_respects_capacity() {
        let st = Arc::new(Station::new(TaskKind::Navigation, 3));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let st = Arc::clone(&st);
                std::thread::spawn(move || {
                    let mut held = 0;
                    for _ in 0..1000 {
                        if st.try_acquire() {
                            assert!(st.occupancy() <= 3);
                            st.release();
                            held += 1;
                        }
                    }
                    held
                })
            })
            .collect();

        let total: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(st.occupancy(), 0);
        assert!(st.peak() <= 3);
        assert_eq!(st.admissions(), total);
    }

    #[tokio::test]
    async fn release_wakes_waiter_created_before_release() {
        let st = Arc::new(Station::new(TaskKind::Engine, 1));
        assert!(st.try_acquire());

        let waiter = {
            let st = Arc::clone(&st);
            tokio::spawn(async move {
                st.released().await;
                st.try_acquire()
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        st.release();

        let admitted = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be woken")
            .unwrap();
        assert!(admitted);
    }
}
