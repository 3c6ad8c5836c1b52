use crate::station::TaskKind;

use super::ClientId;

/// A client and its completed-task record.
///
/// ## Invariants
/// - each kind is recorded complete at most once;
/// - `remaining()` equals the number of required kinds not yet completed.
#[derive(Debug, Clone)]
pub struct Client {
    id: ClientId,
    required: [bool; TaskKind::COUNT],
    completed: [bool; TaskKind::COUNT],
    remaining: usize,
    history: Vec<TaskKind>,
}

impl Client {
    /// Creates a client that requires every task kind.
    pub fn new(id: ClientId) -> Self {
        Self {
            id,
            required: [true; TaskKind::COUNT],
            completed: [false; TaskKind::COUNT],
            remaining: TaskKind::COUNT,
            history: Vec::with_capacity(TaskKind::COUNT),
        }
    }

    /// Creates a client that requires only `kinds`; duplicates count once.
    ///
    /// An empty set yields a client that is done on arrival.
    pub fn with_required(id: ClientId, kinds: impl IntoIterator<Item = TaskKind>) -> Self {
        let mut required = [false; TaskKind::COUNT];
        for kind in kinds {
            required[kind.index()] = true;
        }
        Self {
            id,
            required,
            completed: [false; TaskKind::COUNT],
            remaining: required.iter().filter(|r| **r).count(),
            history: Vec::with_capacity(TaskKind::COUNT),
        }
    }

    #[inline]
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Number of required kinds still pending.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    pub fn is_complete(&self, kind: TaskKind) -> bool {
        self.completed[kind.index()]
    }

    /// Required kinds not completed yet, in station scan order.
    pub fn pending(&self) -> impl Iterator<Item = TaskKind> + '_ {
        TaskKind::ALL
            .into_iter()
            .filter(move |k| self.required[k.index()] && !self.completed[k.index()])
    }

    /// Completed kinds in completion order.
    pub fn history(&self) -> &[TaskKind] {
        &self.history
    }

    /// Records `kind` as complete.
    ///
    /// Returns `false` and leaves the record untouched if `kind` was already
    /// complete or is not required.
    pub fn mark_complete(&mut self, kind: TaskKind) -> bool {
        let i = kind.index();
        if !self.required[i] || self.completed[i] {
            return false;
        }
        self.completed[i] = true;
        self.remaining -= 1;
        self.history.push(kind);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_requires_everything() {
        let c = Client::new(ClientId::new(7));
        assert_eq!(c.remaining(), TaskKind::COUNT);
        assert_eq!(c.pending().collect::<Vec<_>>(), TaskKind::ALL.to_vec());
        assert!(!c.is_done());
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let mut c = Client::new(ClientId::new(1));
        assert!(c.mark_complete(TaskKind::Steering));
        assert!(!c.mark_complete(TaskKind::Steering));
        assert_eq!(c.remaining(), 3);
        assert_eq!(c.history(), &[TaskKind::Steering]);
        assert!(c.is_complete(TaskKind::Steering));
    }

    #[test]
    fn subset_client_only_needs_its_kinds() {
        let mut c = Client::with_required(
            ClientId::new(4),
            [TaskKind::Navigation, TaskKind::Engine, TaskKind::Engine],
        );
        assert_eq!(c.remaining(), 2);
        assert_eq!(
            c.pending().collect::<Vec<_>>(),
            vec![TaskKind::Engine, TaskKind::Navigation]
        );
        assert!(!c.mark_complete(TaskKind::Battery));
        assert_eq!(c.remaining(), 2);
        assert!(c.mark_complete(TaskKind::Engine));
        assert!(c.mark_complete(TaskKind::Navigation));
        assert!(c.is_done());
        assert!(Client::with_required(ClientId::new(5), Vec::<TaskKind>::new()).is_done());
    }

    #[test]
    fn pending_skips_completed_in_scan_order() {
        let mut c = Client::new(ClientId::new(1));
        c.mark_complete(TaskKind::Engine);
        c.mark_complete(TaskKind::Battery);
        assert_eq!(
            c.pending().collect::<Vec<_>>(),
            vec![TaskKind::Steering, TaskKind::Navigation]
        );
    }

    #[test]
    fn done_after_all_kinds_any_order() {
        let mut c = Client::new(ClientId::new(1));
        for kind in TaskKind::ALL.into_iter().rev() {
            assert!(c.mark_complete(kind));
        }
        assert!(c.is_done());
        assert_eq!(c.pending().count(), 0);
        assert_eq!(c.history().len(), TaskKind::COUNT);
    }
}
