use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

/// State shared between every worker of one solver run.
#[derive(Debug, Default)]
pub(super) struct SharedSearchState {
    /// Raised once the outcome is decided; never lowered again.
    stop: AtomicBool,
    /// Total backtrack events across all workers.
    backtracks: AtomicU64,
    /// The first satisfying assignment claimed by a worker.
    winner: Mutex<Option<Vec<bool>>>,
}

impl SharedSearchState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Checked by the search engine on entry to every call.
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn record_backtrack(&self) {
        self.backtracks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn backtracks(&self) -> u64 {
        self.backtracks.load(Ordering::Relaxed)
    }

    /// Publishes a satisfying assignment and raises the stop flag.
    ///
    /// First writer wins: the winner slot and the flag are updated under one
    /// lock, so a later claim can never overwrite or tear an earlier one.
    /// Returns whether this claim won.
    pub fn claim(&self, assignment: Vec<bool>) -> bool {
        let mut winner = self.winner.lock().unwrap();
        if winner.is_some() {
            return false;
        }

        *winner = Some(assignment);
        self.stop.store(true, Ordering::Release);
        true
    }

    /// Takes the winning assignment. Only meaningful after all workers have
    /// joined.
    pub fn take_winner(&self) -> Option<Vec<bool>> {
        self.winner.lock().unwrap().take()
    }
}

/// Read-only view of a running search, handed out to progress reporters.
/// Reads may lag behind the workers; that is acceptable for display.
#[derive(Clone, Debug)]
pub struct Progress(Arc<SharedSearchState>);

impl Progress {
    pub(super) fn new(shared: Arc<SharedSearchState>) -> Self {
        Progress(shared)
    }

    /// Current number of backtrack events across all workers.
    pub fn backtracks(&self) -> u64 {
        self.0.backtracks()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn first_claim_wins() {
        let shared = SharedSearchState::new();

        assert!(!shared.stop_requested());
        assert!(shared.claim(vec![true]));
        assert!(shared.stop_requested());

        assert!(!shared.claim(vec![false]));
        assert!(shared.stop_requested());

        assert_eq!(shared.take_winner(), Some(vec![true]));
    }

    #[test]
    fn no_winner_without_claim() {
        let shared = SharedSearchState::new();
        assert_eq!(shared.take_winner(), None);
    }

    #[test]
    fn concurrent_backtracks_are_not_lost() {
        let shared = SharedSearchState::new();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        shared.record_backtrack();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.backtracks(), 4000);
    }

    #[test]
    fn concurrent_claims_elect_exactly_one_winner() {
        let shared = SharedSearchState::new();

        let handles: Vec<_> = (0..8usize)
            .map(|id| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || shared.claim(vec![id % 2 == 0]))
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&won| won)
            .count();

        assert_eq!(wins, 1);
        assert!(shared.take_winner().is_some());
    }
}
