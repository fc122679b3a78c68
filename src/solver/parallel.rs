use std::{sync::Arc, thread};

use self::partition::partition_prefixes;
use super::{
    search::SearchContext,
    shared::{Progress, SharedSearchState},
    Solver,
};
use crate::formula::{Cnf, Model};
use crate::prelude::*;

mod partition;

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display(
        "Prefix length {} exceeds the variable count ({})",
        prefix_length,
        num_variables
    ))]
    PrefixTooLong {
        prefix_length: usize,
        num_variables: usize,
    },
    #[snafu(display(
        "Prefix length {} asks for more workers than the platform can address",
        prefix_length
    ))]
    TooManyWorkers { prefix_length: usize },
}

/// Splits the assignment space into `2^prefix_length` fixed-prefix
/// subspaces and searches each on its own OS thread.
///
/// The first worker to find a satisfying assignment claims the shared
/// result slot and raises the stop flag; the others abandon their search at
/// the next flag check. Which worker wins when several partitions are
/// satisfiable at once is not defined and may vary between runs; any
/// returned model satisfies the formula either way.
pub struct ParallelSolver {
    formula: Cnf,
    shared: Arc<SharedSearchState>,
    prefix_length: usize,
}

impl ParallelSolver {
    /// Creates a solver with an explicit prefix length (worker count
    /// `2^prefix_length`), validated against the formula.
    pub fn with_prefix_length(formula: Cnf, prefix_length: usize) -> Result<Self, ConfigError> {
        ensure!(
            prefix_length <= formula.num_variables(),
            PrefixTooLong {
                prefix_length,
                num_variables: formula.num_variables(),
            }
        );
        ensure!(
            prefix_length < usize::BITS as usize,
            TooManyWorkers { prefix_length }
        );

        Ok(ParallelSolver {
            formula,
            shared: SharedSearchState::new(),
            prefix_length,
        })
    }

    /// Smallest prefix length giving at least one worker per available
    /// core, clamped to the variable count for degenerate formulas.
    fn default_prefix_length(num_variables: usize) -> usize {
        let threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let mut prefix_length = 0;
        while 1usize << prefix_length < threads {
            prefix_length += 1;
        }

        prefix_length.min(num_variables)
    }
}

impl Solver for ParallelSolver {
    fn new(formula: Cnf) -> Self {
        let prefix_length = Self::default_prefix_length(formula.num_variables());

        // The default prefix length is clamped, so this cannot fail.
        Self::with_prefix_length(formula, prefix_length).unwrap()
    }

    fn solve(self) -> Option<Model> {
        let ParallelSolver {
            formula,
            shared,
            prefix_length,
        } = self;

        let formula = Arc::new(formula);
        let prefixes = partition_prefixes(prefix_length);
        debug!(
            "spawning {} workers (prefix length {})",
            prefixes.len(),
            prefix_length
        );

        let mut workers = Vec::with_capacity(prefixes.len());
        for (ordinal, prefix) in prefixes.iter_enumerated() {
            let formula = Arc::clone(&formula);
            let shared = Arc::clone(&shared);
            let prefix = prefix.clone();

            // Each worker owns its argument bundle outright: Arc handles
            // plus its prefix. Nothing borrows from this stack frame.
            workers.push(thread::spawn(move || {
                let mut assignment = vec![true; formula.num_variables()];
                assignment[..prefix_length].copy_from_slice(&prefix);

                let context = SearchContext::new(&formula, &shared, assignment);
                match context.run(prefix_length) {
                    Some(assignment) => {
                        if shared.claim(assignment) {
                            debug!("worker {} claimed a satisfying assignment", ordinal);
                        }
                    }
                    None => trace!("worker {} finished its partition", ordinal),
                }
            }));
        }

        for worker in workers {
            worker.join().expect("worker thread panicked");
        }

        debug!(
            "all workers joined after {} backtracks",
            shared.backtracks()
        );

        // All workers have joined, so this is normally the last handle.
        let formula = match Arc::try_unwrap(formula) {
            Ok(formula) => formula,
            Err(still_shared) => (*still_shared).clone(),
        };

        shared
            .take_winner()
            .map(|assignment| Model::new(formula, assignment))
    }

    fn progress(&self) -> Progress {
        Progress::new(Arc::clone(&self.shared))
    }
}
