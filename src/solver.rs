use crate::formula::{Cnf, Model};

mod exhaustive;
mod parallel;
mod search;
mod shared;

pub use exhaustive::ExhaustiveSolver;
pub use parallel::{ConfigError, ParallelSolver};
pub use shared::Progress;

pub trait Solver {
    /// Creates a new solver instance.
    fn new(formula: Cnf) -> Self;

    /// Solves a CNF SAT problem with the solver.
    /// Returns `Some(Model)` if satisfiable, `None` otherwise.
    fn solve(self) -> Option<Model>;

    /// Returns a read-only handle to the solver's backtrack counter.
    /// The handle stays valid while `solve` runs and can be polled from
    /// another thread.
    fn progress(&self) -> Progress;
}
