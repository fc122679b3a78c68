use std::sync::Arc;

use super::{
    search::SearchContext,
    shared::{Progress, SharedSearchState},
    Solver,
};
use crate::formula::{Cnf, Model};

/// Single-threaded exhaustive search over the whole assignment space.
pub struct ExhaustiveSolver {
    formula: Cnf,
    shared: Arc<SharedSearchState>,
}

impl Solver for ExhaustiveSolver {
    fn new(formula: Cnf) -> Self {
        ExhaustiveSolver {
            formula,
            shared: SharedSearchState::new(),
        }
    }

    fn solve(self) -> Option<Model> {
        // The buffer starts all-true; the engine flips entries as it
        // backtracks.
        let assignment = vec![true; self.formula.num_variables()];
        let result = SearchContext::new(&self.formula, &self.shared, assignment).run(0);

        debug!(
            "exhaustive search finished after {} backtracks",
            self.shared.backtracks()
        );

        result.map(|assignment| Model::new(self.formula, assignment))
    }

    fn progress(&self) -> Progress {
        Progress::new(Arc::clone(&self.shared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::cnf;

    #[test]
    fn satisfiable_formula_yields_a_model() {
        let solver = ExhaustiveSolver::new(cnf(3, &[&[1, 2, 3]]));
        let model = solver.solve().unwrap();

        // Model construction verifies satisfaction; the tie-break makes the
        // all-true assignment the first hit here.
        assert_eq!(model.assignment(), &[true, true, true]);
    }

    #[test]
    fn unsatisfiable_formula_yields_none() {
        let solver = ExhaustiveSolver::new(cnf(1, &[&[1], &[-1]]));
        assert!(solver.solve().is_none());
    }

    #[test]
    fn progress_reports_full_exploration_on_unsat() {
        let solver = ExhaustiveSolver::new(cnf(
            2,
            &[&[1, 2], &[1, -2], &[-1, 2], &[-1, -2]],
        ));
        let progress = solver.progress();

        assert_eq!(progress.backtracks(), 0);
        assert!(solver.solve().is_none());
        assert_eq!(progress.backtracks(), 3);
    }

    #[test]
    fn empty_formula_is_satisfiable() {
        let solver = ExhaustiveSolver::new(cnf(0, &[]));
        let model = solver.solve().unwrap();
        assert!(model.assignment().is_empty());
    }
}
