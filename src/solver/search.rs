use super::shared::SharedSearchState;
use crate::formula::Cnf;

/// One worker's depth-first enumeration over its slice of the assignment
/// space. Borrows the shared formula read-only and owns its assignment
/// buffer.
pub(super) struct SearchContext<'a> {
    formula: &'a Cnf,
    shared: &'a SharedSearchState,
    assignment: Vec<bool>,
}

impl<'a> SearchContext<'a> {
    pub fn new(formula: &'a Cnf, shared: &'a SharedSearchState, assignment: Vec<bool>) -> Self {
        assert!(assignment.len() == formula.num_variables());

        SearchContext {
            formula,
            shared,
            assignment,
        }
    }

    /// Runs the search from `start_depth`, treating all variables below it
    /// as fixed. Returns the satisfying assignment if the subspace contains
    /// one, or `None` if it is exhausted (or another worker stopped us).
    pub fn run(mut self, start_depth: usize) -> Option<Vec<bool>> {
        if self.search(start_depth) {
            Some(self.assignment)
        } else {
            None
        }
    }

    /// Tries `true` then `false` at `depth`, recursing to the full
    /// assignment before any clause is checked. One backtrack is recorded
    /// per flip. The fixed true-before-false order makes the single-worker
    /// result the lexicographically first satisfying assignment.
    ///
    /// Recursion depth is bounded by the variable count, which is already
    /// capped in practice by the O(2^n) running time of the enumeration.
    fn search(&mut self, depth: usize) -> bool {
        if self.shared.stop_requested() {
            // Another worker already decided the outcome.
            return false;
        }

        if depth == self.formula.num_variables() {
            return self.formula.satisfied_by(&self.assignment);
        }

        self.assignment[depth] = true;
        if self.search(depth + 1) {
            return true;
        }

        self.shared.record_backtrack();
        self.assignment[depth] = false;
        self.search(depth + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::cnf;

    fn run(formula: &Cnf, shared: &SharedSearchState, start_depth: usize) -> Option<Vec<bool>> {
        let assignment = vec![true; formula.num_variables()];
        SearchContext::new(formula, shared, assignment).run(start_depth)
    }

    #[test]
    fn true_is_tried_before_false() {
        let formula = cnf(2, &[&[1], &[2]]);
        let shared = SharedSearchState::new();

        assert_eq!(run(&formula, &shared, 0), Some(vec![true, true]));
    }

    #[test]
    fn returns_lexicographically_first_assignment() {
        // x1 is forced false, so the first hit is [false, true].
        let formula = cnf(2, &[&[-1]]);
        let shared = SharedSearchState::new();

        assert_eq!(run(&formula, &shared, 0), Some(vec![false, true]));
    }

    #[test]
    fn unsat_run_backtracks_through_the_whole_space() {
        let formula = cnf(
            3,
            &[
                &[1, 2, 3],
                &[1, 2, -3],
                &[1, -2, 3],
                &[1, -2, -3],
                &[-1, 2, 3],
                &[-1, 2, -3],
                &[-1, -2, 3],
                &[-1, -2, -3],
            ],
        );
        let shared = SharedSearchState::new();

        assert_eq!(run(&formula, &shared, 0), None);
        assert_eq!(shared.backtracks(), 7);
    }

    #[test]
    fn stop_flag_aborts_immediately() {
        let formula = cnf(1, &[&[1]]);
        let shared = SharedSearchState::new();
        assert!(shared.claim(vec![true]));

        assert_eq!(run(&formula, &shared, 0), None);
        assert_eq!(shared.backtracks(), 0);
    }

    #[test]
    fn zero_variable_formula_is_a_base_case() {
        let shared = SharedSearchState::new();
        assert_eq!(run(&cnf(0, &[]), &shared, 0), Some(vec![]));
        assert_eq!(run(&cnf(0, &[&[]]), &shared, 0), None);
    }

    #[test]
    fn search_from_prefix_depth_keeps_the_prefix_fixed() {
        let formula = cnf(2, &[&[-1]]);
        let shared = SharedSearchState::new();

        let satisfiable =
            SearchContext::new(&formula, &shared, vec![false, true]).run(1);
        assert_eq!(satisfiable, Some(vec![false, true]));

        let exhausted = SearchContext::new(&formula, &shared, vec![true, true]).run(1);
        assert_eq!(exhausted, None);
    }
}
