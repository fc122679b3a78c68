/*!
A module to represent conjunctive normal form formula.
*/

use std::{convert::TryInto, fmt::Display, num::NonZeroU32, str::FromStr};

use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum VariableParseError {
    #[snafu(display("Failed to parse Variable ID"))]
    ParseIntError { source: std::num::ParseIntError },
    #[snafu(display(
        "Variable ID {} is out of range (must be within 1 to {})",
        num,
        Variable::MAX_VARIABLE_ID
    ))]
    RangeError { num: usize },
}

/// Newtype wrapper for variable ID.
/// Invariant: 0 < ID <= MAX_VARIABLE_ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable(NonZeroU32);

impl Variable {
    pub const MAX_VARIABLE_ID: usize = std::u32::MAX as usize;
}

impl Variable {
    pub fn as_index(&self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Creates a variable from a raw index.
    /// Returns `None` if the index is invalid.
    pub fn from_index(index: usize) -> Option<Self> {
        let id = index.checked_add(1)?;
        if id > Variable::MAX_VARIABLE_ID {
            return None;
        }
        Some(Variable(NonZeroU32::new(id.try_into().ok()?)?))
    }
}

impl FromStr for Variable {
    type Err = VariableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = s.parse::<usize>().context(ParseIntError)?;
        if num == 0 {
            return RangeError { num }.fail();
        }
        Variable::from_index(num - 1).context(RangeError { num })
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    id: Variable,
    positive: bool,
}

impl Literal {
    pub fn new(id: Variable, positive: bool) -> Self {
        Literal { id, positive }
    }

    pub fn variable(&self) -> Variable {
        self.id
    }

    pub fn positive(&self) -> bool {
        self.positive
    }

    /// Evaluates the literal under a complete assignment.
    /// `assignment` is indexed by `Variable::as_index`.
    pub fn satisfied_by(&self, assignment: &[bool]) -> bool {
        assignment[self.id.as_index()] == self.positive
    }
}

impl FromStr for Literal {
    type Err = VariableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (positive, id) = match s.strip_prefix('-') {
            Some(rest) => (false, rest.parse()?),
            None => (true, s.parse()?),
        };

        Ok(Literal { id, positive })
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.positive { "" } else { "¬" }, self.id)
    }
}

/// Disjunction variables
#[derive(Debug, Clone)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    pub fn num_literals(&self) -> usize {
        self.literals.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied()
    }

    /// Returns true iff at least one literal is true under `assignment`.
    /// Stops scanning at the first satisfied literal.
    /// An empty clause is never satisfied.
    pub fn satisfied_by(&self, assignment: &[bool]) -> bool {
        self.literals
            .iter()
            .any(|literal| literal.satisfied_by(assignment))
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;

        let mut iter = self.literals.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for variable in iter {
            write!(f, " ∨ {}", variable)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Formula representation in Conjunctive Normal Form
#[derive(Debug, Clone)]
pub struct Cnf {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new(num_variables: usize) -> Self {
        assert!(num_variables <= Variable::MAX_VARIABLE_ID);

        Cnf {
            num_variables,
            clauses: Vec::new(),
        }
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn clauses(&self) -> &Vec<Clause> {
        &self.clauses
    }

    /// Adds a clause to the formula.
    ///
    /// # Panics
    ///
    /// Panics when the clause mentions a variable outside
    /// `1..=num_variables`.
    pub fn add_clause(&mut self, clause: Clause) {
        assert!(clause
            .iter()
            .all(|literal| literal.variable().as_index() < self.num_variables));
        self.clauses.push(clause);
    }

    /// Returns true iff every clause is satisfied under `assignment`.
    /// Stops scanning at the first unsatisfied clause.
    ///
    /// Read-only; safe to call from multiple workers sharing one formula,
    /// each with its own assignment buffer.
    pub fn satisfied_by(&self, assignment: &[bool]) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.satisfied_by(assignment))
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CNF with {} variables (", self.num_variables)?;

        let mut iter = self.clauses.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for variable in iter {
            write!(f, " ∧ {}", variable)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Represents a satisfying assignment for a formula.
#[derive(Debug)]
pub struct Model {
    formula: Cnf,
    assignment: Vec<bool>,
}

impl Model {
    /// Creates a new model from a formula and an assignment.
    ///
    /// # Panics
    ///
    /// Panics when `assignment` is invalid (length mismatch, or it does not
    /// satisfy the formula).
    pub fn new(formula: Cnf, assignment: Vec<bool>) -> Self {
        assert!(assignment.len() == formula.num_variables());
        assert!(formula.satisfied_by(&assignment));

        Model {
            formula,
            assignment,
        }
    }

    pub fn assignment(&self) -> &[bool] {
        &self.assignment
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Model for {}\nAssignment:", self.formula)?;
        for (idx, &val) in self.assignment.iter().enumerate() {
            write!(f, "\n  {}: {}", Variable::from_index(idx).unwrap(), val)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(encoded: i32) -> Literal {
        assert!(encoded != 0);
        let variable = Variable::from_index(encoded.unsigned_abs() as usize - 1).unwrap();
        Literal::new(variable, encoded > 0)
    }

    fn clause(encoded: &[i32]) -> Clause {
        Clause::new(encoded.iter().map(|&raw| literal(raw)).collect())
    }

    #[test]
    fn literal_parsing() {
        let positive = "3".parse::<Literal>().unwrap();
        assert_eq!(positive, literal(3));
        assert_eq!(positive.variable().as_index(), 2);
        assert!(positive.positive());

        let negative = "-3".parse::<Literal>().unwrap();
        assert_eq!(negative, literal(-3));
        assert_eq!(negative.variable().as_index(), 2);
        assert!(!negative.positive());

        assert!("0".parse::<Literal>().is_err());
        assert!("x1".parse::<Literal>().is_err());
    }

    #[test]
    fn clause_satisfaction() {
        let c = clause(&[1, -2]);

        assert!(c.satisfied_by(&[true, true]));
        assert!(c.satisfied_by(&[true, false]));
        assert!(c.satisfied_by(&[false, false]));
        assert!(!c.satisfied_by(&[false, true]));
    }

    #[test]
    fn empty_clause_is_never_satisfied() {
        let c = clause(&[]);
        assert!(!c.satisfied_by(&[]));
        assert!(!c.satisfied_by(&[true, false]));
    }

    #[test]
    fn formula_satisfaction() {
        let mut cnf = Cnf::new(2);
        cnf.add_clause(clause(&[1, 2]));
        cnf.add_clause(clause(&[-1, 2]));

        assert!(cnf.satisfied_by(&[true, true]));
        assert!(cnf.satisfied_by(&[false, true]));
        assert!(!cnf.satisfied_by(&[true, false]));
        assert!(!cnf.satisfied_by(&[false, false]));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut cnf = Cnf::new(2);
        cnf.add_clause(clause(&[1, -2]));

        let assignment = [false, true];
        let first = cnf.satisfied_by(&assignment);
        let second = cnf.satisfied_by(&assignment);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_formula_is_satisfied() {
        let cnf = Cnf::new(0);
        assert!(cnf.satisfied_by(&[]));
    }
}
