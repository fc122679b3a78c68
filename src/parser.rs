/*!
Token-stream parser for CNF input.

The expected format is a whitespace-separated token stream: two header
labels (read and discarded), the variable count, the clause count, and then
one row per clause listing signed literals terminated by a `0` sentinel.
There is no comment-line handling.
*/

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::formula::{Clause, Cnf, Literal, Variable, VariableParseError};
use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while reading CNF file '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "Input ended before the '<num_variables> <num_clauses>' header was complete"
    ))]
    MissingHeader,
    #[snafu(display("Failed to parse header token '{}' as a count", token))]
    MalformedHeader {
        token: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display(
        "Declared variable count {} exceeds the supported maximum ({})",
        num_variables,
        Variable::MAX_VARIABLE_ID
    ))]
    VariableCountTooLarge { num_variables: usize },
    #[snafu(display("Failed to parse token '{}' in clause {} as a literal", token, clause_index))]
    MalformedLiteral {
        token: String,
        clause_index: usize,
        source: VariableParseError,
    },
    #[snafu(display(
        "Variable {} in clause {} exceeds the declared variable count ({})",
        id,
        clause_index,
        num_variables
    ))]
    VariableOutOfRange {
        id: usize,
        clause_index: usize,
        num_variables: usize,
    },
    #[snafu(display(
        "Clause {} has no terminating 0 within the declared width",
        clause_index
    ))]
    MissingSentinel { clause_index: usize },
    #[snafu(display("Input ended in the middle of clause {}", clause_index))]
    UnexpectedEnd { clause_index: usize },
    #[snafu(display("Unexpected token '{}' after the last declared clause", token))]
    TrailingTokens { token: String },
}

/// Reads one clause row: literals up to the `0` sentinel.
///
/// A row may hold at most `num_variables` literals; a longer row means the
/// sentinel went missing.
fn parse_clause<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    clause_index: usize,
    num_variables: usize,
) -> Result<Clause, Error> {
    let mut literals = Vec::new();

    loop {
        let token = tokens.next().context(UnexpectedEnd { clause_index })?;
        if token == "0" {
            return Ok(Clause::new(literals));
        }

        ensure!(
            literals.len() < num_variables,
            MissingSentinel { clause_index }
        );

        let literal =
            token
                .parse::<Literal>()
                .with_context(|| MalformedLiteral {
                    token: token.to_owned(),
                    clause_index,
                })?;

        let id = literal.variable().as_index() + 1;
        ensure!(
            id <= num_variables,
            VariableOutOfRange {
                id,
                clause_index,
                num_variables,
            }
        );

        literals.push(literal);
    }
}

/// Parses a CNF formula from an in-memory token stream.
pub fn parse_str(input: &str) -> Result<Cnf, Error> {
    let mut tokens = input.split_whitespace();

    // The two leading header labels ("p cnf" in DIMACS-like inputs) carry
    // no information; they are read and discarded.
    tokens.next().context(MissingHeader)?;
    tokens.next().context(MissingHeader)?;

    let num_variables = parse_count(tokens.next().context(MissingHeader)?)?;
    let num_clauses = parse_count(tokens.next().context(MissingHeader)?)?;

    ensure!(
        num_variables <= Variable::MAX_VARIABLE_ID,
        VariableCountTooLarge { num_variables }
    );

    let mut cnf = Cnf::new(num_variables);
    for clause_index in 0..num_clauses {
        cnf.add_clause(parse_clause(&mut tokens, clause_index, num_variables)?);
    }

    match tokens.next() {
        Some(token) => TrailingTokens {
            token: token.to_owned(),
        }
        .fail(),
        None => Ok(cnf),
    }
}

fn parse_count(token: &str) -> Result<usize, Error> {
    token.parse::<usize>().context(MalformedHeader {
        token: token.to_owned(),
    })
}

/// Parses a CNF formula from a file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Cnf, Error> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).context(IoError {
        path: path.to_owned(),
    })?;

    parse_str(&input)
}
