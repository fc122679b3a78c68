use std::{env::args, path::Path, thread, time::Duration};

use log::{debug, info};
use pretty_env_logger::formatted_builder;
use saturate::{
    formula::Model,
    parser::{self, parse_file},
    prelude::*,
    report::Report,
    solver::{ConfigError, ExhaustiveSolver, ParallelSolver, Progress, Solver},
};

fn usage_string() -> String {
    format!(
        "Usage: {} <solver_name> <command>

solver_name: exhaustive, parallel

command:
    check <file_name> [prefix_length] - decide satisfiability of the given file
        prefix_length (parallel only): spawn 2^prefix_length workers",
        args().next().unwrap()
    )
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Unknown solver '{}'\n\n{}", name, usage_string()))]
    UnknownSolver { name: String },
    #[snafu(display("Unknown command '{}'\n\n{}", name, usage_string()))]
    UnknownCommand { name: String },
    #[snafu(display("Failed to parse CNF"))]
    ParserError { source: parser::Error },
    #[snafu(display("Failed to parse prefix length '{}'", value))]
    MalformedPrefixLength {
        value: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display("Invalid solver configuration"))]
    ConfigurationError { source: ConfigError },
    #[snafu(display("The prefix length argument only applies to the parallel solver"))]
    UnexpectedPrefixLength,
    #[snafu(display("Required argument does not exist\n\n{}", usage_string()))]
    MissingArgument,
}

/// Polls the backtrack counter every two seconds for the lifetime of the
/// process. Stale reads are fine for a progress display.
fn spawn_reporter(progress: Progress) {
    thread::spawn(move || loop {
        thread::sleep(Duration::from_secs(2));
        info!("backtracks: {}", progress.backtracks());
    });
}

fn run_solver<T: Solver>(solver: T) -> Option<Model> {
    spawn_reporter(solver.progress());
    solver.solve()
}

fn print_result(result: Option<Model>) {
    match result {
        Some(model) => {
            debug!("{}", model);

            println!("s SATISFIABLE");
            print!("v");
            for (index, &value) in model.assignment().iter().enumerate() {
                let id = index as i64 + 1;
                print!(" {}", if value { id } else { -id });
            }
            println!(" 0");
        }
        None => println!("s UNSATISFIABLE"),
    }
}

fn dispatch_command(solver_name: &str, args: Vec<String>) -> Result<(), Error> {
    match args.get(0).map(|s| s.as_str()) {
        Some("check") => {
            let path = args.get(1).context(MissingArgument)?;
            let formula = parse_file(Path::new(path)).context(ParserError)?;

            let prefix_length = match args.get(2) {
                Some(value) => {
                    Some(value.parse::<usize>().with_context(|| {
                        MalformedPrefixLength {
                            value: value.clone(),
                        }
                    })?)
                }
                None => None,
            };

            let result = match solver_name {
                "parallel" => match prefix_length {
                    Some(prefix_length) => run_solver(
                        ParallelSolver::with_prefix_length(formula, prefix_length)
                            .context(ConfigurationError)?,
                    ),
                    None => run_solver(ParallelSolver::new(formula)),
                },
                _ => {
                    ensure!(prefix_length.is_none(), UnexpectedPrefixLength);
                    run_solver(ExhaustiveSolver::new(formula))
                }
            };

            print_result(result);
        }
        Some(name) => UnknownCommand {
            name: name.to_owned(),
        }
        .fail()?,
        None => MissingArgument.fail()?,
    }

    Ok(())
}

fn init_logger() {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else {
        if cfg!(debug_assertions) {
            builder.parse_filters("saturate=debug");
        } else {
            builder.parse_filters("saturate=warn");
        }
    }

    builder.try_init().expect("Failed to initialize the logger");
}

fn main() -> Result<(), Report> {
    init_logger();

    let mut args = args();

    // drop arg[0]
    args.next();

    // solver name
    let solver_name = args.next();
    let remaining: Vec<_> = args.collect();

    match solver_name.as_deref() {
        Some("exhaustive") => dispatch_command("exhaustive", remaining)?,
        Some("parallel") => dispatch_command("parallel", remaining)?,
        Some(name) => UnknownSolver {
            name: name.to_owned(),
        }
        .fail()?,
        None => {
            println!("{}", usage_string());
        }
    }

    Ok(())
}
