// vim: set ai et ts=4 sts=4 sw=4:
mod grid;
mod parser;
mod puzzle;
mod row;
mod util;

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

use clap::{App, Arg};
use log::{error, info, trace, warn};

use self::grid::CellState;
use self::parser::FormatError;
use self::puzzle::{Puzzle, ValidationError};
use self::puzzle::solver::{SolveError, Solver, StepObserver};
use self::util::is_a_tty;

pub struct Args {
    pub puzzle_file: String,
    pub visual_groups: Option<usize>,
    pub trace_steps: bool,
    pub no_color: bool,
    pub first_only: bool,
    pub verbosity: u64,
}

fn parse_args() -> Args {
    let matches = App::new("nonogram-solver")
        .version("0.1.0")
        .about("Solves nonogram puzzles with a constraint-pruned backtracking search")
        .arg(Arg::with_name("puzzle")
                 .help("Puzzle definition file")
                 .required(true)
                 .index(1))
        .arg(Arg::with_name("verbose")
                 .short("v")
                 .multiple(true)
                 .help("Increase log verbosity (-v: debug, -vv: trace)"))
        .arg(Arg::with_name("groups")
                 .long("groups")
                 .takes_value(true)
                 .validator(|s| s.parse::<usize>().map(|_| ())
                                 .map_err(|_| String::from("must be a non-negative integer")))
                 .help("Draw a separator across the board every N rows/columns (0 disables, default 5)"))
        .arg(Arg::with_name("no-color")
                 .long("no-color")
                 .help("Never emit ANSI color codes"))
        .arg(Arg::with_name("trace-steps")
                 .long("trace-steps")
                 .help("Log every solver assignment and backtrack at trace level"))
        .arg(Arg::with_name("first-only")
                 .long("first-only")
                 .help("Stop at the first solution without probing for a second one"))
        .get_matches();

    let visual_groups = match matches.value_of("groups") {
        Some(s) => match s.parse::<usize>().unwrap() { // the validator already vetted it
            0 => None,
            n => Some(n),
        },
        None => Some(5),
    };
    Args {
        puzzle_file: matches.value_of("puzzle").unwrap().to_string(),
        visual_groups,
        trace_steps: matches.is_present("trace-steps"),
        no_color: matches.is_present("no-color"),
        first_only: matches.is_present("first-only"),
        verbosity: matches.occurrences_of("verbose"),
    }
}

fn setup_logger(verbosity: u64) -> Result<(), fern::InitError> {
    let level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{:5}] {}", record.level(), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;
    Ok(())
}

#[derive(Debug)]
enum Error {
    Io(io::Error),
    Format(FormatError),
    Validation(ValidationError),
    Solve(SolveError),
}
impl From<io::Error> for Error {
    fn from(other: io::Error) -> Self {
        Error::Io(other)
    }
}
impl From<FormatError> for Error {
    fn from(other: FormatError) -> Self {
        Error::Format(other)
    }
}
impl From<ValidationError> for Error {
    fn from(other: ValidationError) -> Self {
        Error::Validation(other)
    }
}
impl From<SolveError> for Error {
    fn from(other: SolveError) -> Self {
        Error::Solve(other)
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Error::Io(e)         => e.to_string(),
            Error::Format(e)     => e.to_string(),
            Error::Validation(e) => e.to_string(),
            Error::Solve(e)      => e.to_string(),
        })
    }
}

/// Counts solver steps; optionally logs each one.
struct TraceObserver {
    trace_steps: bool,
    count: u64,
}
impl StepObserver for TraceObserver {
    fn on_step(&mut self, row: usize, col: usize, state: CellState) {
        self.count += 1;
        if self.trace_steps {
            trace!("step {}: cell (row={}, col={}) -> {}", self.count, row, col, state);
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let file = File::open(&args.puzzle_file)?;
    let (row_clues, col_clues) = parser::parse(BufReader::new(file))?;
    let mut puzzle = Puzzle::from_clues(row_clues, col_clues)?;
    info!("loaded a {}x{} puzzle from {}", puzzle.width(), puzzle.height(), args.puzzle_file);

    let mut observer = TraceObserver { trace_steps: args.trace_steps, count: 0 };
    let report = {
        let mut solver = Solver::new(&mut puzzle, &mut observer);
        if args.first_only {
            solver.set_detect_ambiguity(false);
        }
        solver.solve()?
    };
    if report.ambiguous {
        warn!("the clues admit more than one solution; showing the first one found");
    }
    info!("solved in {} steps", report.steps);

    let emit_color = !args.no_color && is_a_tty(io::stdout());
    print!("{}", puzzle.render(args.visual_groups, emit_color));
    Ok(())
}

fn main() {
    let args = parse_args();
    if let Err(e) = setup_logger(args.verbosity) {
        eprintln!("could not initialize logging: {}", e);
        process::exit(2);
    }
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
