//! Cephalopod Solver
//!
//! Reads a search depth and nine cell values, prints the sum of leaf scores
//! over every play sequence modulo 2^30. Only the result goes to stdout;
//! logging goes to stderr.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use cephalopod_solver::memo::MAX_EXPLICIT_TABLE_BITS;
use cephalopod_solver::{simulate_uncached, LayeredSolver, MemoTable, Problem, Solver};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Depth-first search with the memo table
    Memo,
    /// Uncached recursion (exponential, for cross-checking)
    Reference,
    /// Breadth-first search merging boards per ply
    Layered,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read the problem from FILE instead of stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Search engine to run
    #[arg(short, long, value_enum, default_value_t = Engine::Memo)]
    engine: Engine,

    /// Memo table size as log2 of the entry count (default: sized from the depth)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_EXPLICIT_TABLE_BITS as i64))]
    table_bits: Option<u32>,

    /// Seconds between progress lines of the memo engine
    #[arg(long, default_value_t = 5)]
    log_interval: u64,

    /// Log search statistics to stderr
    #[arg(short, long)]
    stats: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug {
        "debug"
    } else if args.stats {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();

    match run(&args) {
        Ok(result) => println!("{}", result),
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

fn read_problem(path: Option<&Path>) -> Result<Problem> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };
    text.parse().context("malformed problem input")
}

fn run(args: &Args) -> Result<u32> {
    let problem = read_problem(args.input.as_deref())?;
    log::info!(
        "engine={:?} depth={} board={}",
        args.engine,
        problem.max_depth,
        problem.board
    );

    if args.table_bits.is_some() && args.engine != Engine::Memo {
        log::warn!("--table-bits only applies to the memo engine");
    }

    let result = match args.engine {
        Engine::Memo => {
            let table = match args.table_bits {
                Some(bits) => MemoTable::with_bits(bits),
                None => MemoTable::for_depth(problem.max_depth),
            };
            let mut solver = Solver::with_table(problem.max_depth, table);
            solver.set_log_interval(args.log_interval);

            let result = solver.solve(problem.board);
            if args.stats {
                solver.stats.log_summary(&solver.table);
            }
            result
        }
        Engine::Layered => {
            let mut solver = LayeredSolver::new(problem.max_depth);
            let result = solver.solve(problem.board);
            if args.stats {
                for layer in &solver.layers {
                    log::info!(
                        "ply {:>3}: {} states, {} leaves",
                        layer.ply,
                        layer.states,
                        layer.leaves
                    );
                }
            }
            result
        }
        Engine::Reference => simulate_uncached(problem.board, problem.max_depth),
    };

    Ok(result)
}
