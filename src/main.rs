//! Benchmark runner: times each strategy on the same inputs and checks the
//! parallel products against the serial one.

use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, warn};
use rowsplit::report::{algorithm_line, elapsed_line, verification_line};
use rowsplit::{Matrix, PartitionError, Strategy, first_mismatch, run_and_time};

#[derive(Parser, Debug)]
#[command(
    name = "rowsplit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Dense matrix multiplication: serial vs forked processes vs threads."
)]
struct Cli {
    /// Rows (and columns) of each square matrix
    #[arg(long, default_value_t = 1024, value_parser = clap::value_parser!(u32).range(1..))]
    dim: u32,

    /// Workers for the parallel strategies
    #[arg(short = 'w', long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    workers: u32,

    /// Strategies to run (serial always runs as the baseline)
    #[arg(short = 's', long = "strategy", value_enum)]
    strategies: Vec<Strategy>,

    /// Print every product matrix
    #[arg(long)]
    print: bool,

    // verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(level: u8) {
    let level = match level {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

/// Serial first, then the requested parallel strategies without repeats.
fn schedule(requested: &[Strategy]) -> Vec<Strategy> {
    let mut order = vec![Strategy::Serial];
    let wanted: &[Strategy] = if requested.is_empty() {
        &Strategy::ALL
    } else {
        requested
    };
    for &strategy in wanted {
        if !order.contains(&strategy) {
            order.push(strategy);
        }
    }
    order
}

fn run(cli: &Cli) -> Result<(), PartitionError> {
    let dim = cli.dim as usize;
    let workers = cli.workers as usize;

    let a = Matrix::sequential(dim);
    let b = Matrix::sequential(dim);
    let mut gold = Matrix::zeros(dim);

    for strategy in schedule(&cli.strategies) {
        let name = strategy.name();
        let mut product = Matrix::zeros(dim);
        let c = if strategy == Strategy::Serial {
            &mut gold
        } else {
            &mut product
        };

        let elapsed = run_and_time(strategy, &a, &b, c, workers)?;
        println!("{}", algorithm_line(name, strategy.worker_count(workers)));
        println!("{}", elapsed_line(name, elapsed));

        if cli.print {
            print!("{}", c);
        }

        if strategy.verifies() {
            let mismatch = first_mismatch(gold.as_slice(), product.as_slice(), dim);
            if let Some(m) = mismatch {
                warn!(
                    "{}: cell ({}, {}) is {} but serial gave {}",
                    name, m.row, m.col, m.actual, m.expected
                );
            }
            println!("{}", verification_line(name, mismatch.is_none()));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    debug!("{:?}", cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_defaults_to_all() {
        assert_eq!(schedule(&[]), Strategy::ALL.to_vec());
    }

    #[test]
    fn test_schedule_puts_serial_first_once() {
        let order = schedule(&[Strategy::Threads, Strategy::Serial, Strategy::Threads]);
        assert_eq!(order, vec![Strategy::Serial, Strategy::Threads]);
    }

    #[test]
    fn test_cli_rejects_zero_workers() {
        assert!(Cli::try_parse_from(["rowsplit", "--workers", "0"]).is_err());
        assert!(Cli::try_parse_from(["rowsplit", "--dim", "0"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["rowsplit", "-s", "processes"]).unwrap();
        assert_eq!((cli.dim, cli.workers), (1024, 4));
        assert_eq!(cli.strategies, vec![Strategy::Processes]);
    }
}
