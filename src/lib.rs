//! Row-partitioned matrix multiplication: serial vs processes vs threads.
//!
//! I wrote this to compare what it actually costs to split the same dense
//! multiplication across forked processes and across threads. Both
//! parallel versions cut the output into contiguous row chunks and run
//! the exact same row kernel as the serial baseline, so their results can
//! be checked cell by cell against it.
//!
//! ## Usage
//!
//! ```
//! use rowsplit::{Matrix, Strategy, verify};
//!
//! let a = Matrix::sequential(64);
//! let b = Matrix::sequential(64);
//!
//! let mut gold = Matrix::zeros(64);
//! Strategy::Serial.run(&a, &b, &mut gold, 1).unwrap();
//!
//! let mut c = Matrix::zeros(64);
//! Strategy::Threads.run(&a, &b, &mut c, 4).unwrap();
//!
//! assert!(verify(gold.as_slice(), c.as_slice(), 64));
//! ```
//!
//! ## What's inside
//!
//! - Static row partitioning: `dim / W` rows per worker, remainder on the last
//! - Forked workers writing into an anonymous shared mapping
//! - Scoped threads writing into disjoint slices of the output
//! - Truncating verifier tolerant of summation-order rounding

pub mod error;
pub mod matrix;
pub mod partition;
pub mod process;
pub mod report;
pub mod threaded;

use std::time::{Duration, Instant};

pub use error::{PartitionError, Result};
pub use matrix::Matrix;
pub use matrix::chunk::{multiply_chunk, multiply_rows};
pub use matrix::serial::multiply_serial;
pub use matrix::verify::{Mismatch, first_mismatch, verify};
pub use partition::{ChunkDescriptor, plan_chunks};
pub use process::fork_mp::multiply_parallel_processes;
pub use threaded::rows_mt::multiply_parallel_threads;

/// One way of computing `C = A * B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Strategy {
    Serial,
    Processes,
    Threads,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Serial, Strategy::Processes, Strategy::Threads];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Serial => "serial",
            Strategy::Processes => "parallel processes",
            Strategy::Threads => "parallel threads",
        }
    }

    /// Whether results are checked against the serial baseline.
    pub fn verifies(self) -> bool {
        self != Strategy::Serial
    }

    /// Workers actually used. Serial always runs on one.
    pub fn worker_count(self, workers: usize) -> usize {
        match self {
            Strategy::Serial => 1,
            Strategy::Processes | Strategy::Threads => workers,
        }
    }

    /// Multiply `a * b` into `c` using `workers` workers.
    ///
    /// # Panics
    ///
    /// Panics if the three matrices differ in dimension. The parallel
    /// strategies also panic if `workers` is zero; `Serial` ignores it.
    pub fn run(self, a: &Matrix, b: &Matrix, c: &mut Matrix, workers: usize) -> Result<()> {
        let dim = a.dim();
        assert_eq!(b.dim(), dim, "B: expected dim {}, got {}", dim, b.dim());
        assert_eq!(c.dim(), dim, "C: expected dim {}, got {}", dim, c.dim());

        let (a, b, c) = (a.as_slice(), b.as_slice(), c.as_mut_slice());
        match self {
            Strategy::Serial => {
                multiply_serial(a, b, c, dim);
                Ok(())
            }
            Strategy::Processes => multiply_parallel_processes(a, b, c, dim, workers),
            Strategy::Threads => multiply_parallel_threads(a, b, c, dim, workers),
        }
    }
}

/// Run `strategy` once and return the wall-clock time it took.
pub fn run_and_time(
    strategy: Strategy,
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    workers: usize,
) -> Result<Duration> {
    let start = Instant::now();
    strategy.run(a, b, c, workers)?;
    let elapsed = start.elapsed();

    log::debug!("{} finished in {:?}", strategy.name(), elapsed);
    Ok(elapsed)
}
