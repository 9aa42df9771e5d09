//! Static row partitioning.
//!
//! Every partitioner splits the output rows the same way: the first
//! `workers - 1` chunks get exactly `dim / workers` rows, and the last
//! chunk takes whatever is left. The last chunk is always the one run by
//! the caller itself, never by a spawned worker.

use std::ops::Range;

/// A contiguous range of output rows assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub row_start: usize,
    pub row_count: usize,
    pub dim: usize,
}

impl ChunkDescriptor {
    /// Descriptor covering every row of a `dim × dim` output.
    pub fn full(dim: usize) -> Self {
        Self {
            row_start: 0,
            row_count: dim,
            dim,
        }
    }

    pub fn rows(&self) -> Range<usize> {
        self.row_start..self.row_end()
    }

    pub fn row_end(&self) -> usize {
        self.row_start + self.row_count
    }

    /// Range of flat cell indices this chunk owns in a row-major matrix.
    pub fn cells(&self) -> Range<usize> {
        self.row_start * self.dim..self.row_end() * self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// Split `dim` rows into `workers` chunks.
///
/// Earlier chunks are `dim / workers` rows each; the last absorbs the
/// remainder. With `workers > dim` the leading chunks are empty and the
/// last chunk owns every row.
///
/// # Panics
///
/// Panics if `dim` or `workers` is zero.
///
/// # Example
///
/// ```
/// use rowsplit::partition::plan_chunks;
///
/// let rows: Vec<_> = plan_chunks(10, 3).iter().map(|c| c.rows()).collect();
/// assert_eq!(rows, vec![0..3, 3..6, 6..10]);
/// ```
pub fn plan_chunks(dim: usize, workers: usize) -> Vec<ChunkDescriptor> {
    assert!(dim > 0, "matrix dimension must be positive");
    assert!(workers > 0, "worker count must be positive");

    let chunk = dim / workers;
    let mut chunks: Vec<ChunkDescriptor> = (0..workers - 1)
        .map(|id| ChunkDescriptor {
            row_start: id * chunk,
            row_count: chunk,
            dim,
        })
        .collect();

    let last_start = (workers - 1) * chunk;
    chunks.push(ChunkDescriptor {
        row_start: last_start,
        row_count: dim - last_start,
        dim,
    });

    log::trace!("planned {} chunks of {} rows for dim {}", workers, chunk, dim);
    chunks
}
