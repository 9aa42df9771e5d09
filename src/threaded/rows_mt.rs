//! Multi-threaded row-chunk multiplication.

use std::panic;
use std::thread;

use crate::error::{PartitionError, Result};
use crate::matrix::chunk::multiply_rows;
use crate::partition::plan_chunks;

/// Multiply on `workers` threads: `workers - 1` spawned, plus the caller.
///
/// The output is split into disjoint row slices up front, one per chunk.
/// Spawned threads take the leading chunks and the calling thread runs the
/// last one (the one holding the remainder rows) before joining the rest.
///
/// # Errors
///
/// [`PartitionError::Spawn`] if a thread cannot be created. Threads that
/// were already started are joined before the error is returned.
///
/// # Panics
///
/// Panics if `dim` or `workers` is zero, or a slice is not `dim * dim`
/// long. A panic in a worker is resumed on the calling thread.
pub fn multiply_parallel_threads(
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
    dim: usize,
    workers: usize,
) -> Result<()> {
    assert_eq!(a.len(), dim * dim, "A: expected {}x{}={} elements", dim, dim, dim * dim);
    assert_eq!(b.len(), dim * dim, "B: expected {}x{}={} elements", dim, dim, dim * dim);
    assert_eq!(c.len(), dim * dim, "C: expected {}x{}={} elements", dim, dim, dim * dim);

    let chunks = plan_chunks(dim, workers);

    let mut rest = c;
    let mut outputs = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(chunk.row_count * dim);
        outputs.push(head);
        rest = tail;
    }

    let (last_chunk, spawned) = chunks
        .split_last()
        .expect("plan_chunks returns at least one chunk");
    let last_output = outputs.pop().expect("one output slice per chunk");

    thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::with_capacity(spawned.len());

        for (id, (chunk, out)) in spawned.iter().zip(outputs).enumerate() {
            let handle = thread::Builder::new()
                .name(format!("rowsplit-worker-{}", id))
                .spawn_scoped(scope, move || {
                    log::trace!("thread {} computing rows {:?}", id, chunk.rows());
                    multiply_rows(a, b, out, chunk);
                })
                .map_err(PartitionError::Spawn)?;
            handles.push(handle);
        }
        log::debug!("spawned {} worker threads", handles.len());

        multiply_rows(a, b, last_output, last_chunk);

        for handle in handles {
            if let Err(payload) = handle.join() {
                panic::resume_unwind(payload);
            }
        }
        Ok(())
    })
}
