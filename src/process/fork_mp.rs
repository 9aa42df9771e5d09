//! Multi-process row-chunk multiplication.

use std::io;
use std::panic::{self, AssertUnwindSafe};

use super::shared::SharedRegion;
use crate::error::{PartitionError, Result};
use crate::matrix::chunk::multiply_chunk;
use crate::partition::{ChunkDescriptor, plan_chunks};

/// Exit status of a child whose computation panicked.
const CHILD_FAILURE: libc::c_int = 1;

/// Multiply on `workers` processes: `workers - 1` forked children, plus the
/// caller.
///
/// Every worker writes its rows into one shared mapping. Children take the
/// leading chunks; the parent computes the last chunk (with the remainder
/// rows), reaps every child, then copies the mapping into `c`.
///
/// # Errors
///
/// Returns an error if the mapping cannot be created or released, a fork
/// fails, a child cannot be waited for, or a child exits abnormally. Any
/// children already forked are reaped before returning, and `c` is left
/// untouched.
///
/// # Panics
///
/// Panics if `dim` or `workers` is zero, or a slice is not `dim * dim` long.
pub fn multiply_parallel_processes(
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
    let (last_chunk, forked) = chunks
        .split_last()
        .expect("plan_chunks returns at least one chunk");

    let mut region = SharedRegion::new(dim * dim)?;
    let mut children = Children::with_capacity(forked.len());

    for chunk in forked {
        let pid = fork_worker(a, b, &mut region, chunk)?;
        log::trace!("forked worker {} for rows {:?}", pid, chunk.rows());
        children.pids.push(pid);
    }
    log::debug!("forked {} worker processes", children.pids.len());

    multiply_chunk(a, b, region.as_mut_slice(), last_chunk);
    children.wait_all()?;

    c.copy_from_slice(region.as_slice());
    region.release()
}

/// Fork a child that computes `chunk` into `region` and exits.
///
/// Returns the child's pid in the parent. The child never returns.
fn fork_worker(
    a: &[f64],
    b: &[f64],
    region: &mut SharedRegion,
    chunk: &ChunkDescriptor,
) -> Result<libc::pid_t> {
    // SAFETY: the child only runs the pure row multiplication over memory
    // it already has, then leaves through `_exit` without running
    // destructors or returning into the caller.
    match unsafe { libc::fork() } {
        -1 => Err(PartitionError::Fork(io::Error::last_os_error())),
        0 => {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                multiply_chunk(a, b, region.as_mut_slice(), chunk);
            }));
            let status = if outcome.is_ok() { 0 } else { CHILD_FAILURE };
            unsafe { libc::_exit(status) }
        }
        pid => Ok(pid),
    }
}

/// Forked children not yet reaped. Dropping reaps whatever is left, so an
/// early return never leaves zombies behind.
struct Children {
    pids: Vec<libc::pid_t>,
}

impl Children {
    fn with_capacity(n: usize) -> Self {
        Self {
            pids: Vec::with_capacity(n),
        }
    }

    /// Wait for every child, even after one fails. Returns the first error.
    fn wait_all(&mut self) -> Result<()> {
        let mut first_err = None;
        for pid in self.pids.drain(..) {
            if let Err(err) = reap(pid) {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl Drop for Children {
    fn drop(&mut self) {
        if let Err(err) = self.wait_all() {
            log::warn!("{}", err);
        }
    }
}

/// Block until `pid` exits. Waits on that pid only, so children forked by
/// other callers in this process are not reaped by accident.
fn reap(pid: libc::pid_t) -> Result<()> {
    let mut status: libc::c_int = 0;
    loop {
        // SAFETY: `status` is a valid out-pointer.
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        if rc == pid {
            break;
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(PartitionError::Wait(err));
        }
    }

    if libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == 0 {
        log::trace!("reaped worker {}", pid);
        Ok(())
    } else {
        Err(PartitionError::ChildFailed { pid, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::serial::multiply_serial;

    #[test]
    fn test_processes_match_serial() {
        let dim = 31;
        let a: Vec<f64> = (0..dim * dim).map(|i| (i % 10) as f64).collect();
        let b: Vec<f64> = (0..dim * dim).map(|i| (i % 13) as f64 * 0.5).collect();

        let mut c_serial = vec![0.0; dim * dim];
        multiply_serial(&a, &b, &mut c_serial, dim);

        for workers in [1, 2, 3, 4, 7] {
            let mut c_mp = vec![f64::NAN; dim * dim];
            multiply_parallel_processes(&a, &b, &mut c_mp, dim, workers).unwrap();
            assert_eq!(c_serial, c_mp, "workers={}", workers);
        }
    }

    #[test]
    fn test_failed_child_is_reported() {
        // SAFETY: the child exits immediately.
        let pid = unsafe { libc::fork() };
        assert!(pid >= 0, "fork failed");
        if pid == 0 {
            unsafe { libc::_exit(3) };
        }

        match reap(pid) {
            Err(PartitionError::ChildFailed { pid: failed, status }) => {
                assert_eq!(failed, pid);
                assert_eq!(libc::WEXITSTATUS(status), 3);
            }
            other => panic!("expected ChildFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_reaping_unknown_pid_fails() {
        let mut children = Children::with_capacity(1);
        // pid 1 is never our child
        children.pids.push(1);
        assert!(matches!(
            children.wait_all(),
            Err(PartitionError::Wait(_))
        ));
        assert!(children.pids.is_empty());
    }

    #[test]
    fn test_panicking_child_exits_with_failure() {
        let a = vec![1.0; 4];
        let b = vec![1.0; 4];
        // one cell cannot hold a 2x2 product, so the child's row kernel panics
        let mut region = SharedRegion::new(1).unwrap();

        let pid = fork_worker(&a, &b, &mut region, &ChunkDescriptor::full(2)).unwrap();

        match reap(pid) {
            Err(PartitionError::ChildFailed { pid: failed, status }) => {
                assert_eq!(failed, pid);
                assert!(libc::WIFEXITED(status));
                assert_eq!(libc::WEXITSTATUS(status), CHILD_FAILURE);
            }
            other => panic!("expected ChildFailed, got {:?}", other),
        }
        assert_eq!(region.as_slice(), &[0.0]);
    }

    #[test]
    fn test_dropping_children_reaps_them() {
        // SAFETY: the child exits immediately.
        let pid = unsafe { libc::fork() };
        assert!(pid >= 0, "fork failed");
        if pid == 0 {
            unsafe { libc::_exit(0) };
        }

        let mut children = Children::with_capacity(1);
        children.pids.push(pid);
        drop(children);

        let mut status = 0;
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        assert_eq!(rc, -1);
        assert_eq!(io::Error::last_os_error().raw_os_error(), Some(libc::ECHILD));
    }
}
