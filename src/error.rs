use std::io;

use thiserror::Error;

/// Infrastructure failures while dispatching workers.
///
/// None of these are recoverable: the benchmark driver reports them and
/// exits. They exist as values so the library can unwind its own resources
/// (reap children, unmap the shared region) before the program goes down.
#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("failure in fork: {0}")]
    Fork(#[source] io::Error),
    #[error("failure in mmap: {0}")]
    Map(#[source] io::Error),
    #[error("failure in munmap: {0}")]
    Unmap(#[source] io::Error),
    #[error("failure in waitpid: {0}")]
    Wait(#[source] io::Error),
    #[error("failure spawning worker thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("worker process {pid} exited abnormally (status {status:#x})")]
    ChildFailed { pid: i32, status: i32 },
}

pub type Result<T> = std::result::Result<T, PartitionError>;
