//! Row-partitioned multiplication on forked worker processes.
//!
//! Forked children get copy-on-write private memory, so the only thing a
//! child can hand back is what it writes into a [`SharedRegion`] mapped
//! before the fork. The parent waits for every child before reading it.

pub mod fork_mp;
pub mod shared;

pub use shared::SharedRegion;
