//! Row-partitioned multiplication on threads sharing one address space.
//!
//! Workers write straight into disjoint row slices of the caller's output,
//! so there is no shared region and no copy-back step.

pub mod rows_mt;
