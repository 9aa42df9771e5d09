use super::chunk::multiply_chunk;
use crate::partition::ChunkDescriptor;

/// Single-threaded `C = A * B` over all rows. The reference result the
/// parallel strategies are checked against.
///
/// # Panics
///
/// Panics if `dim` is zero or any slice is not `dim * dim` long.
pub fn multiply_serial(a: &[f64], b: &[f64], c: &mut [f64], dim: usize) {
    assert!(dim > 0, "matrix dimension must be positive");
    multiply_chunk(a, b, c, &ChunkDescriptor::full(dim));
}
