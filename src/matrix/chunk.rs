use crate::partition::ChunkDescriptor;

/// Computes one row chunk of `C = A * B` for square `dim × dim` matrices.
///
/// `out` holds only the chunk's rows: `chunk.row_count * dim` cells, where
/// `out[0]` is cell `(chunk.row_start, 0)` of C. Every cell is overwritten,
/// nothing is accumulated across calls.
///
/// This is the textbook i-j-k order, each output cell summed over `k`
/// before it is stored. All three strategies share it, so every cell sees
/// the same summation order no matter how rows are partitioned.
///
/// # Panics
///
/// Panics if A or B is not `dim * dim` long, if the chunk runs past `dim`,
/// or if `out` does not match the chunk size.
pub fn multiply_rows(a: &[f64], b: &[f64], out: &mut [f64], chunk: &ChunkDescriptor) {
    let dim = chunk.dim;
    assert_eq!(a.len(), dim * dim, "A: expected {}x{}={} elements", dim, dim, dim * dim);
    assert_eq!(b.len(), dim * dim, "B: expected {}x{}={} elements", dim, dim, dim * dim);
    assert!(
        chunk.row_end() <= dim,
        "chunk rows {:?} out of range for dim {}",
        chunk.rows(),
        dim
    );
    assert_eq!(
        out.len(),
        chunk.row_count * dim,
        "output chunk: expected {}x{} elements",
        chunk.row_count,
        dim
    );

    for (local, i) in chunk.rows().enumerate() {
        let a_row = &a[i * dim..(i + 1) * dim];
        let c_row = &mut out[local * dim..(local + 1) * dim];
        for (j, cell) in c_row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (k, &a_ik) in a_row.iter().enumerate() {
                sum += a_ik * b[k * dim + j];
            }
            *cell = sum;
        }
    }
}

/// Same as [`multiply_rows`] but writes into the full `dim × dim` output.
///
/// Cells outside `chunk` are left untouched.
pub fn multiply_chunk(a: &[f64], b: &[f64], c: &mut [f64], chunk: &ChunkDescriptor) {
    let dim = chunk.dim;
    assert_eq!(c.len(), dim * dim, "C: expected {}x{}={} elements", dim, dim, dim * dim);
    assert!(chunk.row_end() <= dim, "chunk rows {:?} out of range for dim {}", chunk.rows(), dim);

    multiply_rows(a, b, &mut c[chunk.cells()], chunk);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(dim: usize) -> (Vec<f64>, Vec<f64>) {
        let a = (0..dim * dim).map(|i| (i % 10) as f64).collect();
        let b = (0..dim * dim).map(|i| (i % 7) as f64).collect();
        (a, b)
    }

    #[test]
    fn test_2x2_product() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![5.0, 6.0, 7.0, 8.0];
        let mut c = vec![0.0; 4];

        multiply_chunk(&a, &b, &mut c, &ChunkDescriptor::full(2));

        assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_chunk_leaves_other_rows_alone() {
        let dim = 6;
        let (a, b) = inputs(dim);
        let mut c = vec![-1.0; dim * dim];
        let chunk = ChunkDescriptor {
            row_start: 2,
            row_count: 3,
            dim,
        };

        multiply_chunk(&a, &b, &mut c, &chunk);

        for i in 0..dim {
            let untouched = c[i * dim..(i + 1) * dim].iter().all(|&x| x == -1.0);
            assert_eq!(untouched, !chunk.rows().contains(&i), "row {}", i);
        }
    }

    #[test]
    fn test_overwrites_instead_of_accumulating() {
        let dim = 5;
        let (a, b) = inputs(dim);
        let chunk = ChunkDescriptor::full(dim);

        let mut fresh = vec![0.0; dim * dim];
        multiply_chunk(&a, &b, &mut fresh, &chunk);

        let mut dirty = vec![123.0; dim * dim];
        multiply_chunk(&a, &b, &mut dirty, &chunk);

        assert_eq!(fresh, dirty);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let dim = 9;
        let (a, b) = inputs(dim);
        let chunk = ChunkDescriptor {
            row_start: 4,
            row_count: 5,
            dim,
        };

        let mut first = vec![0.0; dim * dim];
        multiply_chunk(&a, &b, &mut first, &chunk);
        let mut second = first.clone();
        multiply_chunk(&a, &b, &mut second, &chunk);

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_chunk_is_noop() {
        let dim = 3;
        let (a, b) = inputs(dim);
        let mut c = vec![7.0; dim * dim];

        multiply_chunk(
            &a,
            &b,
            &mut c,
            &ChunkDescriptor {
                row_start: 0,
                row_count: 0,
                dim,
            },
        );

        assert!(c.iter().all(|&x| x == 7.0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_chunk_panics() {
        let dim = 4;
        let (a, b) = inputs(dim);
        let mut c = vec![0.0; dim * dim];

        multiply_chunk(
            &a,
            &b,
            &mut c,
            &ChunkDescriptor {
                row_start: 3,
                row_count: 2,
                dim,
            },
        );
    }
}
