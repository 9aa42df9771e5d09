/// A cell where two products disagree after truncation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub expected: f64,
    pub actual: f64,
}

/// Find the first cell whose values differ once truncated toward zero.
///
/// Truncation absorbs rounding differences from a different summation
/// order. It does not hide a wrong value of 1.0 or more.
///
/// # Panics
///
/// Panics if the slices differ in length or are not `dim * dim` long.
pub fn first_mismatch(expected: &[f64], actual: &[f64], dim: usize) -> Option<Mismatch> {
    assert_eq!(expected.len(), dim * dim, "expected: wrong length for dim {}", dim);
    assert_eq!(actual.len(), dim * dim, "actual: wrong length for dim {}", dim);

    expected
        .iter()
        .zip(actual)
        .position(|(&e, &a)| e.trunc() != a.trunc())
        .map(|idx| Mismatch {
            row: idx / dim,
            col: idx % dim,
            expected: expected[idx],
            actual: actual[idx],
        })
}

/// `true` when every cell matches at integer precision.
pub fn verify(expected: &[f64], actual: &[f64], dim: usize) -> bool {
    first_mismatch(expected, actual, dim).is_none()
}
