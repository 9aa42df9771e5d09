//! Square matrices and the single-threaded building blocks.
//!
//! [`chunk`] is the row-range multiplier every strategy runs, [`serial`]
//! is the full-range baseline and [`verify`] compares a parallel result
//! against it.

pub mod chunk;
pub mod serial;
pub mod verify;

use std::fmt;
use std::ops::Index;

/// A `dim × dim` matrix of `f64`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    dim: usize,
    cells: Vec<f64>,
}

impl Matrix {
    /// # Panics
    ///
    /// Panics if `dim` is zero.
    pub fn zeros(dim: usize) -> Self {
        Self::from_fn(dim, |_, _| 0.0)
    }

    /// Build a matrix from `f(row, col)`.
    pub fn from_fn(dim: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        assert!(dim > 0, "matrix dimension must be positive");
        let cells = (0..dim * dim).map(|i| f(i / dim, i % dim)).collect();
        Self { dim, cells }
    }

    /// Cells numbered `1, 2, 3, ...` in row-major order.
    ///
    /// ```
    /// use rowsplit::Matrix;
    ///
    /// let m = Matrix::sequential(2);
    /// assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn sequential(dim: usize) -> Self {
        Self::from_fn(dim, |i, j| (i * dim + j + 1) as f64)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.cells
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(row < self.dim && col < self.dim, "index ({}, {}) out of range", row, col);
        &self.cells[row * self.dim + col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.dim) {
            for cell in row {
                write!(f, "{:.6} ", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
