//! Bipartitions of a register of sites and the reindexing between flat state
//! vectors and their matrix views.
//!
//! A state of *N* sites, each with local dimension *b*, is stored as a flat
//! vector of *b*<sup>*N*</sup> amplitudes whose ordering follows the usual
//! row-major (big-endian) convention: the left-most site is the most
//! significant digit of the flat index, and the right-most varies the fastest.
//! For *n* qubits,
//!
//! | Array index | Basis element |
//! | :---------- | :------------ |
//! | 0           | ∣00...00⟩     |
//! | 1           | ∣00...01⟩     |
//! | 2           | ∣00...10⟩     |
//! | 3           | ∣00...11⟩     |
//! | ...         | ...           |
//! | 2^*n* – 2   | ∣11...10⟩     |
//! | 2^*n* – 1   | ∣11...11⟩     |
//!
//! Placing a cut after the first `n_left` sites turns flat index `k` into the
//! matrix element `(k / d_right, k % d_right)`, where `d_right` is the
//! dimension of the right block. Rows index the left block and vary the
//! slowest.
//!
//! `nalgebra` matrices are column-major in memory, so the conversion is written
//! out explicitly here instead of relying on a no-copy reshape; swapping the
//! convention would silently exchange which sites end up on either side of the
//! cut.

use nalgebra as na;
use log::trace;
use crate::{
    ComplexScalar,
    SchmidtError,
    SchmidtResult,
};
use SchmidtError::*;

/// Compute `local_dim^n`, failing on overflow.
fn checked_dim(local_dim: usize, n: usize) -> SchmidtResult<usize> {
    let n = u32::try_from(n).map_err(|_| DimensionOverflow)?;
    local_dim.checked_pow(n).ok_or(DimensionOverflow)
}

/// Infer the number of sites from the length of a state vector.
///
/// Fails if `local_dim` is zero or `len` is not an integer power of
/// `local_dim`. A local dimension of 1 only admits `len == 1`, which is taken
/// to be a system of zero sites.
pub fn num_sites(len: usize, local_dim: usize) -> SchmidtResult<usize> {
    if local_dim == 0 { return Err(ZeroLocalDim); }
    if len == 0 { return Err(NotAPower { len, local_dim }); }
    if local_dim == 1 {
        return if len == 1 { Ok(0) } else { Err(NotAPower { len, local_dim }) };
    }
    let mut rem = len;
    let mut n: usize = 0;
    while rem > 1 {
        if rem % local_dim != 0 { return Err(NotAPower { len, local_dim }); }
        rem /= local_dim;
        n += 1;
    }
    Ok(n)
}

/// Decompose a flat index into per-site quantum numbers, left-most site first.
///
/// Returns `None` if `local_dim` is zero or `k` is not less than
/// `local_dim^n`.
pub fn basis_digits(k: usize, local_dim: usize, n: usize) -> Option<Vec<usize>> {
    if local_dim == 0 { return None; }
    let mut digits: Vec<usize> = vec![0; n];
    let mut rem = k;
    for d in digits.iter_mut().rev() {
        *d = rem % local_dim;
        rem /= local_dim;
    }
    (rem == 0).then_some(digits)
}

/// Combine per-site quantum numbers, left-most site first, into a flat index.
///
/// This is the inverse of [`basis_digits`] for in-range quantum numbers.
pub fn basis_index(digits: &[usize], local_dim: usize) -> usize {
    digits.iter().fold(0, |acc, d| acc * local_dim + d)
}

/// A cut through a register of `n` identical sites, placed after the first
/// `n_left` of them.
///
/// ```text
///  site:   0     1    ...  n_left - 1 ┆ n_left  ...   n - 1
///        ──●─────●── ... ──────●──────┆────●──── ... ───●──
///          \__________________________/\_________________/
///              left block, d_left        right block, d_right
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bipartition {
    local_dim: usize, // ≥ 1
    n: usize,
    n_left: usize, // ≤ n
    d_left: usize,
    d_right: usize,
}

impl Bipartition {
    /// Create a new bipartition of `n` sites with local dimension `local_dim`,
    /// placing the first `n_left` sites in the left block.
    ///
    /// Fails if `local_dim` is zero, `n_left > n`, or the total dimension
    /// `local_dim^n` overflows.
    pub fn new(local_dim: usize, n: usize, n_left: usize)
        -> SchmidtResult<Self>
    {
        if local_dim == 0 { return Err(ZeroLocalDim); }
        if n_left > n { return Err(BipartitionOutOfBounds { n_left, n }); }
        checked_dim(local_dim, n)?;
        let d_left = checked_dim(local_dim, n_left)?;
        let d_right = checked_dim(local_dim, n - n_left)?;
        Ok(Self { local_dim, n, n_left, d_left, d_right })
    }

    /// Create a new bipartition of `n` qubits (`local_dim == 2`).
    pub fn qubits(n: usize, n_left: usize) -> SchmidtResult<Self> {
        Self::new(2, n, n_left)
    }

    /// Create a new bipartition for a state vector of length `len`, inferring
    /// the number of sites.
    ///
    /// Fails if `len` is not a power of `local_dim` or `n_left` is out of
    /// bounds.
    pub fn from_state_len(len: usize, local_dim: usize, n_left: usize)
        -> SchmidtResult<Self>
    {
        let n = num_sites(len, local_dim)?;
        Self::new(local_dim, n, n_left)
    }

    /// Return the local dimension of each site.
    pub fn local_dim(&self) -> usize { self.local_dim }

    /// Return the total number of sites.
    pub fn n(&self) -> usize { self.n }

    /// Return the number of sites in the left block.
    pub fn n_left(&self) -> usize { self.n_left }

    /// Return the number of sites in the right block.
    pub fn n_right(&self) -> usize { self.n - self.n_left }

    /// Return the dimensions `(d_left, d_right)` of the left and right blocks.
    pub fn dims(&self) -> (usize, usize) { (self.d_left, self.d_right) }

    /// Return the dimension of the full system.
    pub fn dim(&self) -> usize { self.d_left * self.d_right }

    /// Return the largest possible Schmidt rank across the cut.
    pub fn max_rank(&self) -> usize { self.d_left.min(self.d_right) }

    /// Convert a flat index into a `(row, col)` matrix index.
    ///
    /// Returns `None` if `k` is out of bounds.
    pub fn split_index(&self, k: usize) -> Option<(usize, usize)> {
        (k < self.dim()).then(|| (k / self.d_right, k % self.d_right))
    }

    /// Convert a `(row, col)` matrix index into a flat index.
    ///
    /// Returns `None` if either index is out of bounds.
    pub fn join_index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.d_left && col < self.d_right)
            .then(|| row * self.d_right + col)
    }

    /// View a flat state vector as a `d_left × d_right` matrix.
    ///
    /// Fails if the length of `state` is not `local_dim^n`.
    pub fn reshape<A>(&self, state: &na::DVector<A>)
        -> SchmidtResult<na::DMatrix<A>>
    where A: ComplexScalar
    {
        let expected = self.dim();
        if state.len() != expected {
            return Err(StateIncompatibleShape { len: state.len(), expected });
        }
        trace!(
            "reshape state of length {} to {}×{}",
            expected, self.d_left, self.d_right,
        );
        Ok(na::DMatrix::from_row_slice(
            self.d_left, self.d_right, state.as_slice()))
    }

    /// Flatten a `d_left × d_right` matrix back into a state vector. This is
    /// the exact inverse of [`reshape`][Self::reshape].
    ///
    /// Fails if `matrix` does not have shape `(d_left, d_right)`.
    pub fn flatten<A>(&self, matrix: &na::DMatrix<A>)
        -> SchmidtResult<na::DVector<A>>
    where A: ComplexScalar
    {
        let (rows, cols) = matrix.shape();
        if (rows, cols) != self.dims() {
            return Err(MatrixIncompatibleShape {
                rows,
                cols,
                expected_rows: self.d_left,
                expected_cols: self.d_right,
            });
        }
        trace!("flatten {}×{} matrix to state of length {}", rows, cols, rows * cols);
        // column-major storage of the transpose is row-major storage of the
        // original
        Ok(na::DVector::from_iterator(rows * cols, matrix.transpose().iter().copied()))
    }
}

/// View a flat `n`-qubit state vector as a matrix with the first `n_left`
/// qubits indexing rows.
///
/// Fails if `n_left > n` or the length of `state` is not `2^n`.
pub fn reshape<A>(state: &na::DVector<A>, n_left: usize, n: usize)
    -> SchmidtResult<na::DMatrix<A>>
where A: ComplexScalar
{
    Bipartition::qubits(n, n_left)?.reshape(state)
}

/// Flatten a matrix back into an `n`-qubit state vector, with the first
/// `n_left` qubits indexing rows.
///
/// Fails if `n_left > n` or `matrix` does not have shape
/// `(2^n_left, 2^(n - n_left))`.
pub fn flatten<A>(matrix: &na::DMatrix<A>, n_left: usize, n: usize)
    -> SchmidtResult<na::DVector<A>>
where A: ComplexScalar
{
    Bipartition::qubits(n, n_left)?.flatten(matrix)
}
