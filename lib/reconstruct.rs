//! Recombination of (possibly truncated) Schmidt factors into matrices and
//! flat state vectors.

use nalgebra as na;
use crate::{
    ComplexScalar,
    SchmidtError,
    SchmidtResult,
    schmidt::Schmidt,
    sites::Bipartition,
    truncate::Truncated,
};
use SchmidtError::*;

/// Compute `U diag(s) Vᵀ` for a set of Schmidt factors.
///
/// Fails if `u`, `s`, and `v` disagree on the number of Schmidt components. A
/// factorization with no components reconstructs to the zero matrix.
pub fn reconstruct<A>(schmidt: &Schmidt<A>) -> SchmidtResult<na::DMatrix<A>>
where A: ComplexScalar
{
    let Schmidt { u, s, v } = schmidt;
    if u.ncols() != s.len() || v.ncols() != s.len() {
        return Err(FactorIncompatibleShape {
            u_cols: u.ncols(),
            s_len: s.len(),
            v_cols: v.ncols(),
        });
    }
    if s.is_empty() {
        return Ok(na::DMatrix::zeros(u.nrows(), v.nrows()));
    }
    let mut us = u.clone();
    us.column_iter_mut().zip(s.iter())
        .for_each(|(mut col, sk)| { col.scale_mut(*sk); });
    Ok(us * v.transpose())
}

/// Reconstruct a flat `n`-qubit state vector from Schmidt factors across a cut
/// after the first `n_left` qubits.
///
/// Fails if the factors are inconsistent with each other or with the
/// bipartition.
pub fn reconstruct_state<A>(schmidt: &Schmidt<A>, n_left: usize, n: usize)
    -> SchmidtResult<na::DVector<A>>
where A: ComplexScalar
{
    reconstruct_state_in(schmidt, &Bipartition::qubits(n, n_left)?)
}

/// Reconstruct a flat state vector from Schmidt factors across a general
/// bipartition.
///
/// Fails if the factors are inconsistent with each other or with the
/// bipartition.
pub fn reconstruct_state_in<A>(schmidt: &Schmidt<A>, part: &Bipartition)
    -> SchmidtResult<na::DVector<A>>
where A: ComplexScalar
{
    let (rows, cols) = schmidt.dims();
    let (d_left, d_right) = part.dims();
    if (rows, cols) != (d_left, d_right) {
        return Err(MatrixIncompatibleShape {
            rows,
            cols,
            expected_rows: d_left,
            expected_cols: d_right,
        });
    }
    part.flatten(&reconstruct(schmidt)?)
}

impl<A> Schmidt<A>
where A: ComplexScalar
{
    /// Recombine into the decomposed matrix. See [`reconstruct`].
    pub fn reconstruct(&self) -> SchmidtResult<na::DMatrix<A>> {
        reconstruct(self)
    }

    /// Recombine into a flat state vector. See [`reconstruct_state_in`].
    pub fn reconstruct_state(&self, part: &Bipartition)
        -> SchmidtResult<na::DVector<A>>
    {
        reconstruct_state_in(self, part)
    }
}

impl<A> Truncated<A>
where A: ComplexScalar
{
    /// Recombine the kept components into an approximation of the original
    /// matrix. See [`reconstruct`].
    pub fn reconstruct(&self) -> SchmidtResult<na::DMatrix<A>> {
        reconstruct(&self.schmidt)
    }

    /// Recombine the kept components into an approximation of the original
    /// state vector. See [`reconstruct_state_in`].
    pub fn reconstruct_state(&self, part: &Bipartition)
        -> SchmidtResult<na::DVector<A>>
    {
        reconstruct_state_in(&self.schmidt, part)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;
    use crate::{ BondDim, C64, ErrorKind, decompose, tol };

    #[test]
    fn full_rank_round_trip() {
        let q: na::DMatrix<f64> =
            na::dmatrix![
                1.0, -2.0, 0.5, 3.0;
                0.0,  1.0, 4.0, -1.0;
            ];
        let schmidt = decompose(q.clone());
        let rec = schmidt.reconstruct().unwrap();
        assert!(tol::approx_eq(&q, &rec, tol::RECON_TOL));
    }

    #[test]
    fn complex_round_trip() {
        let q: na::DMatrix<C64> =
            na::DMatrix::from_fn(4, 2, |i, j| C64::new(i as f64 - 1.5, (i * j) as f64));
        let schmidt = decompose(q.clone());
        let rec = reconstruct(&schmidt).unwrap();
        assert!(tol::approx_eq(&q, &rec, tol::RECON_TOL));
    }

    #[test]
    fn empty_factors() {
        let schmidt: Schmidt<f64> =
            Schmidt {
                u: na::DMatrix::zeros(4, 0),
                s: na::DVector::zeros(0),
                v: na::DMatrix::zeros(2, 0),
            };
        let rec = reconstruct(&schmidt).unwrap();
        assert_eq!(rec, na::DMatrix::zeros(4, 2));
    }

    #[test]
    fn mismatched_factors() {
        let schmidt: Schmidt<f64> =
            Schmidt {
                u: na::DMatrix::identity(2, 2),
                s: na::dvector![1.0],
                v: na::DMatrix::identity(2, 2),
            };
        let err = reconstruct(&schmidt).unwrap_err();
        assert_eq!(err, FactorIncompatibleShape { u_cols: 2, s_len: 1, v_cols: 2 });
        assert_eq!(err.kind(), ErrorKind::Dimension);
    }

    #[test]
    fn state_must_match_cut() {
        let state = na::dvector![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let part = Bipartition::qubits(3, 1).unwrap();
        let schmidt = decompose(part.reshape(&state).unwrap());
        let err = reconstruct_state(&schmidt, 2, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        let rec = reconstruct_state(&schmidt, 1, 3).unwrap();
        assert_abs_diff_eq!((rec - state).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn truncated_error_matches_distance() {
        let q: na::DMatrix<f64> =
            na::DMatrix::from_fn(4, 4, |i, j| ((i + 1) as f64).powi(j as i32 % 3) - j as f64);
        let schmidt = decompose(q.clone());
        for r in 0..=4 {
            let trunc = Truncated::new(&schmidt, BondDim::Const(r)).unwrap();
            let rec = trunc.reconstruct().unwrap();
            assert_abs_diff_eq!(
                tol::frobenius_dist(&q, &rec), trunc.error, epsilon = 1e-10);
        }
    }
}
