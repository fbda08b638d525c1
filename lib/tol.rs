//! Numerical tolerances and small helpers for comparing singular values and
//! matrices.
//!
//! Singular values computed in floating-point arithmetic are almost never
//! exactly zero, even when the underlying matrix is exactly rank-deficient.
//! Values are therefore compared against a threshold relative to the largest
//! singular value, and matrices are compared in the Frobenius norm relative to
//! their own size.

use nalgebra as na;
use crate::ComplexScalar;

/// Default relative threshold below which a singular value is considered
/// zero: `s_k` counts toward the Schmidt rank iff `s_k > RANK_TOL * max(s)`.
pub const RANK_TOL: f64 = 1e-12;

/// Default relative tolerance for comparing reconstructed matrices and states
/// against originals; see [`approx_eq`].
pub const RECON_TOL: f64 = 1e-10;

/// Return the absolute threshold `tol * max(s)`.
///
/// Non-finite entries of `s` are ignored; the threshold for an empty or
/// all-zero `s` is zero.
pub fn rank_threshold(s: &na::DVector<f64>, tol: f64) -> f64 {
    let smax: f64 =
        s.iter()
        .filter(|sk| sk.is_finite())
        .fold(0.0, |acc, sk| acc.max(sk.abs()));
    tol.abs() * smax
}

/// Count the number of values in `s` that are strictly greater than
/// `tol * max(s)`.
///
/// An all-zero `s` has rank zero.
pub fn numerical_rank(s: &na::DVector<f64>, tol: f64) -> usize {
    let thresh = rank_threshold(s, tol);
    s.iter()
        .filter(|sk| sk.is_finite() && **sk > thresh && **sk > 0.0)
        .count()
}

/// Compute `sqrt(Σ_{k ≥ from} s_k²)`, the norm of the tail of `s` starting at
/// (0-based) position `from`.
///
/// Returns zero if `from` is past the end of `s`.
pub fn tail_norm(s: &na::DVector<f64>, from: usize) -> f64 {
    s.iter().skip(from)
        .map(|sk| sk * sk)
        .sum::<f64>()
        .sqrt()
}

/// Compute the Frobenius distance `‖a - b‖`.
///
/// *Panics if `a` and `b` have different shapes.*
pub fn frobenius_dist<A>(a: &na::DMatrix<A>, b: &na::DMatrix<A>) -> f64
where A: ComplexScalar
{
    if a.shape() != b.shape() { panic!("inconsistent dimensions"); }
    a.iter().zip(b.iter())
        .map(|(ak, bk)| (*ak - *bk).modulus_squared())
        .sum::<f64>()
        .sqrt()
}

/// Return `true` if `a` and `b` have the same shape and
/// `‖a - b‖ ≤ tol * max(1, ‖a‖)`.
///
/// The comparison is relative for matrices of large norm and absolute for
/// small ones, so that all-zero matrices can be compared.
pub fn approx_eq<A>(a: &na::DMatrix<A>, b: &na::DMatrix<A>, tol: f64) -> bool
where A: ComplexScalar
{
    a.shape() == b.shape()
        && frobenius_dist(a, b) <= tol * a.norm().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_counts_relative_to_largest() {
        // threshold is 2e-12
        let s = na::dvector![2.0, 1.0, 1e-11, 1e-13, 0.0];
        assert_eq!(numerical_rank(&s, RANK_TOL), 3);
        assert_eq!(numerical_rank(&s, 1e-10), 2);
        assert_eq!(numerical_rank(&s, 0.75), 1);
    }

    #[test]
    fn rank_threshold_scales_with_largest() {
        let s = na::dvector![2e-12, 1e-24];
        assert!((rank_threshold(&s, RANK_TOL) - 2e-24).abs() < 1e-36);
        assert_eq!(numerical_rank(&s, RANK_TOL), 1);
        let s = na::dvector![2e-12, 1e-11 * 2e-12];
        assert_eq!(numerical_rank(&s, RANK_TOL), 2);
    }

    #[test]
    fn rank_of_zeros() {
        let s: na::DVector<f64> = na::DVector::zeros(4);
        assert_eq!(numerical_rank(&s, RANK_TOL), 0);
        let s: na::DVector<f64> = na::DVector::zeros(0);
        assert_eq!(numerical_rank(&s, RANK_TOL), 0);
    }

    #[test]
    fn tail() {
        let s = na::dvector![3.0, 4.0, 0.0];
        assert_eq!(tail_norm(&s, 0), 5.0);
        assert_eq!(tail_norm(&s, 1), 4.0);
        assert_eq!(tail_norm(&s, 3), 0.0);
        assert_eq!(tail_norm(&s, 10), 0.0);
    }

    #[test]
    fn matrix_comparison() {
        let a: na::DMatrix<f64> = na::dmatrix![1.0, 0.0; 0.0, 1.0];
        let b: na::DMatrix<f64> = na::dmatrix![1.0, 1e-12; 0.0, 1.0];
        let c: na::DMatrix<f64> = na::dmatrix![1.0, 0.0, 0.0; 0.0, 1.0, 0.0];
        assert!(approx_eq(&a, &b, RECON_TOL));
        assert!(!approx_eq(&a, &b, 1e-14));
        assert!(!approx_eq(&a, &c, RECON_TOL));
        assert!((frobenius_dist(&a, &b) - 1e-12).abs() < 1e-20);
    }
}
