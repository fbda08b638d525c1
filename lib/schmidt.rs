//! Schmidt decompositions of bipartite pure states via the singular value
//! decomposition.
//!
//! For a state `∣ψ⟩` with matrix view `M` across some bipartition (see
//! [`sites`][crate::sites]), the SVD `M = U diag(s) Vᵀ` gives
//! ```text
//! ∣ψ⟩ = Σ_k s_k ∣u_k⟩ ⊗ ∣v_k⟩
//! ```
//! where `∣u_k⟩` and `∣v_k⟩` are the columns of `U` and `V`, and the Schmidt
//! values `s_k` are non-negative and non-increasing. Note that the right
//! vectors are the columns of `V` itself, not of its complex conjugate, so the
//! relation above holds as written for complex amplitudes as well.
//!
//! When two or more Schmidt values are equal, the corresponding vectors are
//! only determined up to a unitary rotation within their common subspace (and
//! every vector only up to a phase). Different SVD routines may return
//! different, equally valid, bases; compare Schmidt values, reconstructions, or
//! projectors rather than raw vectors.

use itertools::Itertools;
use log::debug;
use nalgebra as na;
use crate::{
    ComplexScalar,
    SchmidtResult,
    sites::Bipartition,
    tol,
};

/// Data struct holding a Schmidt decomposition across a single bipartition.
///
/// For a freshly computed decomposition of a `d_left × d_right` matrix, `u` is
/// `d_left × r` and `v` is `d_right × r` with `r = min(d_left, d_right)`.
/// Truncated decompositions (see [`truncate`][crate::truncate]) keep fewer
/// components.
#[derive(Clone, Debug, PartialEq)]
pub struct Schmidt<A>
where A: ComplexScalar
{
    /// Left Schmidt column vectors.
    pub u: na::DMatrix<A>,
    /// Schmidt values, in non-increasing order.
    pub s: na::DVector<f64>,
    /// Right Schmidt column vectors.
    pub v: na::DMatrix<A>,
}

impl<A> Schmidt<A>
where A: ComplexScalar
{
    /// Compute the full Schmidt decomposition of a matrix.
    ///
    /// No components are discarded, even those with zero Schmidt value; see
    /// [`rank`][Self::rank] for the number of significant ones.
    pub fn decompose(q: na::DMatrix<A>) -> Self {
        let (m, n) = q.shape();
        let svd = q.svd(true, true);
        let Some(u) = svd.u else { unreachable!() };
        let s = svd.singular_values;
        let Some(v_t) = svd.v_t else { unreachable!() };

        // stable sort, so ties keep the order given by the SVD
        let r = s.len();
        let order: Vec<usize> =
            (0..r)
            .sorted_by(|&i, &j| s[j].total_cmp(&s[i]))
            .collect();
        let s = na::DVector::from_iterator(r, order.iter().map(|&k| s[k].abs()));
        let u = u.select_columns(order.iter());
        let v = v_t.select_rows(order.iter()).transpose();

        let new = Self { u, s, v };
        debug!(
            "decomposed {}×{} matrix: {} Schmidt values, rank {}",
            m, n, r, new.rank(),
        );
        new
    }

    /// Return the number of Schmidt components held, including any that are
    /// numerically zero.
    pub fn len(&self) -> usize { self.s.len() }

    /// Return `true` if no Schmidt components are held.
    pub fn is_empty(&self) -> bool { self.s.is_empty() }

    /// Return the dimensions `(d_left, d_right)` of the decomposed matrix.
    pub fn dims(&self) -> (usize, usize) { (self.u.nrows(), self.v.nrows()) }

    /// Return the largest Schmidt rank possible for a matrix of these
    /// dimensions, `min(d_left, d_right)`.
    pub fn max_rank(&self) -> usize {
        let (m, n) = self.dims();
        m.min(n)
    }

    /// Return the numerical Schmidt rank using the default threshold
    /// [`tol::RANK_TOL`].
    pub fn rank(&self) -> usize { self.rank_tol(tol::RANK_TOL) }

    /// Return the numerical Schmidt rank: the number of Schmidt values
    /// strictly greater than `tol * max(s)`.
    pub fn rank_tol(&self, tol: f64) -> usize {
        tol::numerical_rank(&self.s, tol)
    }

    /// Return the Frobenius norm of the decomposed matrix, `sqrt(Σ_k s_k²)`.
    /// This is equal to the norm of the corresponding state.
    pub fn norm(&self) -> f64 { tol::tail_norm(&self.s, 0) }

    // squared Schmidt values normalized to sum to 1, i.e. the spectrum of
    // either reduced density matrix; empty for a zero state
    fn probs(&self) -> Vec<f64> {
        let norm2: f64 = self.s.iter().map(|sk| sk * sk).sum();
        if norm2 <= 0.0 { return Vec::new(); }
        self.s.iter()
            .map(|sk| sk * sk / norm2)
            .filter(|pk| *pk > 0.0)
            .collect()
    }

    /// Compute the Von Neumann entropy across the bipartition.
    ///
    /// Schmidt values are normalized first, so the state need not be. The
    /// entropy of a zero state is taken to be zero.
    pub fn entropy_vn(&self) -> f64 {
        self.probs().into_iter()
            .map(|pk| -pk * pk.ln())
            .sum()
    }

    /// Compute the `a`-th Rényi entropy across the bipartition.
    ///
    /// Returns the Von Neumann entropy for `a == 1`.
    pub fn entropy_ry(&self, a: f64) -> f64 {
        if a == 1.0 {
            self.entropy_vn()
        } else {
            let probs = self.probs();
            if probs.is_empty() { return 0.0; }
            probs.into_iter()
                .map(|pk| pk.powf(a))
                .sum::<f64>()
                .ln()
                / (1.0 - a)
        }
    }
}

/// Compute the full Schmidt decomposition of a matrix.
///
/// This is the same as [`Schmidt::decompose`].
pub fn decompose<A>(matrix: na::DMatrix<A>) -> Schmidt<A>
where A: ComplexScalar
{
    Schmidt::decompose(matrix)
}

/// Compute the Schmidt decomposition of a flat state vector across a
/// bipartition.
///
/// Fails if the state does not agree in length with the bipartition.
pub fn decompose_state<A>(state: &na::DVector<A>, part: &Bipartition)
    -> SchmidtResult<Schmidt<A>>
where A: ComplexScalar
{
    part.reshape(state).map(Schmidt::decompose)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;
    use crate::{ C64, reconstruct };

    fn usv<A>(schmidt: &Schmidt<A>) -> na::DMatrix<A>
    where A: ComplexScalar
    {
        reconstruct(schmidt).unwrap()
    }

    #[test]
    fn diagonal_matrix_sorted() {
        let q: na::DMatrix<f64> =
            na::dmatrix![
                1.0, 0.0, 0.0;
                0.0, 3.0, 0.0;
                0.0, 0.0, 2.0;
            ];
        let schmidt = decompose(q.clone());
        assert_abs_diff_eq!(schmidt.s[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(schmidt.s[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(schmidt.s[2], 1.0, epsilon = 1e-12);
        assert_eq!(schmidt.rank(), 3);
        assert!(tol::approx_eq(&q, &usv(&schmidt), tol::RECON_TOL));
    }

    #[test]
    fn shapes_follow_cut() {
        let q: na::DMatrix<f64> = na::DMatrix::from_fn(2, 8, |i, j| (i + 2 * j) as f64);
        let schmidt = decompose(q.clone());
        assert_eq!(schmidt.u.shape(), (2, 2));
        assert_eq!(schmidt.v.shape(), (8, 2));
        assert_eq!(schmidt.s.len(), 2);
        assert_eq!(schmidt.dims(), (2, 8));
        assert_eq!(schmidt.max_rank(), 2);
        assert!(tol::approx_eq(&q, &usv(&schmidt), tol::RECON_TOL));

        let schmidt = decompose(q.transpose());
        assert_eq!(schmidt.u.shape(), (8, 2));
        assert_eq!(schmidt.v.shape(), (2, 2));
    }

    #[test]
    fn product_state() {
        // (∣0⟩ + ∣1⟩) ⊗ (∣0⟩ - ∣1⟩) / 2
        let state = na::dvector![0.5, -0.5, 0.5, -0.5];
        let part = Bipartition::qubits(2, 1).unwrap();
        let schmidt = decompose_state(&state, &part).unwrap();
        assert_eq!(schmidt.rank(), 1);
        assert_abs_diff_eq!(schmidt.s[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(schmidt.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(schmidt.entropy_vn(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(schmidt.entropy_ry(2.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn bell_state_complex() {
        // (∣01⟩ + i∣10⟩) / √2
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let state: na::DVector<C64> =
            na::dvector![
                C64::new(0.0, 0.0),
                C64::new(h, 0.0),
                C64::new(0.0, h),
                C64::new(0.0, 0.0),
            ];
        let part = Bipartition::qubits(2, 1).unwrap();
        let q = part.reshape(&state).unwrap();
        let schmidt = decompose(q.clone());
        assert_eq!(schmidt.rank(), 2);
        assert_abs_diff_eq!(schmidt.s[0], h, epsilon = 1e-12);
        assert_abs_diff_eq!(schmidt.s[1], h, epsilon = 1e-12);
        assert_abs_diff_eq!(schmidt.entropy_vn(), 2.0_f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(schmidt.entropy_ry(2.0), 2.0_f64.ln(), epsilon = 1e-12);
        assert!(tol::approx_eq(&q, &usv(&schmidt), tol::RECON_TOL));
    }

    #[test]
    fn zero_matrix() {
        let q: na::DMatrix<f64> = na::DMatrix::zeros(4, 2);
        let schmidt = decompose(q);
        assert_eq!(schmidt.len(), 2);
        assert_eq!(schmidt.rank(), 0);
        assert_eq!(schmidt.norm(), 0.0);
        assert_eq!(schmidt.entropy_vn(), 0.0);
        assert_eq!(schmidt.entropy_ry(0.5), 0.0);
    }

    #[test]
    fn rank_tolerance() {
        let q: na::DMatrix<f64> = na::dmatrix![1.0, 0.0; 0.0, 1e-6];
        let schmidt = decompose(q);
        assert_eq!(schmidt.rank(), 2);
        assert_eq!(schmidt.rank_tol(1e-3), 1);
    }
}
