//! Truncation of Schmidt decompositions to a smaller bond dimension.
//!
//! Keeping only the `r'` largest Schmidt components of a decomposition gives
//! the best rank-`r'` approximation of the state in the Frobenius (state)
//! norm, with error exactly
//! ```text
//! ‖ψ - ψ'‖ = sqrt(Σ_{k ≥ r'} s_k²)
//! ```
//! (0-based). This error is always computed alongside the truncated factors.

use log::debug;
use nalgebra as na;
use crate::{
    ComplexScalar,
    SchmidtError,
    SchmidtResult,
    schmidt::Schmidt,
    tol,
};
use SchmidtError::*;

/// Specify a method to set the bond dimension of a truncated Schmidt
/// decomposition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BondDim {
    /// Keep exactly this many of the largest Schmidt values. Must be at most
    /// the number of Schmidt values available.
    Const(usize),
    /// Keep all Schmidt values strictly greater than this (non-negative)
    /// threshold.
    Cutoff(f64),
}

impl BondDim {
    /// Resolve to a number of Schmidt values to keep from a non-increasing
    /// sequence `s`.
    ///
    /// Fails if a fixed rank exceeds the length of `s` or a cutoff is negative
    /// or NaN.
    pub fn resolve(&self, s: &na::DVector<f64>) -> SchmidtResult<usize> {
        match *self {
            Self::Const(rank) => {
                if rank > s.len() {
                    Err(RankOutOfRange { rank, max: s.len() })
                } else {
                    Ok(rank)
                }
            },
            Self::Cutoff(eps) => {
                if eps.is_nan() || eps < 0.0 { return Err(InvalidCutoff); }
                Ok(s.iter().take_while(|sk| **sk > eps).count())
            },
        }
    }
}

/// A Schmidt decomposition restricted to its leading components, alongside
/// the error incurred by discarding the rest.
#[derive(Clone, Debug, PartialEq)]
pub struct Truncated<A>
where A: ComplexScalar
{
    /// The kept Schmidt components.
    pub schmidt: Schmidt<A>,
    /// Frobenius distance between the original and truncated
    /// reconstructions, `sqrt(Σ_{k ≥ r'} s_k²)`.
    pub error: f64,
    // norm of the untruncated decomposition
    pub(crate) norm: f64,
}

impl<A> Truncated<A>
where A: ComplexScalar
{
    /// Truncate a Schmidt decomposition, keeping its leading components
    /// according to `keep`.
    ///
    /// `schmidt` is taken to be the full decomposition: the reported error and
    /// fidelity are measured against it alone. To truncate an already
    /// truncated decomposition further, use [`truncate`][Self::truncate],
    /// which accounts for the components discarded earlier.
    ///
    /// Fails if `keep` asks for more components than are available or gives an
    /// invalid cutoff. Out-of-range requests are never clipped.
    pub fn new(schmidt: &Schmidt<A>, keep: BondDim) -> SchmidtResult<Self> {
        let r = schmidt.len();
        let rank = keep.resolve(&schmidt.s)?;
        let error = tol::tail_norm(&schmidt.s, rank);
        let norm = schmidt.norm();
        let s = schmidt.s.rows(0, rank).into_owned();
        let u = schmidt.u.columns(0, rank).into_owned();
        let v = schmidt.v.columns(0, rank).into_owned();
        debug!("truncated {} Schmidt values to {}: error {:e}", r, rank, error);
        Ok(Self { schmidt: Schmidt { u, s, v }, error, norm })
    }

    /// Truncate the kept components further.
    ///
    /// Discarded tails are orthogonal to everything kept, so the new error is
    /// the quadrature sum of the previous error and that of the new tail, and
    /// stays measured against the original decomposition.
    pub fn truncate(&self, keep: BondDim) -> SchmidtResult<Self> {
        let Self { schmidt, error: tail, norm: _ } = Self::new(&self.schmidt, keep)?;
        let error = (self.error * self.error + tail * tail).sqrt();
        Ok(Self { schmidt, error, norm: self.norm })
    }

    /// Return the number of kept Schmidt components.
    pub fn bond_dim(&self) -> usize { self.schmidt.len() }

    /// Return the squared norm of the discarded part of the state,
    /// `Σ_{k ≥ r'} s_k²`.
    pub fn discarded_weight(&self) -> f64 { self.error * self.error }

    /// Return the fraction of the squared norm of the original state that is
    /// kept.
    ///
    /// For a normalized state this is the overlap `|⟨ψ∣ψ'⟩|²` with the
    /// renormalized approximation. The fidelity of a zero state is 1.
    pub fn fidelity(&self) -> f64 {
        let total = self.norm * self.norm;
        if total <= 0.0 { return 1.0; }
        (1.0 - self.discarded_weight() / total).clamp(0.0, 1.0)
    }

    /// Rescale the kept Schmidt values so that their norm equals that of the
    /// original, untruncated decomposition, and return the result.
    ///
    /// This is the usual approximation when a truncated state must remain
    /// normalized. Nothing is rescaled if all kept values are zero.
    pub fn renormalized(self) -> Schmidt<A> {
        let Self { schmidt: Schmidt { u, mut s, v }, error: _, norm } = self;
        let kept = tol::tail_norm(&s, 0);
        if kept > 0.0 { s.scale_mut(norm / kept); }
        Schmidt { u, s, v }
    }
}

/// Truncate a Schmidt decomposition, keeping its leading components according
/// to `keep`.
///
/// This is the same as [`Truncated::new`].
pub fn truncate<A>(schmidt: &Schmidt<A>, keep: BondDim)
    -> SchmidtResult<Truncated<A>>
where A: ComplexScalar
{
    Truncated::new(schmidt, keep)
}
