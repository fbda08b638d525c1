//! Schmidt decompositions of pure states across a single bipartition.
//!
//! A pure state of *N* sites, each with local dimension *b*, is a vector of
//! *b*<sup>*N*</sup> amplitudes. Splitting the sites into a left block of
//! `n_left` sites and a right block of the remaining ones lets the same data
//! be read as a *b*<sup>`n_left`</sup> × *b*<sup>*N* – `n_left`</sup> matrix,
//! whose singular value decomposition is the Schmidt decomposition of the
//! state across the cut. The number of significant singular values (the
//! Schmidt rank) bounds the number of product terms needed to represent the
//! state, and dropping the smallest ones gives a compressed approximation with
//! an exactly known error.
//!
//! The pipeline is
//! ```text
//! state ──reshape──> matrix ──decompose──> (U, S, V) ──truncate──> (U', S', V')
//!   ^                                                                  │
//!   └─────────────flatten <──── matrix <────reconstruct────────────────┘
//! ```
//!
//! Flat state indices follow a single convention everywhere in this crate:
//! for per-site quantum numbers `(i_0, i_1, ..., i_{N-1})`, the flat index is
//! `k = Σ_j i_j b^(N - 1 - j)`, i.e. the left-most site is the most
//! significant digit. See [`sites`] for more information.
//!
//! # Example
//!
//! ```
//! use nalgebra as na;
//! use schmidt_split::*;
//!
//! // unnormalized 4-qubit GHZ state, ∣0000⟩ + ∣1111⟩
//! let mut state: na::DVector<f64> = na::DVector::zeros(16);
//! state[0] = 1.0;
//! state[15] = 1.0;
//!
//! let mat = reshape(&state, 2, 4).unwrap();
//! let schmidt = decompose(mat);
//! assert_eq!(schmidt.rank(), 2);
//!
//! // keeping only one Schmidt component discards a weight of exactly 1
//! let trunc = truncate(&schmidt, BondDim::Const(1)).unwrap();
//! assert!((trunc.error - 1.0).abs() < 1e-12);
//!
//! // keeping two is exact
//! let trunc = truncate(&schmidt, BondDim::Const(2)).unwrap();
//! let approx = reconstruct_state(&trunc.schmidt, 2, 4).unwrap();
//! assert!((approx - state).norm() < 1e-12);
//! ```

use nalgebra as na;
use thiserror::Error;

pub mod tol;
pub mod sites;
pub mod schmidt;
pub mod truncate;
pub mod reconstruct;

pub use num_complex::Complex64 as C64;
pub use sites::{ Bipartition, reshape, flatten };
pub use schmidt::{ Schmidt, decompose, decompose_state };
pub use truncate::{ BondDim, Truncated, truncate };
pub use reconstruct::{ reconstruct, reconstruct_state, reconstruct_state_in };

/// Convenience trait to identify (real or complex) number types that can be
/// used as state amplitudes in linear-algebraic operations.
///
/// All real-valued quantities (singular values, norms, errors, entropies) are
/// `f64`, so this covers `f64` and [`C64`].
pub trait ComplexScalar
where Self: na::ComplexField<RealField = f64> + Copy
{ }

impl<A> ComplexScalar for A
where A: na::ComplexField<RealField = f64> + Copy
{ }

/// Broad classification of [`SchmidtError`]s.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A state or matrix does not have the shape implied by a bipartition, or
    /// the bipartition itself is invalid.
    Shape,
    /// A requested truncation lies outside the range of available ranks or
    /// values.
    Range,
    /// A set of Schmidt factors is internally inconsistent.
    Dimension,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchmidtError {
    /// Returned when a bipartition is requested for sites with no available
    /// quantum numbers.
    #[error("shape error: unphysical zero-dimensional local index")]
    ZeroLocalDim,

    /// Returned when the dimension of a (sub)system overflows `usize`.
    #[error("shape error: Hilbert space dimension overflows")]
    DimensionOverflow,

    /// Returned when a state vector's length is not an integer power of the
    /// local dimension.
    #[error("shape error: state length {len} is not a power of local dimension {local_dim}")]
    NotAPower { len: usize, local_dim: usize },

    /// Returned when a state vector's length does not match the number of
    /// sites.
    #[error("shape error: state length {len} does not match system dimension {expected}")]
    StateIncompatibleShape { len: usize, expected: usize },

    /// Returned when the left block of a bipartition is larger than the whole
    /// system.
    #[error("shape error: bipartition at {n_left} is out of bounds for {n} sites")]
    BipartitionOutOfBounds { n_left: usize, n: usize },

    /// Returned when a matrix's dimensions do not match a bipartition.
    #[error("shape error: matrix has shape {rows}×{cols}, expected {expected_rows}×{expected_cols}")]
    MatrixIncompatibleShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    /// Returned when a truncation to a rank larger than the number of
    /// available Schmidt values is requested.
    #[error("range error: cannot truncate to rank {rank} with only {max} Schmidt values")]
    RankOutOfRange { rank: usize, max: usize },

    /// Returned when a truncation cutoff is negative or NaN.
    #[error("range error: truncation cutoff must be a non-negative number")]
    InvalidCutoff,

    /// Returned when the left vectors, Schmidt values, and right vectors of a
    /// factorization disagree on the number of Schmidt components.
    #[error("dimension error: factors have {u_cols} left vectors, {s_len} Schmidt values, and {v_cols} right vectors")]
    FactorIncompatibleShape { u_cols: usize, s_len: usize, v_cols: usize },
}

impl SchmidtError {
    /// Return the broad classification of `self`.
    pub fn kind(&self) -> ErrorKind {
        use SchmidtError::*;
        match self {
            ZeroLocalDim
            | DimensionOverflow
            | NotAPower { .. }
            | StateIncompatibleShape { .. }
            | BipartitionOutOfBounds { .. }
            | MatrixIncompatibleShape { .. }
                => ErrorKind::Shape,
            RankOutOfRange { .. } | InvalidCutoff => ErrorKind::Range,
            FactorIncompatibleShape { .. } => ErrorKind::Dimension,
        }
    }
}

pub type SchmidtResult<T> = Result<T, SchmidtError>;
