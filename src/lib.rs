//! # single_biplot
//!
//! Rank-reduced two-factor decompositions of a data matrix, laid out so that
//! rows (samples) and columns (variables) can be drawn jointly in two or three
//! dimensions. Both the classical Gabriel biplot (`form`, `cov`) and its
//! log-ratio variant for compositional data (`rform`, `rcov`) are supported.
//!
//! The pipeline is
//! `matrix -> kind resolution -> centering -> SVD -> (F, G, explained)`.
//! Drawing the result is left to the caller.
//!
//! ```no_run
//! use ndarray::array;
//! use single_biplot::compute_biplot;
//!
//! let x = array![
//!     [0.10, 0.20, 0.30, 0.40],
//!     [0.25, 0.25, 0.25, 0.25],
//!     [0.40, 0.30, 0.20, 0.10],
//!     [0.05, 0.15, 0.50, 0.30],
//! ];
//! let factors = compute_biplot(x.view(), "rform", 2).unwrap();
//! assert_eq!(factors.row_factors().dim(), (4, 2));
//! ```

use ndarray::ArrayView2;
use thiserror::Error;

pub mod biplot;
pub mod factorize;
pub mod kind;
pub mod preprocess;
pub mod svd;
mod utils;

pub use biplot::{Biplot, BiplotBuilder, BiplotConfig, DEFAULT_DIM};
pub use factorize::{factorize, factorize_with, BiplotFactors, FactorizeOptions, VariancePolicy};
pub use kind::{BiplotKind, KappaRule, KindParameters};
pub use preprocess::{center, logcenter, Transform};
pub use svd::{Decomposition, NalgebraSvd, SvdBackend};
pub use utils::{margin_means, Direction, FloatOps};

/// The error type for biplot computations.
#[derive(Debug, Error)]
pub enum BiplotError {
    #[error("invalid biplot kind `{0}`, expected one of form, cov, rform, rcov")]
    InvalidKind(String),
    #[error("invalid transform `{0}`, expected center or logcenter")]
    InvalidTransform(String),
    #[error("invalid dimension {0}, biplots are drawn in 2 or 3 dimensions")]
    InvalidDimension(usize),
    #[error("shape parameter {0} is outside [0, 1]")]
    InvalidShapeParameter(f64),
    #[error("normalization constant {0} must be finite and positive")]
    InvalidNormalization(f64),
    #[error("matrix of shape {rows}x{cols} is too small, at least 2x2 is required")]
    InvalidShape { rows: usize, cols: usize },
    #[error("non-finite entry at ({row}, {col})")]
    NonFiniteInput { row: usize, col: usize },
    #[error("log-ratio transform requires strictly positive entries, found {value} at ({row}, {col})")]
    DomainError { row: usize, col: usize, value: f64 },
    #[error("requested {requested} dimensions but the transformed matrix has numerical rank {rank}")]
    InsufficientRank { requested: usize, rank: usize },
    #[error("transformed matrix has no variation above rounding level")]
    DegenerateInput,
    #[error("singular value decomposition failed: {0}")]
    Decomposition(#[from] anyhow::Error),
}

/// Computes the biplot factors of `matrix` for the kind named by `kind`
/// (`"form"`, `"cov"`, `"rform"` or `"rcov"`) in `dim` dimensions.
pub fn compute_biplot(
    matrix: ArrayView2<f64>,
    kind: &str,
    dim: usize,
) -> Result<BiplotFactors, BiplotError> {
    let kind: BiplotKind = kind.parse()?;
    compute_biplot_with_kind(matrix, kind, dim)
}

pub fn compute_biplot_with_kind(
    matrix: ArrayView2<f64>,
    kind: BiplotKind,
    dim: usize,
) -> Result<BiplotFactors, BiplotError> {
    BiplotBuilder::new(kind).dim(dim).build().compute(matrix)
}
