//! # Factorization engine
//!
//! Splits the SVD of a preprocessed matrix `Z = U · diag(σ) · Vᵗ` into row
//! factors `F = U · diag(σ^α)` and column factors `G = V · diag(σ^(1−α)) / κ`,
//! truncated to the requested number of dimensions, together with the share
//! of the total squared singular value mass each retained axis explains.

use log::debug;
use ndarray::{s, Array1, Array2, ArrayView2};

use crate::svd::{NalgebraSvd, SvdBackend};
use crate::BiplotError;

/// Denominator used for the explained variance ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariancePolicy {
    /// Sum of every squared singular value.
    #[default]
    FullSpectrum,
    /// Sum of the squared singular values above the null tolerance. Rounding
    /// residue of directions the preprocessing removed is left out.
    NumericalRank,
}

/// Settings of the engine that do not change the factor geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FactorizeOptions {
    pub variance_policy: VariancePolicy,
    /// Absolute bound on the rounding error already in `Z`, used to tell
    /// residue from signal. Zero means `Z` is exact.
    pub noise_floor: f64,
}

/// Row factors, column factors and explained variance of a biplot.
#[derive(Debug, Clone)]
pub struct BiplotFactors {
    row_factors: Array2<f64>,
    column_factors: Array2<f64>,
    explained: Array1<f64>,
    alpha: f64,
    kappa: f64,
}

impl BiplotFactors {
    /// `F`, one row per sample, `n × dim`.
    pub fn row_factors(&self) -> &Array2<f64> {
        &self.row_factors
    }

    /// `G`, one row per variable, `p × dim`, already divided by κ.
    pub fn column_factors(&self) -> &Array2<f64> {
        &self.column_factors
    }

    /// Share of the total squared singular value mass per retained axis.
    pub fn explained(&self) -> &Array1<f64> {
        &self.explained
    }

    pub fn total_explained(&self) -> f64 {
        self.explained.sum()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    pub fn dim(&self) -> usize {
        self.explained.len()
    }

    /// `G · κ`, the column factors before normalization.
    pub fn unscaled_column_factors(&self) -> Array2<f64> {
        &self.column_factors * self.kappa
    }

    /// Rank `dim` approximation `F · (G · κ)ᵗ` of the preprocessed matrix.
    pub fn reconstruct(&self) -> Array2<f64> {
        self.row_factors.dot(&self.unscaled_column_factors().t())
    }

    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>, Array1<f64>) {
        (self.row_factors, self.column_factors, self.explained)
    }
}

pub(crate) fn check_dimension(dim: usize) -> Result<(), BiplotError> {
    match dim {
        2 | 3 => Ok(()),
        other => Err(BiplotError::InvalidDimension(other)),
    }
}

pub(crate) fn check_alpha(alpha: f64) -> Result<(), BiplotError> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(BiplotError::InvalidShapeParameter(alpha))
    }
}

pub(crate) fn check_kappa(kappa: f64) -> Result<(), BiplotError> {
    if kappa.is_finite() && kappa > 0.0 {
        Ok(())
    } else {
        Err(BiplotError::InvalidNormalization(kappa))
    }
}

/// At least 2x2 and free of NaN and infinities.
pub(crate) fn check_matrix(x: ArrayView2<f64>) -> Result<(), BiplotError> {
    let (rows, cols) = x.dim();
    if rows < 2 || cols < 2 {
        return Err(BiplotError::InvalidShape { rows, cols });
    }
    if let Some(((row, col), _)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(BiplotError::NonFiniteInput { row, col });
    }
    Ok(())
}

/// Factorizes `z` with the default backend and the full-spectrum variance
/// denominator.
pub fn factorize(
    z: ArrayView2<f64>,
    alpha: f64,
    kappa: f64,
    dim: usize,
) -> Result<BiplotFactors, BiplotError> {
    factorize_with(
        z,
        alpha,
        kappa,
        dim,
        &NalgebraSvd::default(),
        &FactorizeOptions::default(),
    )
}

pub fn factorize_with<B: SvdBackend + ?Sized>(
    z: ArrayView2<f64>,
    alpha: f64,
    kappa: f64,
    dim: usize,
    backend: &B,
    options: &FactorizeOptions,
) -> Result<BiplotFactors, BiplotError> {
    check_dimension(dim)?;
    check_alpha(alpha)?;
    check_kappa(kappa)?;
    check_matrix(z)?;

    let (n, p) = z.dim();
    let decomposition = backend.decompose(z)?;

    let rank = decomposition.numerical_rank(options.noise_floor);
    if decomposition.largest() == 0.0 || rank == 0 {
        return Err(BiplotError::DegenerateInput);
    }

    let available = n.min(p).min(decomposition.len());
    if dim > available || dim > rank {
        return Err(BiplotError::InsufficientRank {
            requested: dim,
            rank: rank.min(available),
        });
    }

    // Shares are ratios of (σ/σ₀)², which stay finite at any magnitude.
    let squares = decomposition.relative_squares();
    let denominator = match options.variance_policy {
        VariancePolicy::FullSpectrum => squares.sum(),
        VariancePolicy::NumericalRank => squares.slice(s![..rank]).sum(),
    };

    let sigma = decomposition.s().slice(s![..dim]);
    let u = decomposition.u().slice(s![.., ..dim]);
    let v = decomposition.v().slice(s![.., ..dim]);

    let row_weights = sigma.mapv(|value| value.powf(alpha));
    let column_weights = sigma.mapv(|value| value.powf(1.0 - alpha));

    let row_factors = &u * &row_weights;
    let column_factors = (&v * &column_weights) / kappa;
    let explained = squares.slice(s![..dim]).mapv(|value| value / denominator);

    debug!(
        "factorized {}x{} matrix: rank {}, alpha {}, kappa {}, explained {:?}",
        n, p, rank, alpha, kappa, explained
    );

    Ok(BiplotFactors {
        row_factors,
        column_factors,
        explained,
        alpha,
        kappa,
    })
}
