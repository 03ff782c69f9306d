//! # Preprocessing
//!
//! Centering transforms applied to the raw matrix before it is decomposed.
//!
//! - [`center`]: column centering, the classical biplot transform.
//! - [`logcenter`]: double centering in log space, used by the relative
//!   variation biplots of compositional data.
//!
//! Both return a new matrix of the same shape and never touch their input.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use rayon::prelude::*;

use crate::utils::{margin_means, stable_norm, Direction, FloatOps};
use crate::BiplotError;

/// Subtracts the mean of every column from that column.
pub fn center<T: FloatOps>(x: ArrayView2<T>) -> Array2<T> {
    let means = margin_means(x, Direction::Column);
    let mut centered = x.to_owned();

    centered
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(|mut row| {
            row.zip_mut_with(&means, |value, &mean| *value = *value - mean);
        });

    centered
}

/// Double centering of the natural logarithm of `x`:
/// `L - colmean(L) - rowmean(L) + mean(L)` with `L = ln(x)`.
///
/// Every entry of `x` must be strictly positive. The first offending entry in
/// row-major order is reported otherwise.
pub fn logcenter<T: FloatOps>(x: ArrayView2<T>) -> Result<Array2<T>, BiplotError> {
    if let Some(((row, col), value)) = x.indexed_iter().find(|(_, v)| !(**v > T::zero())) {
        return Err(BiplotError::DomainError {
            row,
            col,
            value: value.to_f64().unwrap_or(f64::NAN),
        });
    }

    let mut logs = x.mapv(T::ln);
    let col_means = margin_means(logs.view(), Direction::Column);
    let row_means = margin_means(logs.view(), Direction::Row);
    let grand_mean = logs.mean().unwrap_or_else(T::zero);

    Zip::from(logs.rows_mut())
        .and(&row_means)
        .par_for_each(|mut row, &row_mean| {
            row.zip_mut_with(&col_means, |value, &col_mean| {
                *value = *value - col_mean - row_mean + grand_mean;
            });
        });

    Ok(logs)
}

/// Rounding steps a transformed entry accumulates: the logarithm, two margin
/// means and the grand mean.
const ROUNDING_STEPS: f64 = 4.0;

/// Matrix transform applied ahead of the decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    Center,
    LogCenter,
}

impl Transform {
    pub fn apply<T: FloatOps>(&self, x: ArrayView2<T>) -> Result<Array2<T>, BiplotError> {
        match self {
            Transform::Center => Ok(center(x)),
            Transform::LogCenter => logcenter(x),
        }
    }

    /// Absolute bound on the rounding error the transform leaves in its
    /// output, as a spectral norm.
    ///
    /// The error of an entry scales with the largest magnitude in its column
    /// (of `x` for [`Transform::Center`], of `ln(x)` for
    /// [`Transform::LogCenter`]), so one large column does not raise the bound
    /// for the others.
    pub fn noise_floor(&self, x: ArrayView2<f64>) -> f64 {
        let magnitudes: Array1<f64> = x
            .axis_iter(Axis(1))
            .map(|column| column.fold(0.0_f64, |acc, &v| acc.max(self.magnitude(v))))
            .collect();
        ROUNDING_STEPS * f64::EPSILON * (x.nrows() as f64).sqrt() * stable_norm(magnitudes.view())
    }

    fn magnitude(&self, value: f64) -> f64 {
        match self {
            Transform::Center => value.abs(),
            Transform::LogCenter if value > 0.0 => value.ln().abs(),
            Transform::LogCenter => 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Center => "center",
            Transform::LogCenter => "logcenter",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = BiplotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Transform::Center),
            "logcenter" => Ok(Transform::LogCenter),
            other => Err(BiplotError::InvalidTransform(other.to_string())),
        }
    }
}
