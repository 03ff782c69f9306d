//! # Singular value decomposition
//!
//! The decomposition routine sits behind [`SvdBackend`] so the factorization
//! engine does not depend on a particular linear algebra library. The pure
//! Rust [`NalgebraSvd`] backend is always available; `faer` and LAPACK backed
//! implementations are enabled through the cargo features of the same name.

use std::cmp::Ordering;

use anyhow::{bail, ensure};
use ndarray::{Array1, Array2, ArrayView2, Axis};

mod native;
pub use native::NalgebraSvd;

#[cfg(feature = "faer")]
pub mod faer;
#[cfg(feature = "faer")]
pub use self::faer::FaerSvd;

#[cfg(feature = "lapack")]
pub mod lapack;
#[cfg(feature = "lapack")]
pub use self::lapack::LapackSvd;

/// A routine computing the thin SVD of a dense matrix.
pub trait SvdBackend: Send + Sync {
    fn decompose(&self, matrix: ArrayView2<f64>) -> anyhow::Result<Decomposition>;
}

impl<B: SvdBackend + ?Sized> SvdBackend for &B {
    fn decompose(&self, matrix: ArrayView2<f64>) -> anyhow::Result<Decomposition> {
        (**self).decompose(matrix)
    }
}

impl<B: SvdBackend + ?Sized> SvdBackend for Box<B> {
    fn decompose(&self, matrix: ArrayView2<f64>) -> anyhow::Result<Decomposition> {
        (**self).decompose(matrix)
    }
}

/// Thin SVD `Z = U · diag(σ) · Vᵗ` with `σ` in descending order.
///
/// `U` is `n × r`, `σ` has length `r` and `V` is `p × r`, where `r` is the
/// number of singular values the backend returned (at most `min(n, p)`).
#[derive(Debug, Clone)]
pub struct Decomposition {
    u: Array2<f64>,
    s: Array1<f64>,
    v: Array2<f64>,
}

impl Decomposition {
    /// Validates the factor shapes and reorders the triplets so the singular
    /// values descend. Equal values keep the order the backend produced.
    pub fn new(u: Array2<f64>, s: Array1<f64>, v: Array2<f64>) -> anyhow::Result<Self> {
        let r = s.len();
        ensure!(
            u.ncols() == r && v.ncols() == r,
            "factor shapes {:?} and {:?} do not match {} singular values",
            u.dim(),
            v.dim(),
            r
        );
        ensure!(
            r <= u.nrows().min(v.nrows()),
            "{} singular values exceed the rank bound of a {}x{} matrix",
            r,
            u.nrows(),
            v.nrows()
        );
        if let Some(bad) = s.iter().find(|value| !value.is_finite() || **value < 0.0) {
            bail!("backend returned invalid singular value {}", bad);
        }

        let mut order: Vec<usize> = (0..r).collect();
        order.sort_by(|&a, &b| s[b].partial_cmp(&s[a]).unwrap_or(Ordering::Equal));

        if order.iter().enumerate().all(|(i, &idx)| i == idx) {
            return Ok(Decomposition { u, s, v });
        }

        Ok(Decomposition {
            u: u.select(Axis(1), &order),
            s: s.select(Axis(0), &order),
            v: v.select(Axis(1), &order),
        })
    }

    pub fn u(&self) -> &Array2<f64> {
        &self.u
    }

    pub fn s(&self) -> &Array1<f64> {
        &self.s
    }

    pub fn v(&self) -> &Array2<f64> {
        &self.v
    }

    pub fn nrows(&self) -> usize {
        self.u.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.v.nrows()
    }

    /// Number of singular values returned.
    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    /// Largest singular value, zero for an empty spectrum.
    pub fn largest(&self) -> f64 {
        self.s.get(0).copied().unwrap_or(0.0)
    }

    /// `(σᵢ / σ₀)²` for every singular value, all zeros when `σ₀` is zero.
    ///
    /// Ratios of squared singular values are taken from these rather than
    /// from `σᵢ²`, which overflows or underflows at extreme magnitudes.
    pub fn relative_squares(&self) -> Array1<f64> {
        let largest = self.largest();
        if largest == 0.0 {
            return Array1::zeros(self.s.len());
        }
        self.s.mapv(|value| (value / largest).powi(2))
    }

    /// Cut-off below which a singular value counts as zero:
    /// `max(max(n, p) · ε · σ₀, noise_floor)`.
    ///
    /// `noise_floor` is an absolute bound on the rounding error already
    /// present in `Z`; pass zero when `Z` is the raw input.
    pub fn null_tolerance(&self, noise_floor: f64) -> f64 {
        let size = self.nrows().max(self.ncols()) as f64;
        (size * f64::EPSILON * self.largest()).max(noise_floor)
    }

    /// Count of singular values above [`Decomposition::null_tolerance`].
    pub fn numerical_rank(&self, noise_floor: f64) -> usize {
        let tolerance = self.null_tolerance(noise_floor);
        self.s.iter().take_while(|&&value| value > tolerance).count()
    }

    pub fn reconstruct(&self) -> Array2<f64> {
        let scaled = &self.u * &self.s;
        scaled.dot(&self.v.t())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_reorders_descending() {
        let u = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let s = array![1.0, 3.0, 2.0];
        let v = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let original = Array2::from_diag(&s);

        let decomposition = Decomposition::new(u, s, v).unwrap();
        assert_eq!(decomposition.s(), &array![3.0, 2.0, 1.0]);
        assert_relative_eq!(decomposition.u()[[1, 0]], 1.0);
        assert_relative_eq!(decomposition.v()[[2, 1]], 1.0);
        assert_eq!(decomposition.reconstruct(), original);
    }

    #[test]
    fn test_rejects_mismatched_shapes() {
        let u = Array2::<f64>::eye(3);
        let s = array![2.0, 1.0];
        let v = Array2::<f64>::eye(2);
        assert!(Decomposition::new(u, s, v).is_err());
    }

    #[test]
    fn test_rejects_negative_or_nan_singular_values() {
        let eye = Array2::<f64>::eye(2);
        assert!(Decomposition::new(eye.clone(), array![1.0, -1.0], eye.clone()).is_err());
        assert!(Decomposition::new(eye.clone(), array![f64::NAN, 1.0], eye).is_err());
    }

    #[test]
    fn test_rank_and_relative_squares() {
        let eye = Array2::<f64>::eye(3);
        let decomposition = Decomposition::new(eye.clone(), array![4.0, 2.0, 1e-18], eye).unwrap();

        let squares = decomposition.relative_squares();
        assert_relative_eq!(squares[0], 1.0);
        assert_relative_eq!(squares[1], 0.25);
        assert_eq!(decomposition.numerical_rank(0.0), 2);

        // An absolute noise floor above every value leaves nothing.
        assert_eq!(decomposition.numerical_rank(5.0), 0);
        assert_eq!(decomposition.numerical_rank(3.0), 1);
    }

    #[test]
    fn test_relative_squares_at_extreme_magnitudes() {
        let eye = Array2::<f64>::eye(2);
        let huge = Decomposition::new(eye.clone(), array![3e200, 1e200], eye.clone()).unwrap();
        let tiny = Decomposition::new(eye.clone(), array![3e-200, 1e-200], eye).unwrap();

        for decomposition in [huge, tiny] {
            let squares = decomposition.relative_squares();
            assert!(squares.iter().all(|v| v.is_finite()));
            assert_relative_eq!(squares[1], 1.0 / 9.0, epsilon = 1e-12);
            assert_eq!(decomposition.numerical_rank(0.0), 2);
        }
    }

    #[test]
    fn test_zero_spectrum() {
        let eye = Array2::<f64>::eye(2);
        let decomposition = Decomposition::new(eye.clone(), array![0.0, 0.0], eye).unwrap();
        assert_eq!(decomposition.numerical_rank(0.0), 0);
        assert_eq!(decomposition.largest(), 0.0);
        assert_eq!(decomposition.relative_squares(), array![0.0, 0.0]);
    }
}
