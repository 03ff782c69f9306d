use anyhow::anyhow;
use log::trace;
use nalgebra::{DMatrix, SVD};
use ndarray::{Array1, Array2, ArrayView2};

use super::{Decomposition, SvdBackend};

/// Pure Rust SVD through `nalgebra`'s bidiagonalization and implicit QR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NalgebraSvd {
    epsilon: f64,
    max_iterations: usize,
}

impl NalgebraSvd {
    pub fn new() -> Self {
        NalgebraSvd {
            epsilon: f64::EPSILON,
            max_iterations: 0,
        }
    }

    /// Convergence threshold of the QR sweeps, must be positive.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Upper bound on QR iterations, `0` iterates until convergence.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

impl Default for NalgebraSvd {
    fn default() -> Self {
        Self::new()
    }
}

impl SvdBackend for NalgebraSvd {
    fn decompose(&self, x: ArrayView2<f64>) -> anyhow::Result<Decomposition> {
        if !(self.epsilon > 0.0) {
            return Err(anyhow!("epsilon must be positive, got {}", self.epsilon));
        }

        let (n, p) = x.dim();
        trace!("nalgebra svd on a {}x{} matrix", n, p);
        let matrix = DMatrix::from_fn(n, p, |i, j| x[[i, j]]);

        let svd = SVD::try_new(matrix, true, true, self.epsilon, self.max_iterations)
            .ok_or_else(|| {
                anyhow!(
                    "nalgebra SVD did not converge within {} iterations",
                    self.max_iterations
                )
            })?;

        let u = svd
            .u
            .as_ref()
            .ok_or_else(|| anyhow!("nalgebra SVD returned no left singular vectors"))?;
        let v_t = svd
            .v_t
            .as_ref()
            .ok_or_else(|| anyhow!("nalgebra SVD returned no right singular vectors"))?;

        let r = svd.singular_values.len();
        let u = Array2::from_shape_fn((n, r), |(i, k)| u[(i, k)]);
        let s = Array1::from_iter(svd.singular_values.iter().copied());
        let v = Array2::from_shape_fn((p, r), |(j, k)| v_t[(k, j)]);

        Decomposition::new(u, s, v)
    }
}
