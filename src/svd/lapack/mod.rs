use std::sync::Arc;

use anyhow::anyhow;
use log::trace;
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView2};
use rayon::ThreadPool;

use super::{Decomposition, SvdBackend};

/// SVD through LAPACK's `gesdd` as wrapped by `nalgebra-lapack`.
///
/// The full `U` and `Vᵗ` LAPACK returns are cut down to the thin factors.
#[derive(Debug, Clone, Default)]
pub struct LapackSvd {
    thread_pool: Option<Arc<ThreadPool>>,
}

impl LapackSvd {
    pub fn new() -> Self {
        LapackSvd { thread_pool: None }
    }

    /// Runs the decomposition inside `thread_pool`, which bounds the threads a
    /// multithreaded BLAS picks up from rayon.
    pub fn with_thread_pool(thread_pool: Arc<ThreadPool>) -> Self {
        LapackSvd {
            thread_pool: Some(thread_pool),
        }
    }
}

impl SvdBackend for LapackSvd {
    fn decompose(&self, x: ArrayView2<f64>) -> anyhow::Result<Decomposition> {
        let (n, p) = x.dim();
        trace!("lapack svd on a {}x{} matrix", n, p);
        let matrix = DMatrix::from_fn(n, p, |i, j| x[[i, j]]);

        let svd = match &self.thread_pool {
            Some(pool) => pool.install(|| nalgebra_lapack::SVD::new(matrix)),
            None => nalgebra_lapack::SVD::new(matrix),
        }
        .ok_or_else(|| anyhow!("LAPACK SVD did not converge"))?;

        let r = svd.singular_values.len();
        let u = Array2::from_shape_fn((n, r), |(i, k)| svd.u[(i, k)]);
        let s = Array1::from_iter(svd.singular_values.iter().copied());
        let v = Array2::from_shape_fn((p, r), |(j, k)| svd.vt[(k, j)]);

        Decomposition::new(u, s, v)
    }
}
