use faer_ext::*;
use log::trace;
use ndarray::{Array1, ArrayView2};

use super::{Decomposition, SvdBackend};

/// Thin SVD computed by `faer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerSvd;

impl SvdBackend for FaerSvd {
    fn decompose(&self, array: ArrayView2<f64>) -> anyhow::Result<Decomposition> {
        trace!("faer svd on a {}x{} matrix", array.nrows(), array.ncols());
        let faer_mat = array.into_faer();
        let svd = faer_mat.thin_svd();
        let u = svd.u().into_ndarray().to_owned();
        let s: Array1<f64> = Array1::from_iter(svd.s_diagonal().iter().cloned());
        let v = svd.v().into_ndarray().to_owned();

        Decomposition::new(u, s, v)
    }
}
