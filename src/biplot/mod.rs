//! # Biplot pipeline
//!
//! [`BiplotBuilder`] collects the kind and any overrides of its defaults,
//! [`Biplot::resolve`] turns them into a fully specified [`BiplotConfig`] once
//! the shape of the input is known, and [`Biplot::compute`] runs
//! `transform -> SVD -> factors` on a matrix.

use std::sync::Arc;

use log::debug;
use ndarray::ArrayView2;

use crate::factorize::{
    check_alpha, check_dimension, check_kappa, check_matrix, factorize_with, BiplotFactors,
    FactorizeOptions, VariancePolicy,
};
use crate::kind::BiplotKind;
use crate::preprocess::Transform;
use crate::svd::{NalgebraSvd, SvdBackend};
use crate::BiplotError;

/// Number of dimensions drawn when none is requested.
pub const DEFAULT_DIM: usize = 2;

/// Everything the engine needs, with no value left to a default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiplotConfig {
    pub transform: Transform,
    pub alpha: f64,
    pub kappa: f64,
    pub dim: usize,
    pub variance_policy: VariancePolicy,
}

pub struct BiplotBuilder<B: SvdBackend = NalgebraSvd> {
    kind: BiplotKind,
    dim: Option<usize>,
    alpha: Option<f64>,
    kappa: Option<f64>,
    variance_policy: VariancePolicy,
    backend: Arc<B>,
}

impl BiplotBuilder<NalgebraSvd> {
    pub fn new(kind: BiplotKind) -> Self {
        BiplotBuilder {
            kind,
            dim: None,
            alpha: None,
            kappa: None,
            variance_policy: VariancePolicy::default(),
            backend: Arc::new(NalgebraSvd::default()),
        }
    }
}

impl<B: SvdBackend> BiplotBuilder<B> {
    pub fn dim(mut self, dim: usize) -> Self {
        self.dim = Some(dim);
        self
    }

    /// Overrides the shape parameter of the kind.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Overrides the κ rule of the kind with a constant.
    pub fn kappa(mut self, kappa: f64) -> Self {
        self.kappa = Some(kappa);
        self
    }

    pub fn variance_policy(mut self, variance_policy: VariancePolicy) -> Self {
        self.variance_policy = variance_policy;
        self
    }

    pub fn backend<C: SvdBackend>(self, backend: C) -> BiplotBuilder<C> {
        BiplotBuilder {
            kind: self.kind,
            dim: self.dim,
            alpha: self.alpha,
            kappa: self.kappa,
            variance_policy: self.variance_policy,
            backend: Arc::new(backend),
        }
    }

    pub fn build(self) -> Biplot<B> {
        Biplot {
            kind: self.kind,
            dim: self.dim,
            alpha: self.alpha,
            kappa: self.kappa,
            variance_policy: self.variance_policy,
            backend: self.backend,
        }
    }
}

/// A configured biplot, reusable across matrices.
pub struct Biplot<B: SvdBackend = NalgebraSvd> {
    kind: BiplotKind,
    dim: Option<usize>,
    alpha: Option<f64>,
    kappa: Option<f64>,
    variance_policy: VariancePolicy,
    backend: Arc<B>,
}

impl<B: SvdBackend> Biplot<B> {
    pub fn kind(&self) -> BiplotKind {
        self.kind
    }

    /// Fills in the kind's defaults for a `rows x cols` input and validates
    /// the result.
    pub fn resolve(&self, rows: usize, cols: usize) -> Result<BiplotConfig, BiplotError> {
        let parameters = self.kind.resolve();
        let config = BiplotConfig {
            transform: parameters.transform,
            alpha: self.alpha.unwrap_or(parameters.alpha),
            kappa: self
                .kappa
                .unwrap_or_else(|| parameters.kappa.evaluate(rows, cols)),
            dim: self.dim.unwrap_or(DEFAULT_DIM),
            variance_policy: self.variance_policy,
        };

        check_dimension(config.dim)?;
        check_alpha(config.alpha)?;
        check_kappa(config.kappa)?;
        Ok(config)
    }

    pub fn compute(&self, x: ArrayView2<f64>) -> Result<BiplotFactors, BiplotError> {
        check_matrix(x)?;
        let (rows, cols) = x.dim();
        let config = self.resolve(rows, cols)?;
        debug!(
            "{} biplot of a {}x{} matrix: {:?}",
            self.kind, rows, cols, config
        );

        let z = config.transform.apply(x)?;
        let noise_floor = config.transform.noise_floor(x);

        factorize_with(
            z.view(),
            config.alpha,
            config.kappa,
            config.dim,
            self.backend.as_ref(),
            &FactorizeOptions {
                variance_policy: config.variance_policy,
                noise_floor,
            },
        )
    }
}
