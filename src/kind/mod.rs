//! # Biplot kinds
//!
//! Each kind fixes the preprocessing transform, the shape parameter α that
//! splits singular values between the two factor matrices, and the rule for
//! the normalization constant κ applied to the column factors.
//!
//! | kind    | transform   | α   | κ        |
//! |---------|-------------|-----|----------|
//! | `form`  | `center`    | 1.0 | √(n−1)   |
//! | `cov`   | `center`    | 0.0 | 1        |
//! | `rform` | `logcenter` | 1.0 | 1        |
//! | `rcov`  | `logcenter` | 0.0 | √p       |

use std::fmt;
use std::str::FromStr;

use crate::preprocess::Transform;
use crate::BiplotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiplotKind {
    /// Row-metric preserving biplot, sample distances are approximated.
    Form,
    /// Column-metric preserving biplot, variable covariances are approximated.
    Cov,
    /// Log-ratio variant of [`BiplotKind::Form`] for compositional data.
    RForm,
    /// Log-ratio variant of [`BiplotKind::Cov`] for compositional data.
    RCov,
}

/// How κ is derived from the shape of the input matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KappaRule {
    /// `√(n − 1)` with `n` the number of rows.
    SqrtRowsMinusOne,
    /// `√p` with `p` the number of columns.
    SqrtCols,
    /// A constant, independent of the shape.
    Fixed(f64),
}

impl KappaRule {
    pub fn evaluate(&self, rows: usize, cols: usize) -> f64 {
        match self {
            KappaRule::SqrtRowsMinusOne => (rows.saturating_sub(1) as f64).sqrt(),
            KappaRule::SqrtCols => (cols as f64).sqrt(),
            KappaRule::Fixed(kappa) => *kappa,
        }
    }
}

/// The `(transform, α, κ-rule)` triple a kind stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindParameters {
    pub transform: Transform,
    pub alpha: f64,
    pub kappa: KappaRule,
}

const FORM: KindParameters = KindParameters {
    transform: Transform::Center,
    alpha: 1.0,
    kappa: KappaRule::SqrtRowsMinusOne,
};

const COV: KindParameters = KindParameters {
    transform: Transform::Center,
    alpha: 0.0,
    kappa: KappaRule::Fixed(1.0),
};

const RFORM: KindParameters = KindParameters {
    transform: Transform::LogCenter,
    alpha: 1.0,
    kappa: KappaRule::Fixed(1.0),
};

const RCOV: KindParameters = KindParameters {
    transform: Transform::LogCenter,
    alpha: 0.0,
    kappa: KappaRule::SqrtCols,
};

impl BiplotKind {
    pub const ALL: [BiplotKind; 4] = [
        BiplotKind::Form,
        BiplotKind::Cov,
        BiplotKind::RForm,
        BiplotKind::RCov,
    ];

    pub fn resolve(&self) -> KindParameters {
        match self {
            BiplotKind::Form => FORM,
            BiplotKind::Cov => COV,
            BiplotKind::RForm => RFORM,
            BiplotKind::RCov => RCOV,
        }
    }

    pub fn transform(&self) -> Transform {
        self.resolve().transform
    }

    pub fn alpha(&self) -> f64 {
        self.resolve().alpha
    }

    pub fn kappa(&self, rows: usize, cols: usize) -> f64 {
        self.resolve().kappa.evaluate(rows, cols)
    }

    /// Whether the kind works on log-ratios and therefore needs strictly
    /// positive input.
    pub fn is_relative(&self) -> bool {
        self.transform() == Transform::LogCenter
    }

    pub fn name(&self) -> &'static str {
        match self {
            BiplotKind::Form => "form",
            BiplotKind::Cov => "cov",
            BiplotKind::RForm => "rform",
            BiplotKind::RCov => "rcov",
        }
    }
}

impl fmt::Display for BiplotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BiplotKind {
    type Err = BiplotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BiplotKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BiplotError::InvalidKind(s.to_string()))
    }
}
