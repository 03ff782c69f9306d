use std::fmt::{Debug, Display};

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use num_traits::{Float, FromPrimitive, ToPrimitive};

/// Float types the centering transforms can operate on.
pub trait FloatOps:
    Float + FromPrimitive + ToPrimitive + Debug + Display + Send + Sync + 'static
{
}

impl FloatOps for f32 {}
impl FloatOps for f64 {}

/// Which margin of a matrix a reduction runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One value per row.
    Row,
    /// One value per column.
    Column,
}

impl Direction {
    fn reduced_axis(self) -> Axis {
        match self {
            Direction::Row => Axis(1),
            Direction::Column => Axis(0),
        }
    }
}

/// Means of every row or every column of `x`.
///
/// An empty margin yields zeros instead of failing.
pub fn margin_means<T: FloatOps>(x: ArrayView2<T>, direction: Direction) -> Array1<T> {
    let axis = direction.reduced_axis();
    x.mean_axis(axis)
        .unwrap_or_else(|| Array1::zeros(x.len_of(Axis(1 - axis.index()))))
}

/// Euclidean norm of `values`, zero for an empty view. Entries are scaled by
/// the largest magnitude before squaring so extreme values stay finite.
pub(crate) fn stable_norm(values: ArrayView1<f64>) -> f64 {
    let largest = values.fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if largest == 0.0 {
        return 0.0;
    }
    let scaled: f64 = values.iter().map(|v| (v / largest).powi(2)).sum();
    largest * scaled.sqrt()
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_margin_means() {
        let x = array![[1.0, 2.0, 3.0], [3.0, 6.0, 9.0]];

        let rows = margin_means(x.view(), Direction::Row);
        assert_eq!(rows.len(), 2);
        assert_relative_eq!(rows[0], 2.0);
        assert_relative_eq!(rows[1], 6.0);

        let cols = margin_means(x.view(), Direction::Column);
        assert_eq!(cols.len(), 3);
        assert_relative_eq!(cols[0], 2.0);
        assert_relative_eq!(cols[1], 4.0);
        assert_relative_eq!(cols[2], 6.0);
    }

    #[test]
    fn test_margin_means_f32() {
        let x = array![[1.0f32, 3.0], [5.0, 7.0]];
        let cols = margin_means(x.view(), Direction::Column);
        assert_relative_eq!(cols[0], 3.0f32);
        assert_relative_eq!(cols[1], 5.0f32);
    }

    #[test]
    fn test_stable_norm() {
        assert_relative_eq!(stable_norm(array![3.0, -4.0].view()), 5.0);
        assert_relative_eq!(stable_norm(array![3e200, 4e200].view()), 5e200, max_relative = 1e-12);
        assert_relative_eq!(stable_norm(array![3e-200, -4e-200].view()), 5e-200, max_relative = 1e-12);
        assert_eq!(stable_norm(array![0.0, 0.0].view()), 0.0);
    }
}
