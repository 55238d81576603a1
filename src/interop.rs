//! Conversions to and from serde and ndarray representations.
//!
//! Matrices serialize densely as `{"rows": r, "cols": c, "data": [...]}`; the
//! stride of the source is not part of the wire form.
use ndarray::{Array2, ArrayView2, ShapeBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{MatrixError, Result};
use crate::math::matrix::element_count;
use crate::math::{Matrix, MatrixView};

/// Dense row-major wire form of a [`Matrix`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl From<Matrix> for DenseMatrix {
    fn from(value: Matrix) -> Self {
        let (rows, cols) = value.shape();
        Self {
            rows,
            cols,
            data: value.into_vec(),
        }
    }
}

impl TryFrom<DenseMatrix> for Matrix {
    type Error = MatrixError;

    fn try_from(value: DenseMatrix) -> Result<Self> {
        let expected = element_count(value.rows, value.cols)?;
        if value.data.len() != expected {
            return Err(MatrixError::MalformedInput(format!(
                "{}x{} matrix needs {} values, found {}",
                value.rows,
                value.cols,
                expected,
                value.data.len()
            )));
        }
        Matrix::from_vec(value.rows, value.cols, value.data)
    }
}

impl From<&Matrix> for Array2<f64> {
    fn from(value: &Matrix) -> Self {
        Array2::from_shape_fn(value.shape(), |(r, c)| value[(r, c)])
    }
}

/// Copies any ndarray view, whatever its memory order or strides.
impl From<ArrayView2<'_, f64>> for Matrix {
    fn from(value: ArrayView2<'_, f64>) -> Self {
        let (rows, cols) = value.dim();
        Matrix::from_fn(rows, cols, |r, c| value[[r, c]])
    }
}

impl<'a> MatrixView<'a> {
    /// Zero-copy ndarray view with the same row stride.
    pub fn to_ndarray(&self) -> Result<ArrayView2<'a, f64>> {
        let shape = (self.nrows(), self.ncols()).strides((self.stride(), 1));
        ArrayView2::from_shape(shape, self.buffer())
            .map_err(|e| MatrixError::MalformedInput(e.to_string()))
    }
}
