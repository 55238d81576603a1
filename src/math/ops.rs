//! Elementwise arithmetic and the matrix product.
//!
//! The `checked_*` methods and `matmul` are the fallible API. The operator
//! impls on references panic on a shape mismatch and are meant for code that
//! has already established the shapes agree.
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use log::trace;

use crate::error::{MatrixError, Result};
use crate::math::matrix::Matrix;

impl Matrix {
    fn ensure_same_shape(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    /// Dense result of `f` applied pairwise. Shapes must already agree.
    fn zip_map<F>(&self, other: &Matrix, f: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut items = Vec::with_capacity(self.len());
        for (lhs, rhs) in self.row_iter().zip(other.row_iter()) {
            items.extend(lhs.iter().zip(rhs).map(|(a, b)| f(*a, *b)));
        }
        Matrix {
            rows: self.rows,
            cols: self.cols,
            stride: self.cols,
            items,
        }
    }

    fn zip_apply<F>(&mut self, other: &Matrix, f: F)
    where
        F: Fn(f64, f64) -> f64,
    {
        for r in 0..self.rows {
            let rhs = other.row_slice(r);
            for (a, b) in self.row_slice_mut(r).iter_mut().zip(rhs) {
                *a = f(*a, *b);
            }
        }
    }

    /// Elementwise sum as a new matrix; `self` is left untouched.
    pub fn checked_add(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_same_shape(other, "add")?;
        Ok(self.zip_map(other, |a, b| a + b))
    }

    /// Elementwise difference as a new matrix; `self` is left untouched.
    pub fn checked_sub(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_same_shape(other, "sub")?;
        Ok(self.zip_map(other, |a, b| a - b))
    }

    /// Adds `other` into `self` and returns `self` for chaining.
    ///
    /// ```
    /// use redeem_matrix::Matrix;
    ///
    /// let mut a = Matrix::filled(2, 2, 1.0);
    /// let b = Matrix::identity(2);
    /// a.add_in_place(&b)?.sub_in_place(&b)?;
    /// assert_eq!(a, Matrix::filled(2, 2, 1.0));
    /// # Ok::<(), redeem_matrix::MatrixError>(())
    /// ```
    pub fn add_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.ensure_same_shape(other, "add")?;
        self.zip_apply(other, |a, b| a + b);
        Ok(self)
    }

    pub fn sub_in_place(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.ensure_same_shape(other, "sub")?;
        self.zip_apply(other, |a, b| a - b);
        Ok(self)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.mapv(|v| v * factor)
    }

    pub fn scale_in_place(&mut self, factor: f64) -> &mut Self {
        self.mapv_inplace(|v| v * factor)
    }

    /// Matrix product of an `m x n` receiver and an `n x p` argument.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(MatrixError::ShapeMismatch {
                op: "matmul",
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(self.matmul_unchecked(other))
    }

    fn matmul_unchecked(&self, other: &Matrix) -> Matrix {
        let (m, p) = (self.rows, other.cols);
        trace!("matmul {}x{} by {}x{}", m, self.cols, other.rows, p);
        let mut out = Matrix::zeros(m, p);
        for i in 0..m {
            let lhs = self.row_slice(i);
            for j in 0..p {
                let mut acc = 0.0;
                for (k, a) in lhs.iter().enumerate() {
                    acc += a * other.items[other.offset(k, j)];
                }
                out.items[i * p + j] = acc;
            }
        }
        out
    }

    /// Dense `cols x rows` transpose.
    pub fn transpose(&self) -> Matrix {
        Matrix::from_fn(self.cols, self.rows, |r, c| self.items[self.offset(c, r)])
    }
}

impl<'a, 'b> Add<&'b Matrix> for &'a Matrix {
    type Output = Matrix;

    fn add(self, rhs: &'b Matrix) -> Self::Output {
        assert_eq!(
            self.shape(),
            rhs.shape(),
            "Elementwise addition requires matrices of equal shape"
        );
        self.zip_map(rhs, |a, b| a + b)
    }
}

impl<'a, 'b> Sub<&'b Matrix> for &'a Matrix {
    type Output = Matrix;

    fn sub(self, rhs: &'b Matrix) -> Self::Output {
        assert_eq!(
            self.shape(),
            rhs.shape(),
            "Elementwise subtraction requires matrices of equal shape"
        );
        self.zip_map(rhs, |a, b| a - b)
    }
}

impl<'a, 'b> Mul<&'b Matrix> for &'a Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &'b Matrix) -> Self::Output {
        assert_eq!(
            self.ncols(),
            rhs.nrows(),
            "Matrix product requires lhs columns to equal rhs rows"
        );
        self.matmul_unchecked(rhs)
    }
}

impl<'a> Mul<f64> for &'a Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl<'b> AddAssign<&'b Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &'b Matrix) {
        assert_eq!(
            self.shape(),
            rhs.shape(),
            "Elementwise addition requires matrices of equal shape"
        );
        self.zip_apply(rhs, |a, b| a + b);
    }
}

impl<'b> SubAssign<&'b Matrix> for Matrix {
    fn sub_assign(&mut self, rhs: &'b Matrix) {
        assert_eq!(
            self.shape(),
            rhs.shape(),
            "Elementwise subtraction requires matrices of equal shape"
        );
        self.zip_apply(rhs, |a, b| a - b);
    }
}
