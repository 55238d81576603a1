use std::fmt;
use std::ops::{Index, IndexMut};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{MatrixError, Result};
use crate::interop::DenseMatrix;
use crate::math::view::MatrixView;
use crate::report::format_matrix;

/// Dense row-major `f64` matrix.
///
/// Element `(row, col)` lives at buffer offset `row * stride + col`. A freshly
/// allocated matrix has `stride == cols`; a matrix built from a wider buffer
/// with [`Matrix::from_strided_vec`] keeps the wider stride and skips the
/// padding on every read and write.
///
/// The buffer is an owned `Vec<f64>`, so clones are deep and moves hand the
/// allocation over without copying. `Default` is the empty 0x0 matrix, which
/// is what `std::mem::take` leaves behind.
///
/// ```
/// use redeem_matrix::Matrix;
///
/// let m = Matrix::from_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(m.shape(), (2, 3));
/// assert_eq!(m.at(1, 2).unwrap(), 6.0);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(into = "DenseMatrix", try_from = "DenseMatrix")]
pub struct Matrix {
    pub(super) rows: usize,
    pub(super) cols: usize,
    pub(super) stride: usize,
    pub(super) items: Vec<f64>,
}

/// Smallest buffer that can hold `rows` rows of `cols` values spaced `stride` apart.
pub(crate) fn required_len(rows: usize, cols: usize, stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (rows - 1) * stride + cols
    }
}

/// `rows * cols`, or `MalformedInput` when the product does not fit in `usize`.
pub(crate) fn element_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        MatrixError::MalformedInput(format!("{}x{} matrix has too many elements", rows, cols))
    })
}

fn checked_required_len(rows: usize, cols: usize, stride: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Ok(0);
    }
    (rows - 1)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(cols))
        .ok_or_else(|| {
            MatrixError::MalformedInput(format!(
                "{}x{} matrix with stride {} overflows the buffer length",
                rows, cols, stride
            ))
        })
}

impl Matrix {
    /// Allocates a zero-filled `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::zeros(rows, cols)
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            stride: cols,
            items: vec![value; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.items[i * n + i] = 1.0;
        }
        m
    }

    /// Takes ownership of `items` as the backing buffer of a dense matrix.
    ///
    /// The buffer must hold at least `rows * cols` values; anything past that
    /// is dropped.
    pub fn from_vec(rows: usize, cols: usize, mut items: Vec<f64>) -> Result<Self> {
        let required = element_count(rows, cols)?;
        if items.len() < required {
            return Err(MatrixError::BufferTooSmall {
                required,
                actual: items.len(),
            });
        }
        items.truncate(required);
        Ok(Self {
            rows,
            cols,
            stride: cols,
            items,
        })
    }

    /// Takes ownership of a buffer in which consecutive rows start `stride`
    /// elements apart. The `stride - cols` slots after each row are padding and
    /// are never read.
    pub fn from_strided_vec(
        rows: usize,
        cols: usize,
        stride: usize,
        items: Vec<f64>,
    ) -> Result<Self> {
        if stride < cols {
            return Err(MatrixError::InvalidStride { stride, cols });
        }
        let required = checked_required_len(rows, cols, stride)?;
        if items.len() < required {
            return Err(MatrixError::BufferTooSmall {
                required,
                actual: items.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            stride,
            items,
        })
    }

    /// Copies the first `rows * cols` values of `values` in row-major order.
    pub fn from_slice(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        let required = element_count(rows, cols)?;
        if values.len() < required {
            return Err(MatrixError::BufferTooSmall {
                required,
                actual: values.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            stride: cols,
            items: values[..required].to_vec(),
        })
    }

    /// Builds a matrix from nested rows, e.g. `&[[1.0, 2.0], [3.0, 4.0]]`.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut items = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(MatrixError::ShapeMismatch {
                    op: "from_rows",
                    left: (1, cols),
                    right: (1, row.len()),
                });
            }
            items.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            stride: cols,
            items,
        })
    }

    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut items = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                items.push(f(r, c));
            }
        }
        Self {
            rows,
            cols,
            stride: cols,
            items,
        }
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Buffer slots between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of logical elements, padding excluded.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when rows are packed back to back with no padding.
    pub fn is_dense(&self) -> bool {
        self.stride == self.cols
    }

    #[inline]
    pub(super) fn offset(&self, row: usize, col: usize) -> usize {
        row * self.stride + col
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    pub fn at(&self, row: usize, col: usize) -> Result<f64> {
        self.check_index(row, col)?;
        Ok(self.items[self.offset(row, col)])
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.at(row, col).ok()
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        let offset = self.offset(row, col);
        self.items[offset] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<&[f64]> {
        if row >= self.rows {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.row_slice(row))
    }

    /// Logical values of `row`. Panics if `row` is out of range.
    pub fn row_slice(&self, row: usize) -> &[f64] {
        assert!(row < self.rows, "row index out of bounds");
        if self.cols == 0 {
            return &self.items[..0];
        }
        let start = self.offset(row, 0);
        &self.items[start..start + self.cols]
    }

    pub(super) fn row_slice_mut(&mut self, row: usize) -> &mut [f64] {
        assert!(row < self.rows, "row index out of bounds");
        if self.cols == 0 {
            return &mut self.items[..0];
        }
        let start = self.offset(row, 0);
        let cols = self.cols;
        &mut self.items[start..start + cols]
    }

    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |r| self.row_slice(r))
    }

    /// Logical values in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.row_iter().flatten()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }

    /// Consumes the matrix and returns its values densely packed.
    pub fn into_vec(mut self) -> Vec<f64> {
        self.compact();
        self.items
    }

    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView::new(
            self.rows,
            self.cols,
            self.stride,
            &self.items[..required_len(self.rows, self.cols, self.stride)],
        )
    }

    /// Borrowed window over rows `start_row..=end_row` and columns
    /// `start_col..=end_col`, sharing this matrix's buffer and stride.
    pub fn view(
        &self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<MatrixView<'_>> {
        self.as_view().view(start_row, start_col, end_row, end_col)
    }

    /// Dense copy of rows `start_row..=end_row` and columns
    /// `start_col..=end_col`. The result has `stride == cols`.
    pub fn sub_matrix(
        &self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<Matrix> {
        let view = self.view(start_row, start_col, end_row, end_col)?;
        Ok(view.to_matrix())
    }

    /// Dense copy of rows `start_row..=end_row`, keeping the first `num_cols`
    /// columns.
    pub fn row_block(&self, start_row: usize, end_row: usize, num_cols: usize) -> Result<Matrix> {
        let view = self.as_view().row_block(start_row, end_row, num_cols)?;
        Ok(view.to_matrix())
    }

    /// Densely packed copy of this matrix.
    pub fn to_dense(&self) -> Matrix {
        self.as_view().to_matrix()
    }

    /// Packs the rows in place so that `stride == cols`, releasing the padding.
    pub fn compact(&mut self) {
        if self.is_dense() {
            return;
        }
        if self.rows == 0 || self.cols == 0 {
            self.items.clear();
            self.stride = self.cols;
            return;
        }
        debug!(
            "compacting {}x{} matrix from stride {}",
            self.rows, self.cols, self.stride
        );
        for r in 1..self.rows {
            let src = r * self.stride;
            self.items.copy_within(src..src + self.cols, r * self.cols);
        }
        self.items.truncate(self.rows * self.cols);
        self.items.shrink_to_fit();
        self.stride = self.cols;
    }

    pub fn mapv<F>(&self, mut f: F) -> Matrix
    where
        F: FnMut(f64) -> f64,
    {
        let items = self.iter().map(|v| f(*v)).collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            stride: self.cols,
            items,
        }
    }

    /// Applies `f` to every logical element in row-major order.
    pub fn mapv_inplace<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(f64) -> f64,
    {
        for r in 0..self.rows {
            for v in self.row_slice_mut(r) {
                *v = f(*v);
            }
        }
        self
    }

    pub fn fill(&mut self, value: f64) -> &mut Self {
        self.mapv_inplace(|_| value)
    }
}

/// Equality is logical: shapes and values are compared, stride and padding are not.
impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.iter().eq(other.iter())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (row, col) = index;
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.items[self.offset(row, col)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (row, col) = index;
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        let offset = self.offset(row, col);
        &mut self.items[offset]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_matrix(self, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded() -> Matrix {
        // 2x2 logical values in a stride-3 buffer; -1.0 marks padding.
        Matrix::from_strided_vec(2, 2, 3, vec![1.0, 2.0, -1.0, 3.0, 4.0]).unwrap()
    }

    #[test]
    fn test_required_len() {
        assert_eq!(required_len(0, 4, 4), 0);
        assert_eq!(required_len(3, 0, 2), 0);
        assert_eq!(required_len(2, 2, 3), 5);
    }

    #[test]
    fn test_compact_drops_padding() {
        let mut m = padded();
        assert!(!m.is_dense());
        m.compact();
        assert!(m.is_dense());
        assert_eq!(m.items, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.stride(), 2);
    }

    #[test]
    fn test_compact_empty_strided() {
        let mut m = Matrix::from_strided_vec(2, 0, 3, vec![]).unwrap();
        assert!(!m.is_dense());
        m.compact();
        assert!(m.is_dense());
        assert_eq!(m.shape(), (2, 0));
        assert!(m.items.is_empty());

        let m = Matrix::from_strided_vec(0, 2, 5, vec![7.0; 4]).unwrap();
        assert!(m.into_vec().is_empty());
    }

    #[test]
    fn test_overflowing_shape_is_rejected() {
        let huge = 1usize << (usize::BITS - 1);
        assert!(matches!(
            Matrix::from_vec(huge, 2, vec![]),
            Err(MatrixError::MalformedInput(_))
        ));
        assert!(matches!(
            Matrix::from_slice(2, huge, &[]),
            Err(MatrixError::MalformedInput(_))
        ));
        assert!(matches!(
            Matrix::from_strided_vec(3, 2, huge, vec![]),
            Err(MatrixError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_clone_keeps_stride() {
        let m = padded();
        let copy = m.clone();
        assert_eq!(copy.stride(), 3);
        assert_eq!(copy.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_mapv_inplace_skips_padding() {
        let mut m = padded();
        m.mapv_inplace(|v| v * 10.0);
        assert_eq!(m.items[2], -1.0);
        assert_eq!(m.to_vec(), vec![10.0, 20.0, 30.0, 40.0]);
    }
}
