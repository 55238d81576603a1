use std::ops::{Index, Range};

use crate::error::{MatrixError, Result};
use crate::math::matrix::{required_len, Matrix};

/// Borrowed rectangular window onto a matrix buffer.
///
/// A view reads through its parent's stride, so taking one never copies.
/// Call [`MatrixView::to_matrix`] to get an owned, densely packed copy.
#[derive(Clone, Copy, Debug)]
pub struct MatrixView<'a> {
    rows: usize,
    cols: usize,
    stride: usize,
    items: &'a [f64],
}

impl<'a> MatrixView<'a> {
    /// `items` starts at the view's (0, 0) element and must cover
    /// `required_len(rows, cols, stride)` slots.
    pub(super) fn new(rows: usize, cols: usize, stride: usize, items: &'a [f64]) -> Self {
        debug_assert!(items.len() >= required_len(rows, cols, stride));
        Self {
            rows,
            cols,
            stride,
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

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Backing slice starting at the view's first element, padding included.
    pub(crate) fn buffer(&self) -> &'a [f64] {
        self.items
    }

    pub fn at(&self, row: usize, col: usize) -> Result<f64> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.items[row * self.stride + col])
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.at(row, col).ok()
    }

    pub fn row(&self, row: usize) -> Result<&'a [f64]> {
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

    pub fn row_slice(&self, row: usize) -> &'a [f64] {
        assert!(row < self.rows, "row index out of bounds");
        if self.cols == 0 {
            return &self.items[..0];
        }
        let start = row * self.stride;
        &self.items[start..start + self.cols]
    }

    pub fn row_iter(&self) -> impl Iterator<Item = &'a [f64]> + '_ {
        (0..self.rows).map(move |r| self.row_slice(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a f64> + '_ {
        self.row_iter().flatten()
    }

    /// Nested view with inclusive bounds relative to this view.
    pub fn view(
        &self,
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    ) -> Result<MatrixView<'a>> {
        let out_of_range = |row, col| MatrixError::IndexOutOfRange {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        };
        if end_row >= self.rows || end_col >= self.cols {
            return Err(out_of_range(end_row, end_col));
        }
        if start_row > end_row || start_col > end_col {
            return Err(out_of_range(start_row, start_col));
        }
        Ok(self.region(start_row..end_row + 1, start_col..end_col + 1))
    }

    /// Rows `start_row..=end_row` truncated to the first `num_cols` columns.
    pub fn row_block(
        &self,
        start_row: usize,
        end_row: usize,
        num_cols: usize,
    ) -> Result<MatrixView<'a>> {
        if end_row >= self.rows || num_cols > self.cols {
            return Err(MatrixError::IndexOutOfRange {
                row: end_row,
                col: num_cols.saturating_sub(1),
                rows: self.rows,
                cols: self.cols,
            });
        }
        if start_row > end_row {
            return Err(MatrixError::IndexOutOfRange {
                row: start_row,
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.region(start_row..end_row + 1, 0..num_cols))
    }

    /// Already-validated half-open region.
    fn region(&self, rows: Range<usize>, cols: Range<usize>) -> MatrixView<'a> {
        let height = rows.len();
        let width = cols.len();
        let len = required_len(height, width, self.stride);
        let items = if len == 0 {
            &self.items[..0]
        } else {
            let start = rows.start * self.stride + cols.start;
            &self.items[start..start + len]
        };
        MatrixView::new(height, width, self.stride, items)
    }

    /// Owned copy with `stride == cols`.
    ///
    /// Cell `(i, j)` of the result is read from `(i, j)` of this view, which is
    /// the parent's `(start_row + i, start_col + j)`.
    pub fn to_matrix(&self) -> Matrix {
        let mut items = Vec::with_capacity(self.rows * self.cols);
        for i in 0..self.rows {
            items.extend_from_slice(self.row_slice(i));
        }
        Matrix {
            rows: self.rows,
            cols: self.cols,
            stride: self.cols,
            items,
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().copied().collect()
    }
}

impl Index<(usize, usize)> for MatrixView<'_> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (row, col) = index;
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} view",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.items[row * self.stride + col]
    }
}

impl PartialEq<Matrix> for MatrixView<'_> {
    fn eq(&self, other: &Matrix) -> bool {
        self.shape() == other.shape() && self.iter().eq(other.iter())
    }
}
