//! Whitespace-separated matrix text reader.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::{debug, trace};

use crate::error::{MatrixError, Result};
use crate::math::matrix::element_count;
use crate::math::Matrix;

/// Upper bound on slots reserved before any value has been read.
const MAX_PREALLOC: usize = 1 << 16;

fn parse_token(token: &str, line_no: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| {
        MatrixError::MalformedInput(format!("invalid number '{}' on line {}", token, line_no))
    })
}

/// Read a matrix whose shape is given by the text itself.
///
/// Every non-blank line is one row. The first row fixes the column count and
/// every later row must match it.
pub fn read_matrix<R: BufRead>(reader: R) -> Result<Matrix> {
    let mut items = Vec::new();
    let mut cols: Option<usize> = None;
    let mut rows = 0;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let start = items.len();
        for token in line.split_whitespace() {
            items.push(parse_token(token, line_idx + 1)?);
        }
        let width = items.len() - start;
        if width == 0 {
            continue;
        }
        match cols {
            None => cols = Some(width),
            Some(expected) if expected != width => {
                return Err(MatrixError::MalformedInput(format!(
                    "line {} has {} values, expected {}",
                    line_idx + 1,
                    width,
                    expected
                )));
            }
            Some(_) => {}
        }
        rows += 1;
        trace!("parsed row {} with {} values", rows, width);
    }

    let cols =
        cols.ok_or_else(|| MatrixError::MalformedInput("input contains no rows".to_string()))?;
    debug!("read {}x{} matrix", rows, cols);
    Matrix::from_vec(rows, cols, items)
}

/// Read `rows * cols` values in row-major order, ignoring line structure.
///
/// Reading stops as soon as the matrix is full; trailing input is not consumed
/// past the line holding the last value.
pub fn read_matrix_with_shape<R: BufRead>(rows: usize, cols: usize, reader: R) -> Result<Matrix> {
    let required = element_count(rows, cols)?;
    let mut items = Vec::with_capacity(required.min(MAX_PREALLOC));

    if required > 0 {
        'lines: for (line_idx, line) in reader.lines().enumerate() {
            let line = line?;
            for token in line.split_whitespace() {
                items.push(parse_token(token, line_idx + 1)?);
                if items.len() == required {
                    break 'lines;
                }
            }
        }
    }

    if items.len() < required {
        return Err(MatrixError::MalformedInput(format!(
            "expected {} values for a {}x{} matrix, found {}",
            required,
            rows,
            cols,
            items.len()
        )));
    }
    debug!("read {}x{} matrix with known shape", rows, cols);
    Matrix::from_vec(rows, cols, items)
}

/// Open `path` and read it with [`read_matrix`].
pub fn read_matrix_file<P: AsRef<Path>>(path: P) -> Result<Matrix> {
    let file = File::open(path.as_ref())?;
    debug!("reading matrix from {}", path.as_ref().display());
    read_matrix(BufReader::new(file))
}

impl Matrix {
    /// Shape-inferred constructor, see [`read_matrix`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        read_matrix(reader)
    }

    /// Shape-known constructor, see [`read_matrix_with_shape`].
    pub fn from_reader_with_shape<R: BufRead>(
        rows: usize,
        cols: usize,
        reader: R,
    ) -> Result<Self> {
        read_matrix_with_shape(rows, cols, reader)
    }
}

impl FromStr for Matrix {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        read_matrix(s.as_bytes())
    }
}
