use thiserror::Error;

/// Errors raised by matrix construction, access and arithmetic.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Operands of an elementwise op or a product have incompatible shapes.
    #[error("shape mismatch in {op}: left is {}x{}, right is {}x{}", left.0, left.1, right.0, right.1)]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Text input could not be turned into the requested matrix.
    #[error("malformed matrix input: {0}")]
    MalformedInput(String),

    #[error("buffer of length {actual} is too small, {required} elements required")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("stride {stride} is smaller than column count {cols}")]
    InvalidStride { stride: usize, cols: usize },

    #[error("invalid sampling range [{min}, {max})")]
    InvalidRange { min: f64, max: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
