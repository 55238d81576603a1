//! The matrix type and its borrowed view.
//!
//! `Matrix` owns a flat row-major `Vec<f64>` together with a row stride, and
//! `MatrixView` is a zero-copy window that reads through that stride.
//! Arithmetic lives in `ops` and sampling in `random`; both add inherent
//! methods to `Matrix`.
pub mod matrix;
mod ops;
mod random;
pub mod view;

pub use matrix::Matrix;
pub use view::MatrixView;
