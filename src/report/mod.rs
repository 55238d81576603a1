//! Human-readable rendering of matrices.
pub mod print;

pub use print::{format_matrix, format_matrix_with, print_matrix, write_matrix};
