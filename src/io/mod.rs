//! Text readers for whitespace-separated matrix files.
pub mod text;

pub use text::{read_matrix, read_matrix_file, read_matrix_with_shape};
