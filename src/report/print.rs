use std::io::{self, Write};

use crate::config::PrintConfig;
use crate::math::Matrix;

/// Render `matrix` with the given options.
///
/// ```text
/// name = [
///     1 2 3
///     4 5 6
/// ]
/// ```
///
/// The first line is just `[` when `name` is `None`.
pub fn format_matrix_with(matrix: &Matrix, name: Option<&str>, config: &PrintConfig) -> String {
    let mut out = String::new();
    match name {
        Some(name) => {
            out.push_str(name);
            out.push_str(" = [\n");
        }
        None => out.push_str("[\n"),
    }
    let indent = " ".repeat(config.indent);
    for row in matrix.row_iter() {
        let values: Vec<String> = row.iter().map(|v| config.format_value(*v)).collect();
        out.push_str(&indent);
        out.push_str(&values.join(" "));
        out.push('\n');
    }
    out.push_str("]\n");
    out
}

pub fn format_matrix(matrix: &Matrix, name: Option<&str>) -> String {
    format_matrix_with(matrix, name, &PrintConfig::default())
}

pub fn write_matrix<W: Write>(
    writer: &mut W,
    matrix: &Matrix,
    name: Option<&str>,
    config: &PrintConfig,
) -> io::Result<()> {
    writer.write_all(format_matrix_with(matrix, name, config).as_bytes())
}

/// Print `matrix` to stdout with default options.
pub fn print_matrix(matrix: &Matrix, name: Option<&str>) {
    print!("{}", format_matrix(matrix, name));
}
