//! Integration tests for text input, printing, config and interop.

use std::io::Write;

use ndarray::{array, Array2, ShapeBuilder};
use redeem_matrix::config::{load_print_config, PrintConfig};
use redeem_matrix::interop::DenseMatrix;
use redeem_matrix::io::{read_matrix, read_matrix_file, read_matrix_with_shape};
use redeem_matrix::report::{format_matrix, format_matrix_with, write_matrix};
use redeem_matrix::{Matrix, MatrixError};

// ---------------------------------------------------------------------------
// Shape-inferred reader
// ---------------------------------------------------------------------------

#[test]
fn read_three_by_three() {
    let m = Matrix::from_reader("1 2 3\n4 5 6\n7 8 9\n".as_bytes()).unwrap();
    assert_eq!(m.shape(), (3, 3));
    assert_eq!(m.at(1, 2).unwrap(), 6.0);
}

#[test]
fn read_handles_mixed_whitespace_and_literals() {
    let m: Matrix = "  1.5\t-2e3   \n0.25  +4\n".parse().unwrap();
    assert_eq!(m.to_vec(), vec![1.5, -2000.0, 0.25, 4.0]);
}

#[test]
fn read_without_trailing_newline() {
    let m = read_matrix("1 2\n3 4".as_bytes()).unwrap();
    assert_eq!(m.shape(), (2, 2));
}

#[test]
fn read_empty_input_errors() {
    assert!(matches!(
        read_matrix("".as_bytes()),
        Err(MatrixError::MalformedInput(_))
    ));
    assert!(matches!(
        read_matrix("\n   \n".as_bytes()),
        Err(MatrixError::MalformedInput(_))
    ));
}

#[test]
fn read_non_numeric_token_errors() {
    let err = "1 2\n3 four\n".parse::<Matrix>().unwrap_err();
    match err {
        MatrixError::MalformedInput(msg) => assert!(msg.contains("four")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn read_ragged_rows_error() {
    assert!(matches!(
        read_matrix("1 2 3\n4 5\n".as_bytes()),
        Err(MatrixError::MalformedInput(_))
    ));
}

// ---------------------------------------------------------------------------
// Shape-known reader
// ---------------------------------------------------------------------------

#[test]
fn read_with_shape_ignores_line_breaks() {
    let m = Matrix::from_reader_with_shape(2, 3, "1 2\n3 4 5\n6\n".as_bytes()).unwrap();
    assert_eq!(m.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn read_with_shape_stops_when_full() {
    let m = read_matrix_with_shape(1, 2, "1 2 3\nnot a number\n".as_bytes()).unwrap();
    assert_eq!(m.to_vec(), vec![1.0, 2.0]);
}

#[test]
fn read_with_shape_too_few_tokens_errors() {
    let err = read_matrix_with_shape(2, 2, "1 2 3".as_bytes()).unwrap_err();
    match err {
        MatrixError::MalformedInput(msg) => assert!(msg.contains("found 3"), "{}", msg),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn read_with_shape_large_shape_reports_missing_values() {
    let err = read_matrix_with_shape(1 << 16, 1 << 15, "1 2".as_bytes()).unwrap_err();
    match err {
        MatrixError::MalformedInput(msg) => assert!(msg.contains("found 2"), "{}", msg),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn read_with_shape_overflowing_shape_errors() {
    let err = read_matrix_with_shape(usize::MAX, 2, "1 2".as_bytes()).unwrap_err();
    assert!(matches!(err, MatrixError::MalformedInput(_)));
}

#[test]
fn read_with_shape_bad_token_errors() {
    assert!(read_matrix_with_shape(1, 2, "1 nan?".as_bytes()).is_err());
}

#[test]
fn read_matrix_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "1 0").unwrap();
    writeln!(file, "0 1").unwrap();
    let m = read_matrix_file(file.path()).unwrap();
    assert_eq!(m, Matrix::identity(2));
}

#[test]
fn read_matrix_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_matrix_file(dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, MatrixError::Io(_)));
}

// ---------------------------------------------------------------------------
// Printing
// ---------------------------------------------------------------------------

#[test]
fn format_named_matrix() {
    let m = Matrix::from_rows(&[[1.0, 2.5], [-3.0, 4.0]]).unwrap();
    assert_eq!(format_matrix(&m, Some("A")), "A = [\n    1 2.5\n    -3 4\n]\n");
}

#[test]
fn format_unnamed_matrix_matches_display() {
    let m = Matrix::from_rows(&[[1.0, 2.0]]).unwrap();
    assert_eq!(format_matrix(&m, None), "[\n    1 2\n]\n");
    assert_eq!(m.to_string(), format_matrix(&m, None));
}

#[test]
fn format_with_precision_and_indent() {
    let m = Matrix::from_rows(&[[1.0, 2.0 / 3.0]]).unwrap();
    let config = PrintConfig::new(Some(2), 2);
    assert_eq!(format_matrix_with(&m, Some("x"), &config), "x = [\n  1.00 0.67\n]\n");
}

#[test]
fn format_strided_matrix_skips_padding() {
    let m = Matrix::from_strided_vec(2, 1, 3, vec![1.0, 9.0, 9.0, 2.0]).unwrap();
    assert_eq!(format_matrix(&m, None), "[\n    1\n    2\n]\n");
}

#[test]
fn printed_output_parses_back() {
    let m = Matrix::from_rows(&[[0.1, -2.0, 3.5], [4.0, 1e-9, 6.0]]).unwrap();
    let text = format_matrix(&m, None);
    let body: String = text
        .lines()
        .filter(|l| *l != "[" && *l != "]")
        .map(|l| format!("{}\n", l))
        .collect();
    assert_eq!(body.parse::<Matrix>().unwrap(), m);
}

#[test]
fn write_matrix_to_buffer() {
    let mut buf = Vec::new();
    write_matrix(&mut buf, &Matrix::identity(1), Some("I"), &PrintConfig::default()).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "I = [\n    1\n]\n");
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn print_config_defaults() {
    let config = PrintConfig::default();
    assert_eq!(config.precision, None);
    assert_eq!(config.indent, 4);
}

#[test]
fn load_print_config_fills_missing_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"precision": 3}}"#).unwrap();
    let config = load_print_config(file.path()).unwrap();
    assert_eq!(config, PrintConfig::new(Some(3), 4));
}

#[test]
fn load_print_config_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    let err = load_print_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

// ---------------------------------------------------------------------------
// Serde and ndarray
// ---------------------------------------------------------------------------

#[test]
fn serde_json_uses_dense_form() {
    let m = Matrix::from_strided_vec(2, 2, 3, vec![1.0, 2.0, 0.0, 3.0, 4.0]).unwrap();
    let json = serde_json::to_string(&m).unwrap();
    assert_eq!(json, r#"{"rows":2,"cols":2,"data":[1.0,2.0,3.0,4.0]}"#);
    let back: Matrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
    assert!(back.is_dense());
}

#[test]
fn serde_json_rejects_wrong_length() {
    let result: Result<Matrix, _> = serde_json::from_str(r#"{"rows":2,"cols":2,"data":[1.0]}"#);
    assert!(result.is_err());
}

#[test]
fn serde_json_rejects_overflowing_shape() {
    let result: Result<Matrix, _> =
        serde_json::from_str(r#"{"rows":9223372036854775808,"cols":2,"data":[]}"#);
    assert!(result.is_err());
}

#[test]
fn serde_json_empty_strided_matrix() {
    let m = Matrix::from_strided_vec(2, 0, 3, vec![]).unwrap();
    let json = serde_json::to_string(&m).unwrap();
    assert_eq!(json, r#"{"rows":2,"cols":0,"data":[]}"#);
    let back: Matrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back.shape(), (2, 0));
}

#[test]
fn dense_matrix_try_from() {
    let dense = DenseMatrix {
        rows: 1,
        cols: 2,
        data: vec![1.0, 2.0, 3.0],
    };
    assert!(Matrix::try_from(dense).is_err());
}

#[test]
fn ndarray_round_trip() {
    let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let m = Matrix::from(a.view());
    assert_eq!(m.at(1, 0).unwrap(), 4.0);
    let back: Array2<f64> = (&m).into();
    assert_eq!(back, a);
}

#[test]
fn ndarray_column_major_and_sliced_views() {
    let a = Array2::from_shape_vec((2, 3).f(), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]).unwrap();
    let m = Matrix::from(a.view());
    assert_eq!(m.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    let t = a.t();
    assert_eq!(Matrix::from(t), m.transpose());
}

#[test]
fn view_to_ndarray_shares_stride() {
    let m = Matrix::from_fn(3, 4, |r, c| (r * 4 + c) as f64);
    let v = m.view(1, 1, 2, 2).unwrap();
    let nd = v.to_ndarray().unwrap();
    assert_eq!(nd.shape(), &[2, 2]);
    assert_eq!(nd.strides(), &[4, 1]);
    assert_eq!(nd[[1, 1]], 10.0);
}
