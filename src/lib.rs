//! redeem-matrix: dense row-major `f64` matrices.
//!
//! The crate is built around one type, [`Matrix`], which owns a flat buffer
//! plus a row stride. The stride is what lets a matrix sit inside a wider
//! buffer and what lets [`MatrixView`] expose a rectangular window without
//! copying. Around it sit text readers (`io`), printing (`report`), print
//! options (`config`) and serde/ndarray conversions (`interop`).
//!
//! Fallible operations return [`MatrixError`]; shape and index problems are
//! reported instead of reading outside the buffer.
pub mod config;
pub mod error;
pub mod interop;
pub mod io;
pub mod math;
pub mod report;

pub use error::{MatrixError, Result};
pub use math::{Matrix, MatrixView};
