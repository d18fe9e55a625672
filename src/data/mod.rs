//! Globally indexed input data.

pub mod matrix_data;

pub use matrix_data::{MatrixData, MatrixEntry};
