//! Per-part views of distributed vectors and matrices.

pub mod matrix;
pub mod vector;

pub use matrix::DistMatrix;
pub use vector::DistVector;
