//! Decomposition algorithms and the execution backends they run on.

pub mod components;
pub mod executor;
pub mod matrix_build;
pub mod sort;
pub mod vector_build;
pub mod wire;

pub use executor::{Executor, SerialExec};
#[cfg(feature = "rayon")]
pub use executor::RayonExec;
pub use matrix_build::{
    DecompositionConfig, LocalNonLocal, build_local_nonlocal, build_local_nonlocal_with,
};
pub use vector_build::build_local;
