#![cfg_attr(docsrs, feature(doc_cfg))]
//! # sparse-dist
//!
//! sparse-dist partitions global index spaces among cooperating parts and
//! splits globally indexed sparse matrices and vectors into the per-part
//! blocks a distributed solver works on. No communication happens here: the
//! crate produces the index arrays (`gather_idxs`, `recv_sizes`) a transport
//! needs to exchange non-local column values.
//!
//! ## Features
//! - [`Partition`](partition::Partition): ranges of a global index space with
//!   O(1) hinted ownership lookup and local renumbering
//! - [`build_local`](algs::vector_build::build_local) for vector rows
//! - [`build_local_nonlocal`](algs::matrix_build::build_local_nonlocal) for
//!   local/non-local matrix blocks with compacted remote columns
//! - Pluggable executors (serial, Rayon) with identical output
//! - Little-endian wire helpers for index arrays
//!
//! ## Determinism
//!
//! The result of every decomposition depends only on its inputs. The Rayon
//! backend collects in input order and sorts stably, so it reproduces the
//! serial output exactly.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! sparse-dist = "0.1"
//! # Optional features:
//! # features = ["rayon", "strict-invariants"]
//! ```
//!
//! ```
//! use sparse_dist::prelude::*;
//!
//! let p = Partition::<i32, i64>::build_from_mapping(&[0, 0, 1, 1], 2)?;
//! let mut a = MatrixData::<f64, i64>::new((4, 4));
//! a.push(0, 0, 1.0);
//! a.push(1, 3, 2.0);
//! a.push(2, 2, 3.0);
//! let d = build_local_nonlocal(&SerialExec, &a.entries, &p, &p, 0)?;
//! assert_eq!(d.local_values, vec![1.0]);
//! assert_eq!(d.local_to_global_col, vec![3]);
//! assert_eq!(d.recv_sizes, vec![0, 1]);
//! assert_eq!(d.gather_idxs, vec![1]);
//! # Ok::<(), DistError>(())
//! ```

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod dist;
pub mod dist_error;
pub mod index;
pub mod partition;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    #[cfg(feature = "rayon")]
    pub use crate::algs::executor::RayonExec;
    pub use crate::algs::executor::{Executor, SerialExec};
    pub use crate::algs::matrix_build::{
        DecompositionConfig, LocalNonLocal, build_local_nonlocal, build_local_nonlocal_with,
    };
    pub use crate::algs::vector_build::build_local;
    pub use crate::data::matrix_data::{MatrixData, MatrixEntry};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::dist::{DistMatrix, DistVector};
    pub use crate::dist_error::DistError;
    pub use crate::index::{GlobalIndex, LocalIndex, PartId};
    pub use crate::partition::{Partition, RangeLocator, SharedPartition};
}
