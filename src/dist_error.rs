//! DistError: unified error type for sparse-dist public APIs
//!
//! Every fallible partition, decomposition, and wire operation in the crate
//! reports through this enum.

use thiserror::Error;

use crate::index::PartId;

/// Unified error type for partitioning and decomposition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DistError {
    /// A global-index mapping named a part outside `[0, num_parts)`.
    #[error("invalid argument: part id {part} at global index {index} is outside [0, {num_parts})")]
    InvalidPartId {
        index: usize,
        part: PartId,
        num_parts: usize,
    },
    /// Malformed construction input other than a bad part id.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A global (or local) index is not covered by the partition.
    #[error("index {index} is outside the covered range [0, {size})")]
    OutOfRange { index: String, size: String },
    /// A count or index does not fit the requested index type.
    #[error("value {value} does not fit into index type `{target}`")]
    IndexOverflow { value: String, target: &'static str },
    /// Paired arrays or buffers have inconsistent lengths.
    #[error("length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// A structural invariant check failed.
    #[error("partition invariant violated: {0}")]
    PartitionInvariant(String),
    /// A byte buffer could not be decoded.
    #[error("wire decode error: {0}")]
    Wire(String),
}

impl DistError {
    pub(crate) fn out_of_range<I: std::fmt::Debug, S: std::fmt::Debug>(index: I, size: S) -> Self {
        DistError::OutOfRange {
            index: format!("{index:?}"),
            size: format!("{size:?}"),
        }
    }
}
