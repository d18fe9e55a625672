//! Structural self-checks for partitions and decomposition results.

use crate::dist_error::DistError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), DistError>;
}

/// Turn a failed condition into [`DistError::PartitionInvariant`].
///
/// The message closure only runs on failure.
#[inline]
pub fn ensure<F>(cond: bool, msg: F) -> Result<(), DistError>
where
    F: FnOnce() -> String,
{
    if cond {
        Ok(())
    } else {
        Err(DistError::PartitionInvariant(msg()))
    }
}

/// Panic with `$what` and the first violation if `$value` fails
/// [`DebugInvariants::validate_invariants`]. Expands to nothing unless
/// invariant checking is enabled (debug builds, `strict-invariants`,
/// `check-invariants`).
#[macro_export]
macro_rules! debug_invariants {
    ($value:expr, $what:literal) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(err) = $crate::debug_invariants::DebugInvariants::validate_invariants($value) {
            panic!("{} invariants broken: {err}", $what);
        }
    };
}
