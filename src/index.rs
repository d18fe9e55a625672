//! Common bound aliases for index and value types.
//!
//! These traits have blanket impls, so any primitive integer automatically
//! qualifies as a local or global index. They only reduce duplication in
//! `where` clauses.

use bytemuck::Pod;
use num_traits::{AsPrimitive, NumCast, PrimInt};

use crate::dist_error::DistError;

/// Identifier of one cooperating process (part / rank).
pub type PartId = usize;

/// Canonical bound set for index storage.
///
/// - `PrimInt` for arithmetic and ordering
/// - `Pod` so index arrays can be handed to a transport as raw bytes
/// - `Hash` for compaction maps
pub trait IndexLike:
    PrimInt + Pod + std::hash::Hash + std::fmt::Debug + Default + Send + Sync + 'static
{
}
impl<T> IndexLike for T where
    T: PrimInt + Pod + std::hash::Hash + std::fmt::Debug + Default + Send + Sync + 'static
{
}

/// Index into one part's own numbering.
pub trait LocalIndex: IndexLike + AsPrimitive<usize> {}
impl<T> LocalIndex for T where T: IndexLike + AsPrimitive<usize> {}

/// Index into the global numbering shared by all parts.
pub trait GlobalIndex: IndexLike + AsPrimitive<usize> {}
impl<T> GlobalIndex for T where T: IndexLike + AsPrimitive<usize> {}

/// Minimal bound for stored matrix/vector values.
pub trait ValueLike: Copy + std::fmt::Debug + PartialEq + Send + Sync + 'static {}
impl<T> ValueLike for T where T: Copy + std::fmt::Debug + PartialEq + Send + Sync + 'static {}

/// Convert a `usize` count or position into index type `I`.
#[inline]
pub fn index_from_usize<I: IndexLike>(value: usize) -> Result<I, DistError> {
    <I as NumCast>::from(value).ok_or_else(|| DistError::IndexOverflow {
        value: value.to_string(),
        target: std::any::type_name::<I>(),
    })
}

/// Convert an index into a `usize`, rejecting negative values.
#[inline]
pub fn index_to_usize<I: IndexLike>(value: I) -> Result<usize, DistError> {
    value.to_usize().ok_or_else(|| DistError::IndexOverflow {
        value: format!("{value:?}"),
        target: "usize",
    })
}

/// Convert between index types, checking the range.
#[inline]
pub fn cast_index<I: IndexLike, J: IndexLike>(value: I) -> Result<J, DistError> {
    <J as NumCast>::from(value).ok_or_else(|| DistError::IndexOverflow {
        value: format!("{value:?}"),
        target: std::any::type_name::<J>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_conversions() {
        assert_eq!(index_from_usize::<i32>(7).unwrap(), 7);
        assert!(matches!(
            index_from_usize::<i8>(300),
            Err(DistError::IndexOverflow { .. })
        ));
        assert_eq!(index_to_usize(5i64).unwrap(), 5);
        assert!(index_to_usize(-1i32).is_err());
        assert_eq!(cast_index::<i64, i32>(42).unwrap(), 42);
        assert!(cast_index::<i64, i16>(1 << 20).is_err());
    }
}
