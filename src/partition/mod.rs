//! Partition of a global index space into contiguous ranges owned by parts.
//!
//! A [`Partition`] splits `[0, size)` into `num_ranges` disjoint half-open
//! ranges. Range `i` covers `range_bounds[i]..range_bounds[i + 1]`, belongs to
//! part `part_ids[i]`, and its first global index has local index
//! `range_starting_indices[i]` in that part's own numbering. A part may own
//! several non-adjacent ranges.
//!
//! Partitions are immutable once built. Share them between decomposition
//! calls as a [`SharedPartition`] and replace them wholesale on
//! repartitioning.

pub mod locator;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use itertools::Itertools;
use num_traits::AsPrimitive;
use serde::{Deserialize, Deserializer, Serialize};

use crate::debug_invariants::{DebugInvariants, ensure};
use crate::dist_error::DistError;
use crate::index::{GlobalIndex, LocalIndex, PartId, cast_index, index_from_usize, index_to_usize};

pub use locator::RangeLocator;

/// Reference-counted handle for a partition shared across a communication epoch.
pub type SharedPartition<L, G> = Arc<Partition<L, G>>;

/// Ownership of a global index space by `num_parts` parts.
///
/// Deserialization runs [`DebugInvariants::validate_invariants`] and rejects
/// inconsistent data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Partition<L, G> {
    num_parts: usize,
    num_empty_parts: usize,
    range_bounds: Vec<G>,
    part_ids: Vec<PartId>,
    range_starting_indices: Vec<L>,
    part_sizes: Vec<L>,
}

/// Serialized field layout of [`Partition`], unchecked.
#[derive(Deserialize)]
struct PartitionRepr<L, G> {
    num_parts: usize,
    num_empty_parts: usize,
    range_bounds: Vec<G>,
    part_ids: Vec<PartId>,
    range_starting_indices: Vec<L>,
    part_sizes: Vec<L>,
}

impl<'de, L, G> Deserialize<'de> for Partition<L, G>
where
    L: LocalIndex + Deserialize<'de>,
    G: GlobalIndex + AsPrimitive<L> + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = PartitionRepr::deserialize(deserializer)?;
        Self::from_repr(repr).map_err(serde::de::Error::custom)
    }
}

impl<L, G> Partition<L, G>
where
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
{
    /// Build a partition from a dense global-index → part mapping.
    ///
    /// Consecutive entries with the same part id are merged into one range.
    /// Starting indices count, per part, how many of its indices precede the
    /// range in increasing global order.
    ///
    /// # Errors
    /// [`DistError::InvalidPartId`] if an entry is outside `[0, num_parts)`.
    pub fn build_from_mapping(mapping: &[PartId], num_parts: usize) -> Result<Self, DistError> {
        let mut range_bounds = vec![G::zero()];
        let mut part_ids = Vec::new();
        let mut range_starting_indices = Vec::new();
        let mut part_sizes = vec![0usize; num_parts];

        for (i, &part) in mapping.iter().enumerate() {
            if part >= num_parts {
                return Err(DistError::InvalidPartId {
                    index: i,
                    part,
                    num_parts,
                });
            }
            if i == 0 || mapping[i - 1] != part {
                if i > 0 {
                    range_bounds.push(index_from_usize(i)?);
                }
                part_ids.push(part);
                range_starting_indices.push(index_from_usize(part_sizes[part])?);
            }
            part_sizes[part] += 1;
        }
        if !mapping.is_empty() {
            range_bounds.push(index_from_usize(mapping.len())?);
        }

        Self::from_ranges(num_parts, range_bounds, part_ids, range_starting_indices, &part_sizes)
    }

    /// Build a partition where part `i` owns `ranges[i]..ranges[i + 1]`.
    ///
    /// Empty parts are allowed; they contribute no range.
    ///
    /// # Errors
    /// [`DistError::InvalidArgument`] if `ranges` is empty, does not start at
    /// zero, or decreases.
    pub fn build_from_contiguous(ranges: &[G]) -> Result<Self, DistError> {
        let Some(&first) = ranges.first() else {
            return Err(DistError::InvalidArgument(
                "contiguous ranges need at least one bound".into(),
            ));
        };
        if first != G::zero() {
            return Err(DistError::InvalidArgument(format!(
                "contiguous ranges must start at 0, got {first:?}"
            )));
        }
        if let Some((i, (a, b))) = ranges
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (a, b))| b < a)
        {
            return Err(DistError::InvalidArgument(format!(
                "contiguous range {i} is decreasing: {a:?} > {b:?}"
            )));
        }

        let num_parts = ranges.len() - 1;
        let mut range_bounds = vec![G::zero()];
        let mut part_ids = Vec::new();
        let mut range_starting_indices = Vec::new();
        let mut part_sizes = vec![0usize; num_parts];
        for (part, (&begin, &end)) in ranges.iter().tuple_windows().enumerate() {
            let len = <G as AsPrimitive<usize>>::as_(end - begin);
            if len > 0 {
                range_bounds.push(end);
                part_ids.push(part);
                range_starting_indices.push(L::zero());
            }
            part_sizes[part] = len;
        }

        Self::from_ranges(num_parts, range_bounds, part_ids, range_starting_indices, &part_sizes)
    }

    /// Split `[0, global_size)` into `num_parts` contiguous blocks of nearly
    /// equal size; the first `global_size % num_parts` parts get one extra index.
    pub fn build_from_global_size_uniform(
        num_parts: usize,
        global_size: G,
    ) -> Result<Self, DistError> {
        let size = index_to_usize(global_size)?;
        if num_parts == 0 && size > 0 {
            return Err(DistError::InvalidArgument(format!(
                "cannot distribute {size} indices over zero parts"
            )));
        }
        let (base, rem) = if num_parts == 0 {
            (0, 0)
        } else {
            (size / num_parts, size % num_parts)
        };
        let mut ranges = Vec::with_capacity(num_parts + 1);
        ranges.push(G::zero());
        let mut acc = 0usize;
        for part in 0..num_parts {
            acc += base + usize::from(part < rem);
            ranges.push(index_from_usize(acc)?);
        }
        Self::build_from_contiguous(&ranges)
    }

    fn from_ranges(
        num_parts: usize,
        range_bounds: Vec<G>,
        part_ids: Vec<PartId>,
        range_starting_indices: Vec<L>,
        part_sizes: &[usize],
    ) -> Result<Self, DistError> {
        let num_empty_parts = part_sizes.iter().filter(|&&s| s == 0).count();
        let part_sizes = part_sizes
            .iter()
            .map(|&s| index_from_usize::<L>(s))
            .collect::<Result<Vec<_>, _>>()?;
        let partition = Self {
            num_parts,
            num_empty_parts,
            range_bounds,
            part_ids,
            range_starting_indices,
            part_sizes,
        };
        log::debug!(
            "partition: {:?} global indices in {} ranges over {} parts ({} empty)",
            partition.size(),
            partition.num_ranges(),
            num_parts,
            num_empty_parts
        );
        partition.debug_assert_invariants();
        Ok(partition)
    }

    fn from_repr(repr: PartitionRepr<L, G>) -> Result<Self, DistError> {
        let partition = Self {
            num_parts: repr.num_parts,
            num_empty_parts: repr.num_empty_parts,
            range_bounds: repr.range_bounds,
            part_ids: repr.part_ids,
            range_starting_indices: repr.range_starting_indices,
            part_sizes: repr.part_sizes,
        };
        partition.validate_invariants()?;
        Ok(partition)
    }

    /// Wrap into a reference-counted handle.
    pub fn into_shared(self) -> SharedPartition<L, G> {
        Arc::new(self)
    }

    /// Range boundaries, `num_ranges() + 1` entries.
    pub fn range_bounds(&self) -> &[G] {
        &self.range_bounds
    }

    /// Owning part of each range.
    pub fn part_ids(&self) -> &[PartId] {
        &self.part_ids
    }

    /// Local index of the first global index of each range.
    pub fn range_starting_indices(&self) -> &[L] {
        &self.range_starting_indices
    }

    pub fn num_ranges(&self) -> usize {
        self.part_ids.len()
    }

    pub fn num_parts(&self) -> usize {
        self.num_parts
    }

    /// Number of parts that own no index at all.
    pub fn num_empty_parts(&self) -> usize {
        self.num_empty_parts
    }

    /// Number of global indices covered.
    pub fn size(&self) -> G {
        self.range_bounds.last().copied().unwrap_or_else(G::zero)
    }

    /// Number of indices owned by each part.
    pub fn part_sizes(&self) -> &[L] {
        &self.part_sizes
    }

    /// Number of indices owned by `part`, or `None` for an unknown part.
    pub fn part_size(&self, part: PartId) -> Option<L> {
        self.part_sizes.get(part).copied()
    }

    /// True if every part owns at most one range.
    pub fn has_connected_parts(&self) -> bool {
        self.part_ids.iter().all_unique()
    }

    /// True if parts are connected and appear in increasing part-id order.
    pub fn has_ordered_parts(&self) -> bool {
        self.part_ids.iter().tuple_windows().all(|(a, b)| a < b)
    }

    /// Range id containing `global_index`.
    ///
    /// Returns `hint` in O(1) when it already contains the index, otherwise
    /// binary-searches the range bounds. Callers iterating row-major input
    /// should pass the previous result as the hint.
    ///
    /// `global_index` must lie in `[0, size())`; see [`Self::try_find_range`]
    /// for the checked form.
    #[inline]
    pub fn find_range(&self, global_index: G, hint: usize) -> usize {
        debug_assert!(
            global_index >= G::zero() && global_index < self.size(),
            "global index {global_index:?} outside [0, {:?})",
            self.size()
        );
        let bounds = &self.range_bounds;
        if hint + 1 < bounds.len() && bounds[hint] <= global_index && global_index < bounds[hint + 1]
        {
            return hint;
        }
        bounds[1..].partition_point(|&b| b <= global_index)
    }

    /// Checked [`Self::find_range`].
    ///
    /// # Errors
    /// [`DistError::OutOfRange`] if `global_index` is not covered.
    #[inline]
    pub fn try_find_range(&self, global_index: G, hint: usize) -> Result<usize, DistError> {
        if global_index < G::zero() || global_index >= self.size() {
            return Err(DistError::out_of_range(global_index, self.size()));
        }
        Ok(self.find_range(global_index, hint))
    }

    /// Local index of `global_index` inside the part owning `range_id`.
    ///
    /// `range_id` must be the range containing `global_index`.
    #[inline]
    pub fn map_to_local(&self, global_index: G, range_id: usize) -> L {
        let offset = <G as AsPrimitive<L>>::as_(global_index - self.range_bounds[range_id]);
        self.range_starting_indices[range_id] + offset
    }

    /// Part owning `global_index`.
    pub fn owning_part(&self, global_index: G) -> Result<PartId, DistError> {
        let range = self.try_find_range(global_index, 0)?;
        Ok(self.part_ids[range])
    }

    /// A locator with its hint reset to the first range.
    pub fn locator(&self) -> RangeLocator<'_, L, G> {
        RangeLocator::new(self)
    }
}

impl<L, G> Partition<L, G>
where
    L: LocalIndex + AsPrimitive<G>,
    G: GlobalIndex + AsPrimitive<L>,
{
    /// Global index of `local` in `part`'s numbering; inverse of
    /// [`Self::map_to_local`].
    ///
    /// # Errors
    /// [`DistError::OutOfRange`] if `part` is unknown or `local` is not below
    /// the part size.
    pub fn map_to_global(&self, part: PartId, local: L) -> Result<G, DistError> {
        let size = self
            .part_size(part)
            .ok_or_else(|| DistError::out_of_range(part, self.num_parts))?;
        if local < L::zero() || local >= size {
            return Err(DistError::out_of_range(local, size));
        }
        for range in (0..self.num_ranges()).filter(|&r| self.part_ids[r] == part) {
            let start = self.range_starting_indices[range];
            if local < start {
                continue;
            }
            let offset = <L as AsPrimitive<G>>::as_(local - start);
            if offset < self.range_bounds[range + 1] - self.range_bounds[range] {
                return Ok(self.range_bounds[range] + offset);
            }
        }
        Err(DistError::out_of_range(local, size))
    }
}

impl<L, G> DebugInvariants for Partition<L, G>
where
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
{
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self, "Partition");
    }

    fn validate_invariants(&self) -> Result<(), DistError> {
        ensure(self.range_bounds.first() == Some(&G::zero()), || {
            format!("range bounds must start at 0, got {:?}", self.range_bounds.first())
        })?;
        ensure(self.range_bounds.len() == self.part_ids.len() + 1, || {
            format!(
                "{} range bounds for {} ranges",
                self.range_bounds.len(),
                self.part_ids.len()
            )
        })?;
        ensure(
            self.range_starting_indices.len() == self.part_ids.len(),
            || {
                format!(
                    "{} starting indices for {} ranges",
                    self.range_starting_indices.len(),
                    self.part_ids.len()
                )
            },
        )?;
        ensure(self.part_sizes.len() == self.num_parts, || {
            format!("{} part sizes for {} parts", self.part_sizes.len(), self.num_parts)
        })?;
        if let Some((i, (a, b))) = self
            .range_bounds
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (a, b))| a >= b)
        {
            return Err(DistError::PartitionInvariant(format!(
                "range {i} is empty or decreasing: [{a:?}, {b:?})"
            )));
        }

        let mut running = vec![L::zero(); self.num_parts];
        for (range, &part) in self.part_ids.iter().enumerate() {
            ensure(part < self.num_parts, || {
                format!("range {range} owned by part {part} >= {}", self.num_parts)
            })?;
            ensure(self.range_starting_indices[range] == running[part], || {
                format!(
                    "range {range} starts at local {:?}, expected {:?}",
                    self.range_starting_indices[range], running[part]
                )
            })?;
            let len: L = cast_index(self.range_bounds[range + 1] - self.range_bounds[range])?;
            running[part] = running[part].checked_add(&len).ok_or_else(|| {
                DistError::PartitionInvariant(format!("size of part {part} overflows"))
            })?;
        }
        ensure(running == self.part_sizes, || {
            format!("part sizes {:?} disagree with ranges {:?}", self.part_sizes, running)
        })?;
        let empty = self.part_sizes.iter().filter(|s| s.is_zero()).count();
        ensure(empty == self.num_empty_parts, || {
            format!("{empty} empty parts, recorded {}", self.num_empty_parts)
        })
    }
}

static_assertions::assert_impl_all!(Partition<i32, i64>: Send, Sync);
