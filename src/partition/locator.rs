//! Sequential-access range lookup.
//!
//! [`RangeLocator`] remembers the last range it found and tries it first, so
//! scanning row-major input costs O(1) per entry except at range changes.

use num_traits::AsPrimitive;

use super::Partition;
use crate::dist_error::DistError;
use crate::index::{GlobalIndex, LocalIndex, PartId};

/// Hinted range lookup over a borrowed [`Partition`].
#[derive(Clone, Copy, Debug)]
pub struct RangeLocator<'a, L, G> {
    partition: &'a Partition<L, G>,
    hint: usize,
}

impl<'a, L, G> RangeLocator<'a, L, G>
where
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
{
    pub fn new(partition: &'a Partition<L, G>) -> Self {
        Self { partition, hint: 0 }
    }

    pub fn partition(&self) -> &'a Partition<L, G> {
        self.partition
    }

    /// Range id returned by the last lookup.
    pub fn hint(&self) -> usize {
        self.hint
    }

    /// Range containing `global_index`; the index must be covered.
    #[inline]
    pub fn locate(&mut self, global_index: G) -> usize {
        self.hint = self.partition.find_range(global_index, self.hint);
        self.hint
    }

    /// Checked [`Self::locate`]; the hint is kept on failure.
    #[inline]
    pub fn try_locate(&mut self, global_index: G) -> Result<usize, DistError> {
        self.hint = self.partition.try_find_range(global_index, self.hint)?;
        Ok(self.hint)
    }

    /// Owning part of `global_index`.
    #[inline]
    pub fn part_of(&mut self, global_index: G) -> Result<PartId, DistError> {
        let range = self.try_locate(global_index)?;
        Ok(self.partition.part_ids()[range])
    }

    /// Owning part and local index of `global_index`.
    #[inline]
    pub fn to_local(&mut self, global_index: G) -> Result<(PartId, L), DistError> {
        let range = self.try_locate(global_index)?;
        Ok((
            self.partition.part_ids()[range],
            self.partition.map_to_local(global_index, range),
        ))
    }
}
