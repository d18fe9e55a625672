//! Dense local block of a row-distributed multi-vector.

use std::ops::Add;

use num_traits::{AsPrimitive, Zero};

use crate::algs::executor::Executor;
use crate::algs::vector_build::build_local;
use crate::data::matrix_data::MatrixData;
use crate::dist_error::DistError;
use crate::index::{GlobalIndex, LocalIndex, PartId, ValueLike};
use crate::partition::SharedPartition;

/// The rows of a distributed multi-vector owned by one part, stored dense
/// and row-major (`num_local_rows x num_cols`).
#[derive(Clone, Debug)]
pub struct DistVector<V, L, G> {
    partition: SharedPartition<L, G>,
    local_part: PartId,
    num_local_rows: usize,
    num_cols: usize,
    values: Vec<V>,
}

impl<V, L, G> DistVector<V, L, G>
where
    V: ValueLike + Zero + Add<Output = V>,
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
{
    /// Extract `local_part`'s rows from globally indexed coordinate data.
    /// Entries at the same position are summed.
    ///
    /// # Errors
    /// - [`DistError::LengthMismatch`] if `data` has a different number of
    ///   rows than the partition covers.
    /// - [`DistError::InvalidArgument`] for an unknown `local_part`.
    /// - [`DistError::OutOfRange`] for a column outside `data.size.1`.
    pub fn read_distributed<E: Executor>(
        exec: &E,
        data: &MatrixData<V, G>,
        partition: SharedPartition<L, G>,
        local_part: PartId,
    ) -> Result<Self, DistError> {
        let global_rows = <G as AsPrimitive<usize>>::as_(partition.size());
        if data.size.0 != global_rows {
            return Err(DistError::LengthMismatch {
                what: "vector rows",
                expected: global_rows,
                got: data.size.0,
            });
        }
        let num_local_rows = local_rows(&partition, local_part)?;
        let num_cols = data.size.1;

        let local = build_local(exec, &data.entries, &partition, local_part)?;
        let mut values = vec![V::zero(); num_local_rows * num_cols];
        for e in local {
            let row: usize = e.row.as_();
            let col: usize = e.column.as_();
            if e.column < L::zero() || col >= num_cols {
                return Err(DistError::out_of_range(e.column, num_cols));
            }
            let slot = &mut values[row * num_cols + col];
            *slot = *slot + e.value;
        }
        Ok(Self {
            partition,
            local_part,
            num_local_rows,
            num_cols,
            values,
        })
    }

    /// Wrap existing dense local values.
    pub fn from_local(
        partition: SharedPartition<L, G>,
        local_part: PartId,
        num_cols: usize,
        values: Vec<V>,
    ) -> Result<Self, DistError> {
        let num_local_rows = local_rows(&partition, local_part)?;
        let expected = num_local_rows * num_cols;
        if values.len() != expected {
            return Err(DistError::LengthMismatch {
                what: "local vector values",
                expected,
                got: values.len(),
            });
        }
        Ok(Self {
            partition,
            local_part,
            num_local_rows,
            num_cols,
            values,
        })
    }

    pub fn partition(&self) -> &SharedPartition<L, G> {
        &self.partition
    }

    pub fn local_part(&self) -> PartId {
        self.local_part
    }

    pub fn num_local_rows(&self) -> usize {
        self.num_local_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn local_values(&self) -> &[V] {
        &self.values
    }

    pub fn local_values_mut(&mut self) -> &mut [V] {
        &mut self.values
    }

    /// Pack the rows a neighbour asked for through its gather indices, in
    /// request order.
    ///
    /// # Errors
    /// [`DistError::OutOfRange`] if an index is not a local row.
    pub fn gather(&self, idxs: &[L]) -> Result<Vec<V>, DistError> {
        let rows = self.num_local_rows;
        let mut out = Vec::with_capacity(idxs.len() * self.num_cols);
        for &idx in idxs {
            let row: usize = idx.as_();
            if idx < L::zero() || row >= rows {
                return Err(DistError::out_of_range(idx, rows));
            }
            out.extend_from_slice(&self.values[row * self.num_cols..(row + 1) * self.num_cols]);
        }
        Ok(out)
    }
}

fn local_rows<L, G>(partition: &SharedPartition<L, G>, part: PartId) -> Result<usize, DistError>
where
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
{
    partition
        .part_size(part)
        .map(|s| s.as_())
        .ok_or_else(|| {
            DistError::InvalidArgument(format!(
                "part {part} is outside [0, {})",
                partition.num_parts()
            ))
        })
}

static_assertions::assert_impl_all!(DistVector<f64, i32, i64>: Send, Sync);
