//! One part's share of a row-distributed sparse matrix.

use num_traits::{AsPrimitive, Num};

use crate::algs::executor::Executor;
use crate::algs::matrix_build::{DecompositionConfig, LocalNonLocal, build_local_nonlocal_with};
use crate::data::matrix_data::MatrixData;
use crate::dist_error::DistError;
use crate::index::{GlobalIndex, LocalIndex, PartId, ValueLike};
use crate::partition::SharedPartition;

/// The rows of a distributed matrix owned by one part, split into the block
/// acting on owned columns and the block acting on received columns.
#[derive(Clone, Debug)]
pub struct DistMatrix<V, L, G> {
    row_partition: SharedPartition<L, G>,
    col_partition: SharedPartition<L, G>,
    blocks: LocalNonLocal<V, L, G>,
}

impl<V, L, G> DistMatrix<V, L, G>
where
    V: ValueLike,
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
{
    /// Decompose globally indexed `data` for `local_part`.
    ///
    /// # Errors
    /// [`DistError::LengthMismatch`] if `data.size` differs from the sizes of
    /// the two partitions, plus everything [`build_local_nonlocal_with`]
    /// reports.
    pub fn read_distributed<E: Executor>(
        exec: &E,
        data: &MatrixData<V, G>,
        row_partition: SharedPartition<L, G>,
        col_partition: SharedPartition<L, G>,
        local_part: PartId,
        cfg: &DecompositionConfig,
    ) -> Result<Self, DistError> {
        let rows = <G as AsPrimitive<usize>>::as_(row_partition.size());
        let cols = <G as AsPrimitive<usize>>::as_(col_partition.size());
        if data.size.0 != rows {
            return Err(DistError::LengthMismatch {
                what: "matrix rows",
                expected: rows,
                got: data.size.0,
            });
        }
        if data.size.1 != cols {
            return Err(DistError::LengthMismatch {
                what: "matrix columns",
                expected: cols,
                got: data.size.1,
            });
        }
        let blocks = build_local_nonlocal_with(
            exec,
            &data.entries,
            &row_partition,
            &col_partition,
            local_part,
            cfg,
        )?;
        Ok(Self {
            row_partition,
            col_partition,
            blocks,
        })
    }

    pub fn row_partition(&self) -> &SharedPartition<L, G> {
        &self.row_partition
    }

    pub fn col_partition(&self) -> &SharedPartition<L, G> {
        &self.col_partition
    }

    pub fn local_part(&self) -> PartId {
        self.blocks.local_part
    }

    pub fn blocks(&self) -> &LocalNonLocal<V, L, G> {
        &self.blocks
    }

    pub fn into_blocks(self) -> LocalNonLocal<V, L, G> {
        self.blocks
    }

    pub fn recv_sizes(&self) -> &[usize] {
        &self.blocks.recv_sizes
    }

    pub fn gather_idxs(&self) -> &[L] {
        &self.blocks.gather_idxs
    }
}

impl<V, L, G> DistMatrix<V, L, G>
where
    V: ValueLike + Num,
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
{
    /// `y = A_local * x_local + A_non_local * recv_values` for a single
    /// right-hand side.
    ///
    /// `x_local` holds the owned columns in local numbering and
    /// `recv_values` the received columns in compacted order, i.e. laid out
    /// by [`LocalNonLocal::recv_offsets`].
    ///
    /// # Errors
    /// [`DistError::LengthMismatch`] if a slice does not match the block sizes.
    pub fn apply(&self, x_local: &[V], recv_values: &[V], y: &mut [V]) -> Result<(), DistError> {
        let b = &self.blocks;
        check_len("local x", b.num_local_cols, x_local.len())?;
        check_len("received values", b.num_non_local_cols(), recv_values.len())?;
        check_len("y", b.num_local_rows, y.len())?;

        y.fill(V::zero());
        for ((&r, &c), &v) in b.local_row_idxs.iter().zip(&b.local_col_idxs).zip(&b.local_values) {
            let row: usize = r.as_();
            let col: usize = c.as_();
            y[row] = y[row] + v * x_local[col];
        }
        for ((&r, &c), &v) in b
            .non_local_row_idxs
            .iter()
            .zip(&b.non_local_col_idxs)
            .zip(&b.non_local_values)
        {
            let row: usize = r.as_();
            let col: usize = c.as_();
            y[row] = y[row] + v * recv_values[col];
        }
        Ok(())
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), DistError> {
    if expected == got {
        Ok(())
    } else {
        Err(DistError::LengthMismatch {
            what,
            expected,
            got,
        })
    }
}

static_assertions::assert_impl_all!(DistMatrix<f64, i32, i64>: Send, Sync);
