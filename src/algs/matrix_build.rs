//! Local/non-local decomposition of a globally indexed sparse matrix.
//!
//! For a target part `p`, every entry whose row `p` owns is routed either to
//! the *local* block (column also owned by `p`) or the *non-local* block
//! (column owned elsewhere). Non-local columns are compacted: the distinct
//! remote global columns are ordered by (owning part, global id) and the
//! entries refer to their position in that sequence. The same ordering
//! defines the receive schedule:
//!
//! - `local_to_global_col[k]`: global id of compacted column `k`
//! - `gather_idxs[k]`: local index of that column inside its owner
//! - `recv_sizes[q]`: how many compacted columns part `q` owns
//!
//! so the columns received from part `q` form one contiguous block, and the
//! blocks appear in ascending part order.

use hashbrown::HashMap;
use itertools::Itertools;
use num_traits::AsPrimitive;

use crate::algs::components::{prefix_sum, reduce_add};
use crate::algs::executor::Executor;
use crate::algs::sort::{dedup_sorted_by_key, sort_row_major};
use crate::data::matrix_data::{MatrixData, MatrixEntry};
use crate::debug_invariants::{DebugInvariants, ensure};
use crate::dist_error::DistError;
use crate::index::{GlobalIndex, LocalIndex, PartId, ValueLike, index_from_usize};
use crate::partition::Partition;

/// Knobs for [`build_local_nonlocal_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecompositionConfig {
    /// Stable-sort a copy of the input row-major before decomposing. Output
    /// order then follows the sorted input.
    pub ensure_row_major: bool,
    /// Run [`DebugInvariants::validate_invariants`] on the result and return
    /// its error, in every build profile.
    pub validate_output: bool,
}

/// Decomposition of one part's rows into local and non-local blocks plus the
/// receive schedule for the non-local columns.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalNonLocal<V, L, G> {
    pub local_part: PartId,
    /// Rows owned by `local_part` under the row partition.
    pub num_local_rows: usize,
    /// Columns owned by `local_part` under the column partition.
    pub num_local_cols: usize,
    pub local_row_idxs: Vec<L>,
    pub local_col_idxs: Vec<L>,
    pub local_values: Vec<V>,
    pub non_local_row_idxs: Vec<L>,
    /// Compacted indices into `local_to_global_col`.
    pub non_local_col_idxs: Vec<L>,
    pub non_local_values: Vec<V>,
    /// Owner-local index of each compacted column, grouped by owner.
    pub gather_idxs: Vec<L>,
    /// Compacted columns per owning part; zero for `local_part`.
    pub recv_sizes: Vec<usize>,
    pub local_to_global_col: Vec<G>,
}

enum Routed<V, L, G> {
    Local {
        row: L,
        col: L,
        value: V,
    },
    NonLocal {
        row: L,
        col: G,
        col_part: PartId,
        col_range: usize,
        value: V,
    },
}

#[derive(Clone, Copy)]
struct RemoteColumn<G> {
    part: PartId,
    global: G,
    range: usize,
}

/// Split `input` into the local and non-local blocks of `local_part`.
///
/// `col_partition` may be the same partition as `row_partition`. Entries
/// keep their relative input order inside each block; pass row-major input
/// for O(1) amortized range lookups.
///
/// # Errors
/// - [`DistError::InvalidArgument`] if the partitions disagree on the number
///   of parts or `local_part` is not one of them.
/// - [`DistError::OutOfRange`] if a row or column is not covered.
pub fn build_local_nonlocal<V, L, G, E>(
    exec: &E,
    input: &[MatrixEntry<V, G>],
    row_partition: &Partition<L, G>,
    col_partition: &Partition<L, G>,
    local_part: PartId,
) -> Result<LocalNonLocal<V, L, G>, DistError>
where
    V: ValueLike,
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
    E: Executor,
{
    build_local_nonlocal_with(
        exec,
        input,
        row_partition,
        col_partition,
        local_part,
        &DecompositionConfig::default(),
    )
}

/// [`build_local_nonlocal`] with explicit configuration.
pub fn build_local_nonlocal_with<V, L, G, E>(
    exec: &E,
    input: &[MatrixEntry<V, G>],
    row_partition: &Partition<L, G>,
    col_partition: &Partition<L, G>,
    local_part: PartId,
    cfg: &DecompositionConfig,
) -> Result<LocalNonLocal<V, L, G>, DistError>
where
    V: ValueLike,
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
    E: Executor,
{
    let result = if cfg.ensure_row_major {
        let mut sorted = input.to_vec();
        sort_row_major(exec, &mut sorted);
        decompose(exec, &sorted, row_partition, col_partition, local_part)?
    } else {
        decompose(exec, input, row_partition, col_partition, local_part)?
    };
    if cfg.validate_output {
        result.validate_invariants()?;
    } else {
        result.debug_assert_invariants();
    }
    Ok(result)
}

fn decompose<V, L, G, E>(
    exec: &E,
    input: &[MatrixEntry<V, G>],
    row_partition: &Partition<L, G>,
    col_partition: &Partition<L, G>,
    local_part: PartId,
) -> Result<LocalNonLocal<V, L, G>, DistError>
where
    V: ValueLike,
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
    E: Executor,
{
    let num_parts = row_partition.num_parts();
    if col_partition.num_parts() != num_parts {
        return Err(DistError::InvalidArgument(format!(
            "row partition has {num_parts} parts, column partition has {}",
            col_partition.num_parts()
        )));
    }
    if local_part >= num_parts {
        return Err(DistError::InvalidArgument(format!(
            "local part {local_part} is outside [0, {num_parts})"
        )));
    }
    log::trace!(
        "build_local_nonlocal on {}: {} entries for part {local_part}",
        exec.name(),
        input.len()
    );

    // row filter + column classification
    let routed = exec.try_filter_map_with(
        input,
        || (row_partition.locator(), col_partition.locator()),
        |(rows, cols), entry| {
            let row_range = rows.try_locate(entry.row)?;
            if row_partition.part_ids()[row_range] != local_part {
                return Ok(None);
            }
            let row = row_partition.map_to_local(entry.row, row_range);
            let col_range = cols.try_locate(entry.column)?;
            let col_part = col_partition.part_ids()[col_range];
            Ok(Some(if col_part == local_part {
                Routed::Local {
                    row,
                    col: col_partition.map_to_local(entry.column, col_range),
                    value: entry.value,
                }
            } else {
                Routed::NonLocal {
                    row,
                    col: entry.column,
                    col_part,
                    col_range,
                    value: entry.value,
                }
            }))
        },
    )?;

    let num_local = routed
        .iter()
        .filter(|r| matches!(r, Routed::Local { .. }))
        .count();
    let num_non_local = routed.len() - num_local;
    let mut local_row_idxs = Vec::with_capacity(num_local);
    let mut local_col_idxs = Vec::with_capacity(num_local);
    let mut local_values = Vec::with_capacity(num_local);
    let mut non_local_row_idxs = Vec::with_capacity(num_non_local);
    let mut non_local_globals = Vec::with_capacity(num_non_local);
    let mut non_local_values = Vec::with_capacity(num_non_local);
    let mut remote = Vec::with_capacity(num_non_local);
    for r in routed {
        match r {
            Routed::Local { row, col, value } => {
                local_row_idxs.push(row);
                local_col_idxs.push(col);
                local_values.push(value);
            }
            Routed::NonLocal {
                row,
                col,
                col_part,
                col_range,
                value,
            } => {
                non_local_row_idxs.push(row);
                non_local_globals.push(col);
                non_local_values.push(value);
                remote.push(RemoteColumn {
                    part: col_part,
                    global: col,
                    range: col_range,
                });
            }
        }
    }

    // compaction: a global column has exactly one owner, so sorting by
    // (part, global) makes duplicates adjacent
    exec.sort_by(&mut remote, |a, b| (a.part, a.global).cmp(&(b.part, b.global)));
    dedup_sorted_by_key(&mut remote, |c| c.global);

    let mut compacted: HashMap<G, L> = HashMap::with_capacity(remote.len());
    let mut recv_sizes = vec![0usize; num_parts];
    let mut local_to_global_col = Vec::with_capacity(remote.len());
    let mut gather_idxs = Vec::with_capacity(remote.len());
    for (k, c) in remote.iter().enumerate() {
        compacted.insert(c.global, index_from_usize(k)?);
        recv_sizes[c.part] += 1;
        local_to_global_col.push(c.global);
        gather_idxs.push(col_partition.map_to_local(c.global, c.range));
    }
    let non_local_col_idxs = non_local_globals
        .iter()
        .map(|g| {
            compacted.get(g).copied().ok_or_else(|| {
                DistError::PartitionInvariant(format!("column {g:?} missing from compaction"))
            })
        })
        .collect::<Result<Vec<L>, _>>()?;

    log::debug!(
        "part {local_part}: {} local and {} non-local entries, {} remote columns from {} parts",
        local_row_idxs.len(),
        non_local_row_idxs.len(),
        local_to_global_col.len(),
        recv_sizes.iter().filter(|&&s| s > 0).count()
    );

    Ok(LocalNonLocal {
        local_part,
        num_local_rows: row_partition.part_size(local_part).map_or(0, |s| s.as_()),
        num_local_cols: col_partition.part_size(local_part).map_or(0, |s| s.as_()),
        local_row_idxs,
        local_col_idxs,
        local_values,
        non_local_row_idxs,
        non_local_col_idxs,
        non_local_values,
        gather_idxs,
        recv_sizes,
        local_to_global_col,
    })
}

impl<V, L, G> LocalNonLocal<V, L, G>
where
    V: ValueLike,
    L: LocalIndex,
    G: GlobalIndex,
{
    pub fn num_parts(&self) -> usize {
        self.recv_sizes.len()
    }

    /// Number of distinct remote columns.
    pub fn num_non_local_cols(&self) -> usize {
        self.local_to_global_col.len()
    }

    /// Exclusive prefix sums of `recv_sizes`, `num_parts() + 1` entries:
    /// columns from part `q` occupy `offsets[q]..offsets[q + 1]`.
    pub fn recv_offsets(&self) -> Vec<usize> {
        let mut offsets = self.recv_sizes.clone();
        offsets.push(0);
        prefix_sum(&mut offsets);
        offsets
    }

    /// Part owning compacted column `k`.
    pub fn source_part_of(&self, k: usize) -> Option<PartId> {
        let mut end = 0;
        self.recv_sizes.iter().position(|&s| {
            end += s;
            k < end
        })
    }

    /// Parts this part receives from, with the number of columns each.
    pub fn neighbors(&self) -> impl Iterator<Item = (PartId, usize)> + '_ {
        self.recv_sizes
            .iter()
            .enumerate()
            .filter(|(_, s)| **s > 0)
            .map(|(q, &s)| (q, s))
    }

    /// Owner-local indices requested from `part`.
    pub fn gather_idxs_from(&self, part: PartId) -> &[L] {
        let Some(&len) = self.recv_sizes.get(part) else {
            return &[];
        };
        let begin = reduce_add(&self.recv_sizes[..part], 0);
        self.gather_idxs.get(begin..begin + len).unwrap_or(&[])
    }

    /// The local block as coordinate data of size `(num_local_rows, num_local_cols)`.
    pub fn local_matrix(&self) -> MatrixData<V, L> {
        MatrixData::with_entries(
            (self.num_local_rows, self.num_local_cols),
            zip_entries(&self.local_row_idxs, &self.local_col_idxs, &self.local_values),
        )
    }

    /// The non-local block over compacted columns, of size
    /// `(num_local_rows, num_non_local_cols)`.
    pub fn non_local_matrix(&self) -> MatrixData<V, L> {
        MatrixData::with_entries(
            (self.num_local_rows, self.num_non_local_cols()),
            zip_entries(
                &self.non_local_row_idxs,
                &self.non_local_col_idxs,
                &self.non_local_values,
            ),
        )
    }
}

fn zip_entries<V: Copy, L: Copy>(rows: &[L], cols: &[L], values: &[V]) -> Vec<MatrixEntry<V, L>> {
    rows.iter()
        .zip(cols)
        .zip(values)
        .map(|((&r, &c), &v)| MatrixEntry::new(r, c, v))
        .collect()
}

impl<V, L, G> DebugInvariants for LocalNonLocal<V, L, G>
where
    V: ValueLike,
    L: LocalIndex,
    G: GlobalIndex,
{
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self, "LocalNonLocal");
    }

    fn validate_invariants(&self) -> Result<(), DistError> {
        let n_local = self.local_row_idxs.len();
        ensure(
            self.local_col_idxs.len() == n_local && self.local_values.len() == n_local,
            || "local block arrays differ in length".into(),
        )?;
        let n_non_local = self.non_local_row_idxs.len();
        ensure(
            self.non_local_col_idxs.len() == n_non_local
                && self.non_local_values.len() == n_non_local,
            || "non-local block arrays differ in length".into(),
        )?;

        let n_cols = self.local_to_global_col.len();
        let total = reduce_add(&self.recv_sizes, 0);
        ensure(total == n_cols && self.gather_idxs.len() == n_cols, || {
            format!(
                "recv sizes sum to {total}, {n_cols} compacted columns, {} gather indices",
                self.gather_idxs.len()
            )
        })?;
        ensure(
            self.recv_sizes.get(self.local_part).is_none_or(|&s| s == 0),
            || format!("part {} receives from itself", self.local_part),
        )?;
        ensure(self.local_to_global_col.iter().all_unique(), || {
            "duplicate compacted column".into()
        })?;

        let in_bounds = |idx: &L, bound: usize| *idx >= L::zero() && idx.as_() < bound;
        ensure(
            self.non_local_col_idxs.iter().all(|c| in_bounds(c, n_cols)),
            || format!("non-local column index outside [0, {n_cols})"),
        )?;
        ensure(
            self.local_row_idxs
                .iter()
                .chain(&self.non_local_row_idxs)
                .all(|r| in_bounds(r, self.num_local_rows)),
            || format!("row index outside [0, {})", self.num_local_rows),
        )?;
        ensure(
            self.local_col_idxs
                .iter()
                .all(|c| in_bounds(c, self.num_local_cols)),
            || format!("local column index outside [0, {})", self.num_local_cols),
        )?;
        ensure(self.gather_idxs.iter().all(|g| *g >= L::zero()), || {
            "negative gather index".into()
        })
    }
}

static_assertions::assert_impl_all!(LocalNonLocal<f64, i32, i64>: Send, Sync);
