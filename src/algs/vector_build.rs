//! Local block of a distributed (multi-)vector.

use num_traits::AsPrimitive;

use crate::algs::executor::Executor;
use crate::data::matrix_data::MatrixEntry;
use crate::dist_error::DistError;
use crate::index::{GlobalIndex, LocalIndex, PartId, ValueLike, cast_index};
use crate::partition::Partition;

/// Keep the entries whose row is owned by `local_part`, with rows renumbered
/// into that part's local index space.
///
/// Columns index the vector's columns and are copied unchanged (narrowed to
/// `L`). Surviving entries keep their input order. Row-major input makes the
/// range lookups O(1) amortized.
///
/// # Errors
/// - [`DistError::OutOfRange`] if a row is not covered by `partition`.
/// - [`DistError::IndexOverflow`] if a column does not fit `L`.
pub fn build_local<V, L, G, E>(
    exec: &E,
    input: &[MatrixEntry<V, G>],
    partition: &Partition<L, G>,
    local_part: PartId,
) -> Result<Vec<MatrixEntry<V, L>>, DistError>
where
    V: ValueLike,
    L: LocalIndex,
    G: GlobalIndex + AsPrimitive<L>,
    E: Executor,
{
    log::trace!(
        "build_local on {}: {} entries for part {local_part}",
        exec.name(),
        input.len()
    );
    let local = exec.try_filter_map_with(
        input,
        || partition.locator(),
        |locator, entry| {
            let range = locator.try_locate(entry.row)?;
            if partition.part_ids()[range] != local_part {
                return Ok(None);
            }
            Ok(Some(MatrixEntry::new(
                partition.map_to_local(entry.row, range),
                cast_index(entry.column)?,
                entry.value,
            )))
        },
    )?;
    log::debug!(
        "build_local: part {local_part} keeps {} of {} entries",
        local.len(),
        input.len()
    );
    Ok(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::executor::SerialExec;

    fn entry(row: i64, column: i64, value: f64) -> MatrixEntry<f64, i64> {
        MatrixEntry::new(row, column, value)
    }

    #[test]
    fn keeps_owned_rows_in_input_order() {
        let partition = Partition::<i32, i64>::build_from_mapping(&[0, 1, 0, 1], 2).unwrap();
        let input = vec![
            entry(3, 0, 1.0),
            entry(0, 1, 2.0),
            entry(1, 0, 3.0),
            entry(2, 0, 4.0),
            entry(3, 1, 5.0),
            entry(0, 0, 6.0),
        ];
        let part0 = build_local(&SerialExec, &input, &partition, 0).unwrap();
        assert_eq!(
            part0,
            vec![
                MatrixEntry::new(0, 1, 2.0),
                MatrixEntry::new(1, 0, 4.0),
                MatrixEntry::new(0, 0, 6.0),
            ]
        );
        let part1 = build_local(&SerialExec, &input, &partition, 1).unwrap();
        assert_eq!(
            part1,
            vec![
                MatrixEntry::new(1, 0, 1.0),
                MatrixEntry::new(0, 0, 3.0),
                MatrixEntry::new(1, 1, 5.0),
            ]
        );
    }

    #[test]
    fn uncovered_row_fails_without_output() {
        let partition = Partition::<i32, i64>::build_from_mapping(&[0, 0], 1).unwrap();
        let input = vec![entry(0, 0, 1.0), entry(2, 0, 1.0)];
        assert!(matches!(
            build_local(&SerialExec, &input, &partition, 0),
            Err(DistError::OutOfRange { .. })
        ));
    }
}
