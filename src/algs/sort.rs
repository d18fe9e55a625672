//! Canonical ordering and key-equality reduction.
//!
//! All sorts here are lexicographic on `(key1, key2)` and stable, so ties
//! keep their input order on every executor. Reductions over duplicates
//! should go through [`reduce_by_key`] rather than rely on how ties land.

use crate::algs::executor::Executor;
use crate::data::matrix_data::MatrixEntry;
use crate::dist_error::DistError;

/// Stable row-major sort of coordinate entries.
pub fn sort_row_major<V, I, E>(exec: &E, entries: &mut [MatrixEntry<V, I>])
where
    V: Send,
    I: Ord + Copy + Send,
    E: Executor,
{
    exec.sort_by(entries, |a, b| a.key().cmp(&b.key()));
}

/// Sort two parallel key arrays by `(keys1[i], keys2[i])`.
///
/// # Errors
/// [`DistError::LengthMismatch`] if the arrays differ in length.
pub fn sort_key_pairs<A, B, E>(exec: &E, keys1: &mut [A], keys2: &mut [B]) -> Result<(), DistError>
where
    A: Ord + Copy + Send,
    B: Ord + Copy + Send,
    E: Executor,
{
    check_len("key pair", keys1.len(), keys2.len())?;
    let mut zipped: Vec<(A, B)> = keys1.iter().copied().zip(keys2.iter().copied()).collect();
    exec.sort_by(&mut zipped, |a, b| a.cmp(b));
    for ((k1, k2), (a, b)) in keys1.iter_mut().zip(keys2.iter_mut()).zip(zipped) {
        *k1 = a;
        *k2 = b;
    }
    Ok(())
}

/// Sort parallel `(keys1, keys2, values)` arrays by the key pair.
pub fn sort_key_pairs_with_values<A, B, V, E>(
    exec: &E,
    keys1: &mut [A],
    keys2: &mut [B],
    values: &mut [V],
) -> Result<(), DistError>
where
    A: Ord + Copy + Send,
    B: Ord + Copy + Send,
    V: Copy + Send,
    E: Executor,
{
    check_len("key pair", keys1.len(), keys2.len())?;
    check_len("value", keys1.len(), values.len())?;
    let mut zipped: Vec<(A, B, V)> = keys1
        .iter()
        .zip(keys2.iter())
        .zip(values.iter())
        .map(|((&a, &b), &v)| (a, b, v))
        .collect();
    exec.sort_by(&mut zipped, |x, y| (x.0, x.1).cmp(&(y.0, y.1)));
    for (i, (a, b, v)) in zipped.into_iter().enumerate() {
        keys1[i] = a;
        keys2[i] = b;
        values[i] = v;
    }
    Ok(())
}

/// Merge runs of adjacent items with equal keys.
///
/// The first item of each run is kept and every later item of the run is
/// folded into it with `combine(kept, later)`. Sort first to merge all
/// duplicates.
pub fn reduce_by_key<T, K, F, C>(mut items: Vec<T>, key: F, mut combine: C) -> Vec<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
    C: FnMut(&mut T, &T),
{
    items.dedup_by(|later, kept| {
        if key(later) == key(kept) {
            combine(kept, later);
            true
        } else {
            false
        }
    });
    items
}

/// Remove adjacent items with equal keys, keeping the first of each run.
pub fn dedup_sorted_by_key<T, K, F>(items: &mut Vec<T>, key: F)
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    items.dedup_by(|later, kept| key(later) == key(kept));
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::executor::SerialExec;

    #[test]
    fn key_pairs_sort_lexicographically() {
        let mut rows = vec![2, 0, 1, 0, 2];
        let mut cols = vec![1, 3, 0, 1, 0];
        sort_key_pairs(&SerialExec, &mut rows, &mut cols).unwrap();
        assert_eq!(rows, vec![0, 0, 1, 2, 2]);
        assert_eq!(cols, vec![1, 3, 0, 0, 1]);
    }

    #[test]
    fn key_pairs_with_values_keep_ties_in_input_order() {
        let mut rows = vec![1, 0, 1, 0];
        let mut cols = vec![5, 2, 5, 2];
        let mut vals = vec![10.0, 20.0, 30.0, 40.0];
        sort_key_pairs_with_values(&SerialExec, &mut rows, &mut cols, &mut vals).unwrap();
        assert_eq!(rows, vec![0, 0, 1, 1]);
        assert_eq!(vals, vec![20.0, 40.0, 10.0, 30.0]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = sort_key_pairs(&SerialExec, &mut [1, 2], &mut [1]).unwrap_err();
        assert_eq!(
            err,
            DistError::LengthMismatch {
                what: "key pair",
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn reduce_by_key_merges_adjacent_runs() {
        let items = vec![(0, 1.0), (0, 2.0), (1, 3.0), (0, 4.0), (0, 0.5)];
        let out = reduce_by_key(items, |x| x.0, |kept, later| kept.1 += later.1);
        assert_eq!(out, vec![(0, 3.0), (1, 3.0), (0, 4.5)]);
    }

    #[test]
    fn dedup_keeps_first_of_each_run() {
        let mut v = vec![(1, 'a'), (1, 'b'), (2, 'c'), (2, 'd'), (3, 'e')];
        dedup_sorted_by_key(&mut v, |x| x.0);
        assert_eq!(v, vec![(1, 'a'), (2, 'c'), (3, 'e')]);
    }
}
