#![allow(dead_code)]
use rand::rngs::SmallRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use sparse_dist::prelude::*;

pub type P = Partition<i32, i64>;

pub fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Uniformly random owner for each of `len` global indices.
pub fn random_mapping(rng: &mut SmallRng, len: usize, num_parts: usize) -> Vec<PartId> {
    (0..len).map(|_| rng.gen_range(0..num_parts)).collect()
}

/// Random coordinate data; each row gets `nnz_per_row` distinct columns
/// (clamped to `cols`) with values in `[0, 1)`. Rows are emitted in order,
/// columns within a row are not sorted.
pub fn random_matrix_data(
    rng: &mut SmallRng,
    rows: usize,
    cols: usize,
    nnz_per_row: std::ops::RangeInclusive<usize>,
) -> MatrixData<f64, i64> {
    let mut data = MatrixData::new((rows, cols));
    for r in 0..rows {
        let nnz = rng.gen_range(nnz_per_row.clone()).min(cols);
        for c in sample(rng, cols, nnz) {
            let v: f64 = rng.r#gen();
            data.push(r as i64, c as i64, v);
        }
    }
    data
}

/// Owner-local index of every global index, computed straight from a mapping.
pub fn local_numbering(mapping: &[PartId], num_parts: usize) -> Vec<i32> {
    let mut next = vec![0i32; num_parts];
    mapping
        .iter()
        .map(|&p| {
            let l = next[p];
            next[p] += 1;
            l
        })
        .collect()
}

/// Dense `y = A x` over global indices, summing duplicates.
pub fn global_spmv(data: &MatrixData<f64, i64>, x: &[f64]) -> Vec<f64> {
    let mut y = vec![0.0; data.size.0];
    for e in &data.entries {
        y[e.row as usize] += e.value * x[e.column as usize];
    }
    y
}

/// Per-part values of a global vector, in each part's local order.
pub fn scatter(mapping: &[PartId], num_parts: usize, x: &[f64]) -> Vec<Vec<f64>> {
    let mut out = vec![Vec::new(); num_parts];
    for (g, &p) in mapping.iter().enumerate() {
        out[p].push(x[g]);
    }
    out
}

pub fn assert_close(got: &[f64], want: &[f64]) {
    assert_eq!(got.len(), want.len());
    for (i, (a, b)) in got.iter().zip(want).enumerate() {
        assert!((a - b).abs() <= 1e-12 * (1.0 + b.abs()), "entry {i}: {a} vs {b}");
    }
}
