#![cfg(feature = "rayon")]
mod util;
use util::*;

use sparse_dist::prelude::*;

#[test]
fn rayon_decomposition_matches_serial() {
    let mut rng = rng(42);
    let row_mapping = random_mapping(&mut rng, 500, 13);
    let col_mapping = random_mapping(&mut rng, 500, 13);
    let data = random_matrix_data(&mut rng, 500, 500, 0..=30);
    let rows = P::build_from_mapping(&row_mapping, 13).unwrap();
    let cols = P::build_from_mapping(&col_mapping, 13).unwrap();
    for part in 0..13 {
        let serial = build_local_nonlocal(&SerialExec, &data.entries, &rows, &cols, part).unwrap();
        let parallel = build_local_nonlocal(&RayonExec, &data.entries, &rows, &cols, part).unwrap();
        assert_eq!(serial, parallel, "part {part}");
        assert_eq!(
            build_local(&SerialExec, &data.entries, &rows, part).unwrap(),
            build_local(&RayonExec, &data.entries, &rows, part).unwrap()
        );
    }
}

#[test]
fn rayon_row_major_sort_is_stable() {
    let mut rng = rng(8);
    let mapping = random_mapping(&mut rng, 200, 7);
    let data = random_matrix_data(&mut rng, 200, 200, 0..=12);
    let mut shuffled = data.entries.clone();
    shuffled.reverse();
    let p = P::build_from_mapping(&mapping, 7).unwrap();
    let cfg = DecompositionConfig {
        ensure_row_major: true,
        validate_output: true,
    };
    for part in 0..7 {
        assert_eq!(
            build_local_nonlocal_with(&SerialExec, &shuffled, &p, &p, part, &cfg).unwrap(),
            build_local_nonlocal_with(&RayonExec, &shuffled, &p, &p, part, &cfg).unwrap()
        );
    }
}
