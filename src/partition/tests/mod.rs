use super::*;


type P = Partition<i32, i64>;

#[test]
fn build_from_mapping_merges_consecutive_parts() {
    let p = P::build_from_mapping(&[1, 0, 2, 2, 0, 1, 1, 2], 3).unwrap();
    assert_eq!(p.num_parts(), 3);
    assert_eq!(p.num_ranges(), 6);
    assert_eq!(p.range_bounds(), &[0, 1, 2, 4, 5, 7, 8]);
    assert_eq!(p.part_ids(), &[1, 0, 2, 0, 1, 2]);
    assert_eq!(p.range_starting_indices(), &[0, 0, 0, 1, 1, 2]);
    assert_eq!(p.part_sizes(), &[2, 3, 3]);
    assert_eq!(p.size(), 8);
    assert_eq!(p.num_empty_parts(), 0);
    assert!(!p.has_connected_parts());
    assert!(!p.has_ordered_parts());
    p.validate_invariants().unwrap();
}

#[test]
fn build_from_mapping_counts_empty_parts() {
    let p = P::build_from_mapping(&[0, 0, 3, 3], 5).unwrap();
    assert_eq!(p.part_sizes(), &[2, 0, 0, 2, 0]);
    assert_eq!(p.num_empty_parts(), 3);
    assert!(p.has_connected_parts());
    assert!(p.has_ordered_parts());
}

#[test]
fn build_from_mapping_rejects_bad_part() {
    let err = P::build_from_mapping(&[0, 1, 3, 1], 3).unwrap_err();
    assert_eq!(
        err,
        DistError::InvalidPartId {
            index: 2,
            part: 3,
            num_parts: 3
        }
    );
}

#[test]
fn empty_mapping_has_no_ranges() {
    let p = P::build_from_mapping(&[], 2).unwrap();
    assert_eq!(p.num_ranges(), 0);
    assert_eq!(p.range_bounds(), &[0]);
    assert_eq!(p.size(), 0);
    assert_eq!(p.num_empty_parts(), 2);
    assert!(p.try_find_range(0, 0).is_err());
}

#[test]
fn build_from_contiguous_skips_empty_parts() {
    let p = P::build_from_contiguous(&[0, 3, 3, 7]).unwrap();
    assert_eq!(p.num_parts(), 3);
    assert_eq!(p.range_bounds(), &[0, 3, 7]);
    assert_eq!(p.part_ids(), &[0, 2]);
    assert_eq!(p.range_starting_indices(), &[0, 0]);
    assert_eq!(p.part_sizes(), &[3, 0, 4]);
    assert_eq!(p.num_empty_parts(), 1);
    assert!(p.has_ordered_parts());
}

#[test]
fn build_from_contiguous_rejects_malformed_ranges() {
    assert!(matches!(
        P::build_from_contiguous(&[]),
        Err(DistError::InvalidArgument(_))
    ));
    assert!(matches!(
        P::build_from_contiguous(&[1, 4]),
        Err(DistError::InvalidArgument(_))
    ));
    assert!(matches!(
        P::build_from_contiguous(&[0, 4, 2]),
        Err(DistError::InvalidArgument(_))
    ));
}

#[test]
fn uniform_distributes_remainder_to_leading_parts() {
    let p = P::build_from_global_size_uniform(3, 10).unwrap();
    assert_eq!(p.range_bounds(), &[0, 4, 7, 10]);
    assert_eq!(p.part_sizes(), &[4, 3, 3]);

    let tiny = P::build_from_global_size_uniform(4, 2).unwrap();
    assert_eq!(tiny.part_sizes(), &[1, 1, 0, 0]);
    assert_eq!(tiny.num_empty_parts(), 2);

    assert!(P::build_from_global_size_uniform(0, 5).is_err());
}

#[test]
fn find_range_uses_hint_and_search() {
    let p = P::build_from_mapping(&[1, 0, 2, 2, 0, 1, 1, 2], 3).unwrap();
    // correct hint short-circuits
    assert_eq!(p.find_range(3, 2), 2);
    // wrong hint falls back to binary search
    assert_eq!(p.find_range(3, 0), 2);
    assert_eq!(p.find_range(6, 0), 4);
    assert_eq!(p.find_range(7, 5), 5);
    // hint past the last range is ignored
    assert_eq!(p.find_range(0, 17), 0);
}

#[test]
fn map_to_local_and_back() {
    let p = P::build_from_mapping(&[1, 0, 2, 2, 0, 1, 1, 2], 3).unwrap();
    let range = p.find_range(6, 0);
    assert_eq!(p.map_to_local(6, range), 2);
    assert_eq!(p.map_to_global(1, 2).unwrap(), 6);
    assert_eq!(p.map_to_global(0, 1).unwrap(), 4);
    assert!(p.map_to_global(0, 2).is_err());
    assert!(p.map_to_global(5, 0).is_err());
    assert_eq!(p.owning_part(7).unwrap(), 2);
    assert!(matches!(p.owning_part(8), Err(DistError::OutOfRange { .. })));
}

#[test]
fn index_overflow_is_reported() {
    let mapping = vec![0usize; 300];
    assert!(matches!(
        Partition::<i8, i64>::build_from_mapping(&mapping, 1),
        Err(DistError::IndexOverflow { .. })
    ));
}

#[test]
fn validate_catches_tampered_partition() {
    let mut p = P::build_from_mapping(&[0, 1, 0], 2).unwrap();
    p.range_starting_indices[2] = 0;
    assert!(matches!(
        p.validate_invariants(),
        Err(DistError::PartitionInvariant(_))
    ));
}

#[test]
fn serde_preserves_partition() {
    let p = P::build_from_mapping(&[2, 2, 0, 1], 3).unwrap();
    let json = serde_json::to_string(&p).unwrap();
    let back: P = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);
    back.validate_invariants().unwrap();
}

#[test]
fn deserialize_rejects_unknown_part_id() {
    let json = r#"{"num_parts":2,"num_empty_parts":1,"range_bounds":[0,3],
        "part_ids":[5],"range_starting_indices":[0],"part_sizes":[3,0]}"#;
    let err = serde_json::from_str::<P>(json).unwrap_err();
    assert!(err.to_string().contains("owned by part 5"), "{err}");

    let repr: PartitionRepr<i32, i64> = serde_json::from_str(json).unwrap();
    assert!(matches!(
        P::from_repr(repr),
        Err(DistError::PartitionInvariant(_))
    ));
}

#[test]
fn deserialize_rejects_inconsistent_layout() {
    // bounds not increasing
    let json = r#"{"num_parts":1,"num_empty_parts":0,"range_bounds":[0,4,2],
        "part_ids":[0,0],"range_starting_indices":[0,4],"part_sizes":[2]}"#;
    assert!(serde_json::from_str::<P>(json).is_err());
    // part sizes disagree with the ranges
    let json = r#"{"num_parts":2,"num_empty_parts":0,"range_bounds":[0,2,5],
        "part_ids":[0,1],"range_starting_indices":[0,0],"part_sizes":[2,2]}"#;
    let repr: PartitionRepr<i32, i64> = serde_json::from_str(json).unwrap();
    assert!(matches!(
        P::from_repr(repr),
        Err(DistError::PartitionInvariant(_))
    ));
}
