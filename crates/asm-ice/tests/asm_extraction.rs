use std::collections::BTreeSet;

use asm_core::{AsmError, BitStream, Order};
use asm_ice::{evolve, extract, AlternatingSignMatrix, HeightFunction};

fn all_order_three() -> Vec<Vec<Vec<i8>>> {
    vec![
        vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]],
        vec![vec![1, 0, 0], vec![0, 0, 1], vec![0, 1, 0]],
        vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 1]],
        vec![vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]],
        vec![vec![0, 0, 1], vec![1, 0, 0], vec![0, 1, 0]],
        vec![vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0]],
        vec![vec![0, 1, 0], vec![1, -1, 1], vec![0, 1, 0]],
    ]
}

#[test]
fn every_order_three_matrix_round_trips() {
    for rows in all_order_three() {
        let matrix = AlternatingSignMatrix::from_rows(rows).unwrap();
        let heights = HeightFunction::from_asm(&matrix);
        heights.validate().unwrap();
        assert!(HeightFunction::minimal(matrix.order()) <= heights);
        assert!(heights <= HeightFunction::maximal(matrix.order()));
        assert_eq!(extract(&heights).unwrap(), matrix);
    }
}

#[test]
fn long_walks_reach_all_seven_order_three_matrices() {
    let order = Order::new(3).unwrap();
    let stream = BitStream::new(31);
    let mut config = HeightFunction::minimal(order);
    let mut seen = BTreeSet::new();
    for t in 0..2_000 {
        evolve(&mut config, &stream, t, t + 1);
        seen.insert(extract(&config).unwrap().canonical_hash());
    }
    assert_eq!(seen.len(), 7);
}

#[test]
fn height_serde_validates_before_extraction() {
    let min = HeightFunction::minimal(Order::new(2).unwrap());
    let json = serde_json::to_string(&min).unwrap();
    assert_eq!(json, r#"{"order":2,"heights":[1,2,3,2,1,2,3,2,1]}"#);
    let decoded: HeightFunction = serde_json::from_str(&json).unwrap();
    assert_eq!(extract(&decoded).unwrap(), extract(&min).unwrap());

    let short = serde_json::from_str::<HeightFunction>(r#"{"order":2,"heights":[1]}"#);
    assert!(short.is_err());
    let broken = r#"{"order":2,"heights":[1,2,3,2,5,2,3,2,1]}"#;
    assert!(serde_json::from_str::<HeightFunction>(broken).is_err());
}

#[test]
fn from_heights_flags_corrupted_heights() {
    let order = Order::new(3).unwrap();
    let min = HeightFunction::minimal(order);
    let mut heights = min.heights().to_vec();
    // (1, 1) jumps by four, breaking the unit-step condition.
    heights[5] += 4;
    let err = HeightFunction::from_heights(order, heights).unwrap_err();
    assert!(matches!(err, AsmError::InvariantViolation(_)));
}

#[test]
fn serde_rejects_invalid_matrices() {
    let good = AlternatingSignMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();
    let json = serde_json::to_string(&good).unwrap();
    assert_eq!(json, r#"{"order":2,"rows":[[0,1],[1,0]]}"#);
    let decoded: AlternatingSignMatrix = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, good);

    let bad = r#"{"order":2,"rows":[[1,1],[0,0]]}"#;
    assert!(serde_json::from_str::<AlternatingSignMatrix>(bad).is_err());
    let mismatched = r#"{"order":3,"rows":[[0,1],[1,0]]}"#;
    assert!(serde_json::from_str::<AlternatingSignMatrix>(mismatched).is_err());
}

#[test]
fn empty_matrix_is_an_invalid_size() {
    let err = AlternatingSignMatrix::from_rows(Vec::new()).unwrap_err();
    assert!(matches!(err, AsmError::InvalidSize(_)));
}
