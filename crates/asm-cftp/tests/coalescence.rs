use asm_cftp::{extremal, run_attempt, sample, CftpConfig, ChainPair, Schedule};
use asm_core::{AsmError, BitStream, Order};
use asm_ice::{extract, Extreme};
use proptest::prelude::*;

#[test]
fn order_one_terminates_at_depth_one() {
    let summary = sample(1, 42, &CftpConfig::default()).unwrap();
    assert_eq!(summary.coalescence_depth, 1);
    assert_eq!(summary.attempts.len(), 1);
    assert_eq!(summary.total_steps, 1);
    assert_eq!(summary.matrix.to_text(), " 1\n");
    assert_eq!(summary.matrix.get(0, 0), 1);
}

#[test]
fn order_two_coalesces_in_one_step() {
    for seed in 0..32 {
        let summary = sample(2, seed, &CftpConfig::default()).unwrap();
        assert_eq!(summary.coalescence_depth, 1);
        assert!(summary.matrix.is_permutation());
    }
}

#[test]
fn invalid_orders_fail_before_sampling() {
    let err = sample(0, 1, &CftpConfig::default()).unwrap_err();
    assert!(matches!(err, AsmError::InvalidSize(_)));
    let err = sample(asm_core::MAX_ORDER + 1, 1, &CftpConfig::default()).unwrap_err();
    assert!(matches!(err, AsmError::InvalidSize(_)));
}

#[test]
fn depth_ceiling_is_reported_not_truncated() {
    let config = CftpConfig {
        initial_depth: 1,
        max_depth: 2,
        ..CftpConfig::default()
    };
    let err = sample(8, 5, &config).unwrap_err();
    match err {
        AsmError::ResourceExhausted(info) => {
            assert_eq!(info.code, "depth-ceiling");
            assert_eq!(info.context.get("depth").map(String::as_str), Some("2"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn depths_beyond_the_time_axis_are_rejected() {
    let order = Order::new(3).unwrap();
    let stream = BitStream::new(1);
    let err = run_attempt(order, &stream, 1 << 63, Schedule::default()).unwrap_err();
    assert!(matches!(err, AsmError::Config(_)));
    assert_eq!(err.info().code, "depth-range");
    assert!(run_attempt(order, &stream, u64::MAX, Schedule::default()).is_err());

    let config = CftpConfig {
        max_depth: u64::MAX,
        ..CftpConfig::default()
    };
    let err = sample(3, 1, &config).unwrap_err();
    assert_eq!(err.info().code, "max-depth-range");
}

#[test]
fn extremes_are_available_without_sampling() {
    let min = extremal(4, Extreme::Min).unwrap();
    let max = extremal(4, Extreme::Max).unwrap();
    let low = extract(&min).unwrap();
    let high = extract(&max).unwrap();
    assert!(low.is_permutation());
    assert!(high.is_permutation());
    assert_ne!(low, high);
    assert!(min.is_below(&max));
    assert!(extremal(0, Extreme::Min).is_err());
}

#[test]
fn extremal_pair_volume_matches_order_two() {
    let pair = ChainPair::extremal(Order::new(2).unwrap());
    assert_eq!(pair.volume_difference(), 2);
    assert!(!pair.is_coalesced());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn coalesced_value_survives_deeper_attempts(n in 1usize..7, seed in any::<u64>()) {
        let summary = sample(n, seed, &CftpConfig::default()).unwrap();
        let order = Order::new(n).unwrap();
        let stream = BitStream::new(seed);
        for factor in [2u64, 4] {
            let pair = run_attempt(order, &stream, summary.coalescence_depth * factor, Schedule::default()).unwrap();
            prop_assert!(pair.is_coalesced());
            prop_assert_eq!(&pair.upper, &summary.heights);
        }
    }

    #[test]
    fn chains_stay_ordered_at_every_depth(n in 1usize..7, seed in any::<u64>(), log_depth in 0u32..6) {
        let order = Order::new(n).unwrap();
        let pair = run_attempt(order, &BitStream::new(seed), 1 << log_depth, Schedule::default()).unwrap();
        prop_assert!(pair.lower.is_below(&pair.upper));
        prop_assert!(pair.volume_difference() >= 0);
    }

    #[test]
    fn samples_are_alternating_sign_matrices(n in 1usize..9, seed in any::<u64>()) {
        let summary = sample(n, seed, &CftpConfig::default()).unwrap();
        summary.matrix.validate().unwrap();
        summary.heights.validate().unwrap();
        prop_assert_eq!(summary.matrix.order().get(), n);
        prop_assert!(summary.attempts.last().unwrap().coalesced);
        prop_assert!(summary.attempts.iter().rev().skip(1).all(|a| !a.coalesced));
    }
}
