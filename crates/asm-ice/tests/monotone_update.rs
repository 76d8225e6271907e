use asm_core::{BitStream, Order};
use asm_ice::{apply_update, evolve, Extreme, HeightFunction};
use proptest::prelude::*;

fn random_config(order: Order, start: Extreme, seed: u64, steps: i64) -> HeightFunction {
    let mut config = HeightFunction::extremal(order, start);
    evolve(&mut config, &BitStream::new(seed), 0, steps);
    config
}

fn extreme() -> impl Strategy<Value = Extreme> {
    prop_oneof![Just(Extreme::Min), Just(Extreme::Max)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn update_preserves_pointwise_order(
        n in 1usize..9,
        seed_a in any::<u64>(),
        seed_c in any::<u64>(),
        start_a in extreme(),
        start_c in extreme(),
        steps in 0i64..40,
        stream_seed in any::<u64>(),
        t in -1_000i64..0,
    ) {
        let order = Order::new(n).unwrap();
        let a = random_config(order, start_a, seed_a, steps);
        let c = random_config(order, start_c, seed_c, steps);
        let b = a.join(&c).unwrap();
        prop_assert!(a <= b);

        let stream = BitStream::new(stream_seed);
        let mut a_next = a.clone();
        let mut b_next = b.clone();
        apply_update(&mut a_next, &stream, t);
        apply_update(&mut b_next, &stream, t);
        prop_assert!(a_next.is_below(&b_next));
        a_next.validate().unwrap();
        b_next.validate().unwrap();
    }

    #[test]
    fn join_and_meet_stay_valid(
        n in 1usize..9,
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
        steps in 0i64..40,
    ) {
        let order = Order::new(n).unwrap();
        let a = random_config(order, Extreme::Min, seed_a, steps);
        let b = random_config(order, Extreme::Max, seed_b, steps);
        let join = a.join(&b).unwrap();
        let meet = a.meet(&b).unwrap();
        join.validate().unwrap();
        meet.validate().unwrap();
        prop_assert!(meet <= a && a <= join);
        prop_assert!(meet <= b && b <= join);
        prop_assert!(HeightFunction::minimal(order) <= meet);
        prop_assert!(join <= HeightFunction::maximal(order));
    }

    #[test]
    fn update_is_deterministic(n in 1usize..9, seed in any::<u64>(), t in -500i64..0) {
        let order = Order::new(n).unwrap();
        let stream = BitStream::new(seed);
        let mut first = HeightFunction::maximal(order);
        let mut second = HeightFunction::maximal(order);
        apply_update(&mut first, &stream, t);
        apply_update(&mut second, &stream, t);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn mismatched_orders_are_rejected() {
    let a = HeightFunction::minimal(Order::new(2).unwrap());
    let b = HeightFunction::minimal(Order::new(3).unwrap());
    assert!(a.join(&b).is_err());
    assert!(!a.is_below(&b));
    assert_eq!(a.partial_cmp(&b), None);
}
