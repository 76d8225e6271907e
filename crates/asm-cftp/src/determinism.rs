use asm_core::{derive_labelled_seed, entropy_seed, BitStream};
use tracing::info;

use crate::config::SeedPolicy;

/// Resolves the master seed of a run, drawing one from entropy when unset.
pub fn resolve_seed(policy: &SeedPolicy) -> u64 {
    let master = match policy.master_seed {
        Some(seed) => seed,
        None => {
            let seed = entropy_seed();
            info!(seed, "using random seed");
            seed
        }
    };
    match &policy.label {
        Some(label) => derive_labelled_seed(master, label),
        None => master,
    }
}

/// Bit stream driving every attempt of a run seeded with `seed`.
pub fn stream_for(seed: u64) -> BitStream {
    BitStream::new(seed)
}

/// Times `-depth, -depth/2, ..., -1` at which an attempt crosses a power of two.
///
/// `depth` must be a power of two.
pub fn dyadic_boundaries(depth: u64) -> Vec<i64> {
    debug_assert!(depth.is_power_of_two());
    let mut times = Vec::with_capacity(depth.trailing_zeros() as usize + 1);
    let mut span = depth;
    while span > 0 {
        times.push(-(span as i64));
        span /= 2;
    }
    times
}
