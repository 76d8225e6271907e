//! Seed derivation helpers.
//!
//! Substreams are derived by hashing `(master_seed, substream_id)` with
//! SipHash-1-3 under fixed zero keys, which is stable across platforms.
//! The chains themselves never draw from a sequential generator: their bits
//! come from [`crate::BitStream`].

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}

/// Derives the seed for a labelled substream (`label` hashed byte-wise).
pub fn derive_labelled_seed(master_seed: u64, label: &str) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write(label.as_bytes());
    derive_substream_seed(master_seed, hasher.finish())
}

/// Draws a fresh master seed from process entropy.
pub fn entropy_seed() -> u64 {
    StdRng::from_entropy().next_u64()
}
