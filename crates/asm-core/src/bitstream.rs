//! Addressable random bit stream consumed by the coupled chains.
//!
//! Every bit is a pure function of `(seed, t, site)`. Nothing is cached or
//! advanced, so an attempt started at depth `-2T` replays exactly the bits an
//! attempt at depth `-T` used for the times they share, and any number of
//! threads may read the stream at once.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;

/// Second SipHash key, fixed so the stream layout stays stable across releases.
const STREAM_KEY: u64 = 0x6173_6d2d_6963_6531; // "asm-ice1"

const WORD_BITS: usize = 64;

/// Counter-based source of coin flips keyed by a master seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitStream {
    seed: u64,
}

impl BitStream {
    /// Creates the stream for `seed`.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed the stream was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the 64-bit word holding sites `64 * word .. 64 * word + 63` at time `t`.
    pub fn word(&self, t: i64, word: u64) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(self.seed, STREAM_KEY);
        hasher.write_i64(t);
        hasher.write_u64(word);
        hasher.finish()
    }

    /// Returns the bit drawn for `site` at time `t`.
    pub fn bit_at(&self, t: i64, site: usize) -> bool {
        let word = self.word(t, (site / WORD_BITS) as u64);
        (word >> (site % WORD_BITS)) & 1 == 1
    }

    /// Returns `+1` when the bit at `(t, site)` is set and `-1` otherwise.
    pub fn coin(&self, t: i64, site: usize) -> i32 {
        if self.bit_at(t, site) {
            1
        } else {
            -1
        }
    }

    /// Precomputes every bit of time step `t` for sites `0..sites`.
    pub fn step(&self, t: i64, sites: usize) -> StepBits {
        let words = sites.div_ceil(WORD_BITS);
        StepBits {
            time: t,
            words: (0..words as u64).map(|w| self.word(t, w)).collect(),
        }
    }
}

/// Bits of a single time step, laid out as the stream's words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepBits {
    time: i64,
    words: Vec<u64>,
}

impl StepBits {
    /// Time index the bits belong to.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Number of sites covered (rounded up to whole words).
    pub fn capacity(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Bit for `site`; identical to [`BitStream::bit_at`] for the same time.
    ///
    /// # Panics
    /// Panics if `site` is beyond [`StepBits::capacity`].
    pub fn bit(&self, site: usize) -> bool {
        (self.words[site / WORD_BITS] >> (site % WORD_BITS)) & 1 == 1
    }

    /// `+1` or `-1` for `site`.
    pub fn coin(&self, site: usize) -> i32 {
        if self.bit(site) {
            1
        } else {
            -1
        }
    }
}
