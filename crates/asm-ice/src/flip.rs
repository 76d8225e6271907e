//! The corner-flip update.
//!
//! A time step runs two checkerboard half-sweeps over the interior sites,
//! parity `(r + c) % 2 == 0` first. A site whose four neighbours share one
//! height is a local extreme and is reset to `neighbour + coin`, the coin
//! being the stream bit for `(t, r * (n + 1) + c)`. Every other site is
//! left alone, and boundary sites are never visited.
//!
//! Heights at sites of equal parity never neighbour one another, so within
//! a half-sweep each update only reads heights the half-sweep does not
//! write. That makes the visiting order irrelevant and lets
//! [`apply_step_parallel`] split the work across threads.
//!
//! The rule is monotone. If `A <= B` and `A` flips at a site whose
//! neighbours all equal `a`, then either `B` flips with neighbours `b >= a`
//! (so `a + coin <= b + coin`), or `B` is not flippable and, having parity
//! of `a + 1` while sitting above `a - 1`, already holds at least `a + 1`.
//! The symmetric argument covers `B` flipping alone.

use asm_core::{BitStream, StepBits};
use rayon::prelude::*;

use crate::height::HeightFunction;

/// Returns true when the interior site `(r, c)` is a local extreme.
///
/// # Panics
/// Panics if `(r, c)` is on the boundary.
pub fn is_flippable(config: &HeightFunction, r: usize, c: usize) -> bool {
    let up = config.get(r - 1, c);
    up == config.get(r, c + 1) && up == config.get(r + 1, c) && up == config.get(r, c - 1)
}

/// Applies the corner flip at `(r, c)` with the given `coin` of `+1` or `-1`.
///
/// Returns whether the height changed.
pub fn flip_site(config: &mut HeightFunction, r: usize, c: usize, coin: i32) -> bool {
    if !is_flippable(config, r, c) {
        return false;
    }
    let updated = config.get(r - 1, c) + coin;
    let changed = updated != config.get(r, c);
    config.set(r, c, updated);
    changed
}

/// Runs one half-sweep over interior sites of the given parity.
pub fn half_sweep(config: &mut HeightFunction, bits: &StepBits, parity: usize) {
    let side = config.side();
    for r in 1..side.saturating_sub(1) {
        let first = if (r + 1) % 2 == parity { 1 } else { 2 };
        for c in (first..side - 1).step_by(2) {
            flip_site(config, r, c, bits.coin(r * side + c));
        }
    }
}

/// Applies a full time step with precomputed bits.
pub fn apply_step(config: &mut HeightFunction, bits: &StepBits) {
    half_sweep(config, bits, 0);
    half_sweep(config, bits, 1);
}

/// Applies the time step `t` of `stream` to every site of `config`.
pub fn apply_update(config: &mut HeightFunction, stream: &BitStream, t: i64) {
    let bits = stream.step(t, config.order().sites());
    apply_step(config, &bits);
}

/// Advances `config` through times `from..to` in increasing order.
pub fn evolve(config: &mut HeightFunction, stream: &BitStream, from: i64, to: i64) {
    for t in from..to {
        apply_update(config, stream, t);
    }
}

/// Row-parallel variant of [`apply_step`] with identical results.
///
/// Each half-sweep reads a snapshot of the previous heights and writes the
/// new rows, so threads never observe a partially updated half-sweep.
pub fn apply_step_parallel(config: &mut HeightFunction, bits: &StepBits) {
    for parity in 0..2 {
        let side = config.side();
        if side < 3 {
            return;
        }
        let snapshot = config.heights().to_vec();
        config
            .heights_mut()
            .par_chunks_mut(side)
            .enumerate()
            .filter(|(r, _)| *r >= 1 && *r + 1 < side)
            .for_each(|(r, row)| {
                let at = |rr: usize, cc: usize| snapshot[rr * side + cc];
                for (c, cell) in row.iter_mut().enumerate().take(side - 1).skip(1) {
                    if (r + c) % 2 != parity {
                        continue;
                    }
                    let up = at(r - 1, c);
                    if up == at(r + 1, c) && up == at(r, c - 1) && up == at(r, c + 1) {
                        *cell = up + bits.coin(r * side + c);
                    }
                }
            });
    }
}

/// Number of interior sites that are currently flippable.
pub fn count_flippable(config: &HeightFunction) -> usize {
    let side = config.side();
    (1..side.saturating_sub(1))
        .flat_map(|r| (1..side - 1).map(move |c| (r, c)))
        .filter(|&(r, c)| is_flippable(config, r, c))
        .count()
}
