//! Height functions of square ice with domain-wall boundary.
//!
//! An order-`n` configuration is stored as the `(n+1) x (n+1)` height array
//! `h`, row-major. Adjacent heights differ by exactly one and the outer
//! rows and columns are pinned to the domain-wall values, so every valid
//! array lies between [`HeightFunction::minimal`] and
//! [`HeightFunction::maximal`] pointwise.

use std::cmp::Ordering;

use asm_core::{AsmError, ErrorInfo, Order};
use serde::{Deserialize, Serialize};

use crate::matrix::AlternatingSignMatrix;
use crate::render;

/// Selects one of the two extremal configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Extreme {
    /// Pointwise minimum, the identity matrix.
    Min,
    /// Pointwise maximum, the anti-diagonal permutation matrix.
    Max,
}

/// Square ice configuration encoded by its height function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "HeightRepr", into = "HeightRepr")]
pub struct HeightFunction {
    order: Order,
    heights: Vec<i32>,
}

#[derive(Serialize, Deserialize)]
struct HeightRepr {
    order: Order,
    heights: Vec<i32>,
}

impl TryFrom<HeightRepr> for HeightFunction {
    type Error = AsmError;

    fn try_from(repr: HeightRepr) -> Result<Self, Self::Error> {
        HeightFunction::from_heights(repr.order, repr.heights)
    }
}

impl From<HeightFunction> for HeightRepr {
    fn from(config: HeightFunction) -> Self {
        Self {
            order: config.order,
            heights: config.heights,
        }
    }
}

impl HeightFunction {
    /// Pointwise minimal configuration, `h[r][c] = |r - c| + 1`.
    pub fn minimal(order: Order) -> Self {
        Self::tabulate(order, |r, c| r.abs_diff(c) as i32 + 1)
    }

    /// Pointwise maximal configuration, `h[r][c] = (n + 1) - |n - r - c|`.
    pub fn maximal(order: Order) -> Self {
        let n = order.get() as i64;
        let side = order.side() as i64;
        Self::tabulate(order, |r, c| (side - (n - r as i64 - c as i64).abs()) as i32)
    }

    /// Returns the requested extremal configuration.
    pub fn extremal(order: Order, extreme: Extreme) -> Self {
        match extreme {
            Extreme::Min => Self::minimal(order),
            Extreme::Max => Self::maximal(order),
        }
    }

    /// Wraps a raw row-major height array after validating it.
    pub fn from_heights(order: Order, heights: Vec<i32>) -> Result<Self, AsmError> {
        if heights.len() != order.sites() {
            return Err(AsmError::InvariantViolation(
                ErrorInfo::new("height-shape", "height array has the wrong number of sites")
                    .with_context("expected", order.sites())
                    .with_context("actual", heights.len()),
            ));
        }
        let candidate = Self { order, heights };
        candidate.validate()?;
        Ok(candidate)
    }

    /// Rebuilds the height function of an alternating sign matrix.
    ///
    /// Uses `h[r][c] = r + c + 1 - 2 * s[r][c]` where `s` is the corner sum of
    /// the entries strictly above and to the left of `(r, c)`.
    pub fn from_asm(matrix: &AlternatingSignMatrix) -> Self {
        let order = matrix.order();
        let n = order.get();
        let side = order.side();
        let mut corner = vec![0i32; side * side];
        for r in 1..side {
            for c in 1..side {
                corner[r * side + c] = i32::from(matrix.get(r - 1, c - 1))
                    + corner[(r - 1) * side + c]
                    + corner[r * side + c - 1]
                    - corner[(r - 1) * side + c - 1];
            }
        }
        debug_assert_eq!(corner[n * side + n], n as i32);
        Self::tabulate(order, |r, c| (r + c + 1) as i32 - 2 * corner[r * side + c])
    }

    #[cfg(test)]
    pub(crate) fn from_raw(order: Order, heights: Vec<i32>) -> Self {
        Self { order, heights }
    }

    fn tabulate(order: Order, f: impl Fn(usize, usize) -> i32) -> Self {
        let side = order.side();
        let mut heights = Vec::with_capacity(order.sites());
        for r in 0..side {
            for c in 0..side {
                heights.push(f(r, c));
            }
        }
        Self { order, heights }
    }

    /// Order `n` of the matrix this configuration encodes.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Side length of the height grid, `n + 1`.
    pub fn side(&self) -> usize {
        self.order.side()
    }

    /// Height at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the grid.
    pub fn get(&self, r: usize, c: usize) -> i32 {
        self.heights[r * self.side() + c]
    }

    pub(crate) fn set(&mut self, r: usize, c: usize, value: i32) {
        let side = self.side();
        self.heights[r * side + c] = value;
    }

    /// Raw row-major heights.
    pub fn heights(&self) -> &[i32] {
        &self.heights
    }

    pub(crate) fn heights_mut(&mut self) -> &mut [i32] {
        &mut self.heights
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.heights.chunks(self.side())
    }

    /// Checks the domain-wall boundary and the unit-step condition.
    pub fn validate(&self) -> Result<(), AsmError> {
        let side = self.side();
        let n = self.order.get() as i32;
        for k in 0..side {
            let k_i = k as i32;
            let pinned = [
                (0, k, k_i + 1),
                (k, 0, k_i + 1),
                (side - 1, k, n + 1 - k_i),
                (k, side - 1, n + 1 - k_i),
            ];
            for (r, c, expected) in pinned {
                if self.get(r, c) != expected {
                    return Err(AsmError::InvariantViolation(
                        ErrorInfo::new("height-boundary", "boundary height differs from domain wall")
                            .with_context("row", r)
                            .with_context("col", c)
                            .with_context("expected", expected)
                            .with_context("actual", self.get(r, c)),
                    ));
                }
            }
        }
        for r in 0..side {
            for c in 0..side {
                let here = self.get(r, c);
                let right = (c + 1 < side).then(|| self.get(r, c + 1));
                let below = (r + 1 < side).then(|| self.get(r + 1, c));
                for neighbour in [right, below].into_iter().flatten() {
                    if (here - neighbour).abs() != 1 {
                        return Err(AsmError::InvariantViolation(
                            ErrorInfo::new("height-step", "adjacent heights must differ by one")
                                .with_context("row", r)
                                .with_context("col", c),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns true when `self <= other` at every site.
    pub fn is_below(&self, other: &Self) -> bool {
        self.order == other.order
            && self
                .heights
                .iter()
                .zip(&other.heights)
                .all(|(lower, upper)| lower <= upper)
    }

    /// Pointwise maximum of two configurations of the same order.
    pub fn join(&self, other: &Self) -> Result<Self, AsmError> {
        self.combine(other, i32::max)
    }

    /// Pointwise minimum of two configurations of the same order.
    pub fn meet(&self, other: &Self) -> Result<Self, AsmError> {
        self.combine(other, i32::min)
    }

    fn combine(&self, other: &Self, pick: fn(i32, i32) -> i32) -> Result<Self, AsmError> {
        ensure_same_order(self, other)?;
        Ok(Self {
            order: self.order,
            heights: self
                .heights
                .iter()
                .zip(&other.heights)
                .map(|(&a, &b)| pick(a, b))
                .collect(),
        })
    }

    /// Sum of `upper - lower` over all sites.
    ///
    /// For `lower <= upper` this is zero exactly when the two coincide.
    pub fn volume_difference(lower: &Self, upper: &Self) -> i64 {
        lower
            .heights
            .iter()
            .zip(&upper.heights)
            .map(|(&l, &u)| i64::from(u) - i64::from(l))
            .sum()
    }

    /// Corner sum matrix, `s[r][c] = (r + c + 1 - h[r][c]) / 2`.
    pub fn corner_sums(&self) -> Vec<Vec<i32>> {
        self.rows()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, &h)| (r as i32 + c as i32 + 1 - h) / 2)
                    .collect()
            })
            .collect()
    }

    /// Renders the heights, one row per line.
    pub fn to_text(&self) -> String {
        render::grid(self.rows())
    }
}

fn ensure_same_order(a: &HeightFunction, b: &HeightFunction) -> Result<(), AsmError> {
    if a.order != b.order {
        return Err(AsmError::InvariantViolation(
            ErrorInfo::new("order-mismatch", "configurations have different orders")
                .with_context("left", a.order)
                .with_context("right", b.order),
        ));
    }
    Ok(())
}

impl PartialOrd for HeightFunction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.is_below(other), other.is_below(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(n: usize) -> Order {
        Order::new(n).unwrap()
    }

    #[test]
    fn extremes_share_the_boundary() {
        for n in 1..8 {
            let min = HeightFunction::minimal(order(n));
            let max = HeightFunction::maximal(order(n));
            min.validate().unwrap();
            max.validate().unwrap();
            assert!(min <= max);
            let side = n + 1;
            for k in 0..side {
                assert_eq!(min.get(0, k), max.get(0, k));
                assert_eq!(min.get(k, 0), max.get(k, 0));
                assert_eq!(min.get(n, k), max.get(n, k));
                assert_eq!(min.get(k, n), max.get(k, n));
            }
        }
    }

    #[test]
    fn order_one_has_a_single_configuration() {
        let min = HeightFunction::minimal(order(1));
        let max = HeightFunction::maximal(order(1));
        assert_eq!(min, max);
        assert_eq!(min.heights(), &[1, 2, 2, 1]);
        assert_eq!(HeightFunction::volume_difference(&min, &max), 0);
    }

    #[test]
    fn volume_difference_for_order_two() {
        let min = HeightFunction::minimal(order(2));
        let max = HeightFunction::maximal(order(2));
        assert_eq!(min.get(1, 1), 1);
        assert_eq!(max.get(1, 1), 3);
        assert_eq!(HeightFunction::volume_difference(&min, &max), 2);
    }

    #[test]
    fn rejects_broken_boundary() {
        let mut heights = HeightFunction::minimal(order(3)).heights().to_vec();
        heights[1] += 2;
        let err = HeightFunction::from_heights(order(3), heights).unwrap_err();
        assert_eq!(err.info().code, "height-boundary");
    }

    #[test]
    fn corner_sums_of_identity() {
        let min = HeightFunction::minimal(order(2));
        assert_eq!(
            min.corner_sums(),
            vec![vec![0, 0, 0], vec![0, 1, 1], vec![0, 1, 2]]
        );
    }
}
