use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{AsmError, ErrorInfo};

/// Largest supported matrix order.
///
/// The sampler holds two `(n+1)^2` height arrays and expected coalescence
/// work grows faster than `n^3`, so larger orders are rejected up front.
pub const MAX_ORDER: usize = 2048;

/// Validated order `n` of an `n x n` alternating sign matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Order(usize);

impl Order {
    /// Validates `n` against `1..=MAX_ORDER`.
    pub fn new(n: usize) -> Result<Self, AsmError> {
        if n == 0 {
            return Err(AsmError::InvalidSize(
                ErrorInfo::new("order-zero", "order must be at least 1").with_context("order", n),
            ));
        }
        if n > MAX_ORDER {
            return Err(AsmError::InvalidSize(
                ErrorInfo::new("order-too-large", "order exceeds the supported bound")
                    .with_context("order", n)
                    .with_context("max_order", MAX_ORDER)
                    .with_hint("sample smaller matrices or raise MAX_ORDER"),
            ));
        }
        Ok(Self(n))
    }

    /// Returns the matrix order `n`.
    pub fn get(self) -> usize {
        self.0
    }

    /// Side length of the height function grid, `n + 1`.
    pub fn side(self) -> usize {
        self.0 + 1
    }

    /// Number of height function sites, `(n + 1)^2`.
    pub fn sites(self) -> usize {
        self.side() * self.side()
    }
}

impl TryFrom<usize> for Order {
    type Error = AsmError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Order::new(value)
    }
}

impl From<Order> for usize {
    fn from(order: Order) -> Self {
        order.0
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
