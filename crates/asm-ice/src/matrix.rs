//! Alternating sign matrices and their extraction from height functions.

use asm_core::{AsmError, ErrorInfo, Order};
use serde::{Deserialize, Serialize};

use crate::hash::canonical_matrix_hash;
use crate::height::HeightFunction;
use crate::render;

/// Square matrix over `{-1, 0, 1}` whose rows and columns alternate in sign,
/// starting and ending with `+1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct AlternatingSignMatrix {
    order: Order,
    entries: Vec<i8>,
}

#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    order: usize,
    rows: Vec<Vec<i8>>,
}

impl TryFrom<MatrixRepr> for AlternatingSignMatrix {
    type Error = AsmError;

    fn try_from(repr: MatrixRepr) -> Result<Self, Self::Error> {
        let matrix = AlternatingSignMatrix::from_rows(repr.rows)?;
        if matrix.order.get() != repr.order {
            return Err(AsmError::Serde(
                ErrorInfo::new("matrix-order", "declared order does not match the rows")
                    .with_context("declared", repr.order)
                    .with_context("rows", matrix.order),
            ));
        }
        Ok(matrix)
    }
}

impl From<AlternatingSignMatrix> for MatrixRepr {
    fn from(matrix: AlternatingSignMatrix) -> Self {
        Self {
            order: matrix.order.get(),
            rows: matrix.rows().map(<[i8]>::to_vec).collect(),
        }
    }
}

/// Reads the matrix encoded by a height function and checks it.
///
/// Entry `(i, j)` is `(h[i][j+1] + h[i+1][j] - h[i+1][j+1] - h[i][j]) / 2`.
/// A failed check means the configuration itself is broken and is reported
/// as [`AsmError::InvariantViolation`].
pub fn extract(config: &HeightFunction) -> Result<AlternatingSignMatrix, AsmError> {
    let order = config.order();
    let n = order.get();
    if config.heights().len() != order.sites() {
        return Err(AsmError::InvariantViolation(
            ErrorInfo::new("height-shape", "height array has the wrong number of sites")
                .with_context("expected", order.sites())
                .with_context("actual", config.heights().len()),
        ));
    }
    let mut entries = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let twice = config.get(i, j + 1) + config.get(i + 1, j)
                - config.get(i + 1, j + 1)
                - config.get(i, j);
            if twice % 2 != 0 || !(-2..=2).contains(&twice) {
                return Err(AsmError::InvariantViolation(
                    ErrorInfo::new("entry-range", "height function yields an entry outside {-1,0,1}")
                        .with_context("row", i)
                        .with_context("col", j)
                        .with_context("twice_entry", twice),
                ));
            }
            entries.push((twice / 2) as i8);
        }
    }
    let matrix = AlternatingSignMatrix { order, entries };
    matrix.validate()?;
    Ok(matrix)
}

impl AlternatingSignMatrix {
    /// Builds a matrix from explicit rows and validates it.
    pub fn from_rows(rows: Vec<Vec<i8>>) -> Result<Self, AsmError> {
        let order = Order::new(rows.len())?;
        let n = order.get();
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(AsmError::InvariantViolation(
                ErrorInfo::new("matrix-shape", "matrix is not square")
                    .with_context("row", index)
                    .with_context("len", row.len())
                    .with_context("order", n),
            ));
        }
        let matrix = Self {
            order,
            entries: rows.into_iter().flatten().collect(),
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Checks entries and the alternating condition on every row and column.
    pub fn validate(&self) -> Result<(), AsmError> {
        let n = self.order.get();
        if let Some(position) = self.entries.iter().position(|e| !(-1..=1).contains(e)) {
            return Err(AsmError::InvariantViolation(
                ErrorInfo::new("entry-range", "entries must lie in {-1,0,1}")
                    .with_context("row", position / n)
                    .with_context("col", position % n),
            ));
        }
        for line in 0..n {
            check_line(self.row(line), "row", line)?;
            check_line((0..n).map(|i| self.get(i, line)), "col", line)?;
        }
        Ok(())
    }

    /// Matrix order `n`.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Entry at row `i`, column `j`.
    ///
    /// # Panics
    /// Panics if the indices are out of range.
    pub fn get(&self, i: usize, j: usize) -> i8 {
        self.entries[i * self.order.get() + j]
    }

    fn row(&self, i: usize) -> impl Iterator<Item = i8> + '_ {
        let n = self.order.get();
        self.entries[i * n..(i + 1) * n].iter().copied()
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[i8]> + '_ {
        self.entries.chunks(self.order.get())
    }

    /// Number of `-1` entries.
    pub fn count_negative(&self) -> usize {
        self.entries.iter().filter(|&&e| e < 0).count()
    }

    /// True when the matrix has no `-1` entry.
    pub fn is_permutation(&self) -> bool {
        self.count_negative() == 0
    }

    /// Whitespace separated rows of integers, one row per line.
    pub fn to_text(&self) -> String {
        render::grid(self.rows())
    }

    /// `+`, `-` and blanks, one row per line.
    pub fn to_pretty(&self) -> String {
        render::signs(self.rows())
    }

    /// Canonical SHA-256 hash, hex encoded.
    pub fn canonical_hash(&self) -> String {
        canonical_matrix_hash(self)
    }
}

fn check_line(values: impl Iterator<Item = i8>, kind: &str, index: usize) -> Result<(), AsmError> {
    let mut prefix = 0i32;
    for (position, value) in values.enumerate() {
        prefix += i32::from(value);
        if !(0..=1).contains(&prefix) {
            return Err(AsmError::InvariantViolation(
                ErrorInfo::new("sign-alternation", "nonzero entries do not alternate from +1")
                    .with_context(kind, index)
                    .with_context("position", position)
                    .with_context("prefix_sum", prefix),
            ));
        }
    }
    if prefix != 1 {
        return Err(AsmError::InvariantViolation(
            ErrorInfo::new("line-sum", "row or column does not sum to one")
                .with_context(kind, index)
                .with_context("sum", prefix),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_extract_to_permutation_matrices() {
        let order = Order::new(3).unwrap();
        let identity = extract(&HeightFunction::minimal(order)).unwrap();
        let anti = extract(&HeightFunction::maximal(order)).unwrap();
        assert_eq!(identity.to_text(), " 1  0  0\n 0  1  0\n 0  0  1\n");
        assert_eq!(anti.to_text(), " 0  0  1\n 0  1  0\n 1  0  0\n");
    }

    #[test]
    fn rejects_non_alternating_rows() {
        let err = AlternatingSignMatrix::from_rows(vec![vec![1, 0], vec![1, 0]]).unwrap_err();
        assert_eq!(err.info().code, "sign-alternation");
        let err = AlternatingSignMatrix::from_rows(vec![vec![0, 1], vec![1, -1]]).unwrap_err();
        assert!(matches!(err, AsmError::InvariantViolation(_)));
    }

    #[test]
    fn minus_one_in_the_middle_round_trips() {
        let rows = vec![vec![0, 1, 0], vec![1, -1, 1], vec![0, 1, 0]];
        let matrix = AlternatingSignMatrix::from_rows(rows).unwrap();
        assert_eq!(matrix.count_negative(), 1);
        let heights = HeightFunction::from_asm(&matrix);
        heights.validate().unwrap();
        assert_eq!(extract(&heights).unwrap(), matrix);
        assert_eq!(matrix.to_pretty(), "  +\n+ - +\n  +\n");
    }

    fn identity_heights(n: usize) -> (Order, Vec<i32>) {
        let order = Order::new(n).unwrap();
        (order, HeightFunction::minimal(order).heights().to_vec())
    }

    #[test]
    fn extraction_rejects_out_of_range_entries() {
        let (order, mut heights) = identity_heights(2);
        heights[4] = 5;
        let err = extract(&HeightFunction::from_raw(order, heights)).unwrap_err();
        assert!(matches!(err, AsmError::InvariantViolation(_)));
        assert_eq!(err.info().code, "entry-range");
        assert_eq!(err.info().context.get("row").map(String::as_str), Some("0"));
    }

    #[test]
    fn extraction_rejects_broken_alternation() {
        // Lowering (1, 2) to zero gives rows [1, 1, -1], [0, 0, 1], ...
        let (order, mut heights) = identity_heights(3);
        heights[6] = 0;
        let err = extract(&HeightFunction::from_raw(order, heights)).unwrap_err();
        assert!(matches!(err, AsmError::InvariantViolation(_)));
        assert_eq!(err.info().code, "sign-alternation");
    }

    #[test]
    fn extraction_rejects_short_height_arrays() {
        let order = Order::new(2).unwrap();
        let err = extract(&HeightFunction::from_raw(order, vec![1])).unwrap_err();
        assert_eq!(err.info().code, "height-shape");
        assert_eq!(err.info().context.get("expected").map(String::as_str), Some("9"));
    }
}
