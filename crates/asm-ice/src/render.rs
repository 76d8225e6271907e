//! Plain-text renderings shared by heights, corner sums and matrices.

use std::fmt::Display;

/// Right-aligns every entry to a common width, one row per line.
pub fn grid<'a, T, R>(rows: R) -> String
where
    T: Display + 'a,
    R: IntoIterator<Item = &'a [T]>,
{
    let cells: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    let width = cells
        .iter()
        .flatten()
        .map(String::len)
        .max()
        .unwrap_or(1)
        .max(2);
    let mut out = String::new();
    for row in &cells {
        let line = row
            .iter()
            .map(|cell| format!("{cell:>width$}"))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Renders `+1` as `+`, `-1` as `-` and zero as a blank.
pub fn signs<'a, R>(rows: R) -> String
where
    R: IntoIterator<Item = &'a [i8]>,
{
    let mut out = String::new();
    for row in rows {
        let line: String = row
            .iter()
            .map(|&e| match e.signum() {
                1 => "+ ",
                -1 => "- ",
                _ => "  ",
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Renders owned rows such as corner sums.
pub fn owned_grid<T: Display>(rows: &[Vec<T>]) -> String {
    grid(rows.iter().map(Vec::as_slice))
}
