#![deny(missing_docs)]
#![doc = "Square ice height functions, the monotone corner-flip update and alternating sign matrix extraction."]

/// Corner-flip update rule and time-step drivers.
pub mod flip;
/// Canonical hashing helpers.
pub mod hash;
/// Height function representation and lattice operations.
pub mod height;
/// Alternating sign matrices and extraction.
pub mod matrix;
/// Text renderings.
pub mod render;

pub use flip::{apply_step, apply_step_parallel, apply_update, evolve, flip_site, is_flippable};
pub use hash::{canonical_height_hash, canonical_json_hash, canonical_matrix_hash};
pub use height::{Extreme, HeightFunction};
pub use matrix::{extract, AlternatingSignMatrix};
