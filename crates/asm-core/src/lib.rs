#![deny(missing_docs)]
#![doc = "Core types, errors and addressable randomness for the ASM sampler."]

pub mod bitstream;
pub mod errors;
pub mod provenance;
pub mod rng;
mod types;

pub use bitstream::{BitStream, StepBits};
pub use errors::{AsmError, ErrorInfo};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_labelled_seed, derive_substream_seed, entropy_seed};
pub use types::{Order, MAX_ORDER};
