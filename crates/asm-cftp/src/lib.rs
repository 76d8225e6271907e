#![deny(missing_docs)]
#![doc = "Exact uniform sampling of alternating sign matrices by monotone coupling from the past."]

//! The two extremal height functions are advanced from time `-T` to `0`
//! with the same addressable bit stream. If they meet, the common state is
//! an exact uniform sample; otherwise `T` doubles and the run restarts from
//! fresh extremes, replaying the bits already used for the shared times.

/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic seed and time-index helpers.
pub mod determinism;
/// Doubling protocol and public `sample`/`run` entry points.
pub mod kernel;
/// Run manifest serialization helpers.
pub mod manifest;
/// Per-attempt progress records.
pub mod metrics;

pub use config::{CftpConfig, OutputConfig, SeedPolicy, MAX_INITIAL_DEPTH};
pub use kernel::{
    extremal, run, run_attempt, sample, sample_asm, CftpState, ChainPair, SampleSummary, Schedule,
};
pub use manifest::SampleManifest;
pub use metrics::{AttemptRecord, MetricsRecorder, VolumeSample};
