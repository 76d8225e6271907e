use std::fs;
use std::path::{Path, PathBuf};

use asm_core::{AsmError, RunProvenance, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::config::CftpConfig;

/// Schema of the manifest written next to each sample.
pub const MANIFEST_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Structured manifest describing a completed sampling run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleManifest {
    /// Manifest schema version.
    pub schema_version: SchemaVersion,
    /// Configuration used for the run.
    pub config: CftpConfig,
    /// Matrix order.
    pub order: usize,
    /// Seed label captured from the configuration.
    pub seed_label: Option<String>,
    /// Depth at which the chains coalesced.
    pub coalescence_depth: u64,
    /// Number of attempts, including the coalescing one.
    pub attempts: usize,
    /// Time steps simulated per chain over all attempts.
    pub total_steps: u64,
    /// Matrix text file (relative to the run directory).
    pub matrix_file: Option<PathBuf>,
    /// Metrics file (relative to the run directory).
    pub metrics_file: Option<PathBuf>,
    /// Hashes, seed, timestamp and tool versions.
    pub provenance: RunProvenance,
}

impl SampleManifest {
    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), AsmError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AsmError::io("manifest-mkdir", err, parent))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| AsmError::io("manifest-serialize", err, path))?;
        fs::write(path, json).map_err(|err| AsmError::io("manifest-write", err, path))
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, AsmError> {
        let contents =
            fs::read_to_string(path).map_err(|err| AsmError::io("manifest-read", err, path))?;
        serde_json::from_str(&contents).map_err(|err| AsmError::io("manifest-parse", err, path))
    }
}
