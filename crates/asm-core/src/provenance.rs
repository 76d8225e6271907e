//! Schema version and provenance stamped into sample manifests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version of a serialized payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Breaking changes.
    pub major: u32,
    /// Additive changes.
    pub minor: u32,
    /// Fixes.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

/// Where a sample came from: seed, hashes and the tools that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Canonical hash of the run configuration.
    pub config_hash: String,
    /// Canonical hash of the sampled matrix.
    pub matrix_hash: String,
    /// Canonical hash of the sampled height function.
    #[serde(default)]
    pub height_hash: String,
    /// Seed of the bit stream.
    pub seed: u64,
    /// RFC 3339 timestamp.
    pub created_at: String,
    /// Crate name to version.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Provenance for a sample drawn with `seed` at `created_at`.
    pub fn for_sample(seed: u64, created_at: impl Into<String>) -> Self {
        Self {
            seed,
            created_at: created_at.into(),
            ..Self::default()
        }
    }

    /// Records the configuration, matrix and height hashes.
    pub fn with_hashes(
        mut self,
        config_hash: impl Into<String>,
        matrix_hash: impl Into<String>,
        height_hash: impl Into<String>,
    ) -> Self {
        self.config_hash = config_hash.into();
        self.matrix_hash = matrix_hash.into();
        self.height_hash = height_hash.into();
        self
    }

    /// Adds a tool and its version.
    pub fn with_tool(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.tool_versions.insert(name.into(), version.into());
        self
    }
}
