use std::fs;
use std::path::{Path, PathBuf};

use asm_core::{AsmError, ErrorInfo};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Largest accepted starting depth, `2^29`.
pub const MAX_INITIAL_DEPTH: u64 = 1 << 29;

/// YAML-configurable parameters governing a sampling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CftpConfig {
    /// Depth `T` of the first attempt. Rounded up to a power of two.
    #[serde(default = "default_initial_depth")]
    pub initial_depth: u64,
    /// Ceiling on the doubling depth; passing it is a resource error.
    #[serde(default = "default_max_depth")]
    pub max_depth: u64,
    /// Advance the lower and upper chains on separate threads.
    #[serde(default)]
    pub parallel_chains: bool,
    /// Split each half-sweep across rows on the rayon pool.
    #[serde(default)]
    pub parallel_sites: bool,
    /// Record the volume difference at every dyadic time `-2^k`.
    #[serde(default)]
    pub report: bool,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Output directory configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_initial_depth() -> u64 {
    1
}

fn default_max_depth() -> u64 {
    MAX_INITIAL_DEPTH
}

impl Default for CftpConfig {
    fn default() -> Self {
        Self {
            initial_depth: default_initial_depth(),
            max_depth: default_max_depth(),
            parallel_chains: false,
            parallel_sites: false,
            report: false,
            seed_policy: SeedPolicy::default(),
            output: OutputConfig::default(),
        }
    }
}

impl CftpConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, AsmError> {
        serde_yaml::from_str(text).map_err(|err| {
            AsmError::Config(ErrorInfo::new("config-parse", err.to_string()))
        })
    }

    /// Loads a configuration file from disk.
    pub fn from_yaml_path(path: &Path) -> Result<Self, AsmError> {
        let text = fs::read_to_string(path).map_err(|err| {
            AsmError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&text).map_err(|err| match err {
            AsmError::Config(info) => AsmError::Config(info.with_context("path", path.display())),
            other => other,
        })
    }

    /// Checks the depth settings and returns the effective starting depth.
    ///
    /// A starting depth that is not a power of two is rounded up with a warning.
    pub fn effective_initial_depth(&self) -> Result<u64, AsmError> {
        if !(1..=MAX_INITIAL_DEPTH).contains(&self.initial_depth) {
            return Err(AsmError::Config(
                ErrorInfo::new("initial-depth-range", "initial depth is out of range")
                    .with_context("initial_depth", self.initial_depth)
                    .with_hint(format!("choose a value between 1 and {MAX_INITIAL_DEPTH}")),
            ));
        }
        let depth = self.initial_depth.next_power_of_two();
        if depth != self.initial_depth {
            warn!(
                requested = self.initial_depth,
                effective = depth,
                "initial depth is not a power of two, rounding up"
            );
        }
        if i64::try_from(self.max_depth).is_err() {
            return Err(AsmError::Config(
                ErrorInfo::new("max-depth-range", "depth ceiling does not fit a time index")
                    .with_context("max_depth", self.max_depth)
                    .with_hint(format!("choose a value no larger than {}", i64::MAX)),
            ));
        }
        if depth > self.max_depth {
            return Err(AsmError::Config(
                ErrorInfo::new("initial-above-ceiling", "initial depth exceeds the depth ceiling")
                    .with_context("initial_depth", depth)
                    .with_context("max_depth", self.max_depth),
            ));
        }
        Ok(depth)
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed; drawn from process entropy when absent.
    #[serde(default)]
    pub master_seed: Option<u64>,
    /// Optional label mixed into the master seed to select a substream.
    #[serde(default)]
    pub label: Option<String>,
}

/// Output directory layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for run artefacts. Created if it does not exist.
    #[serde(default)]
    pub run_directory: Option<PathBuf>,
    /// Matrix text filename relative to `run_directory`.
    #[serde(default = "default_matrix_filename")]
    pub matrix_file: PathBuf,
    /// Per-attempt metrics filename relative to `run_directory`.
    #[serde(default = "default_metrics_filename")]
    pub metrics_file: PathBuf,
    /// Manifest filename relative to `run_directory`.
    #[serde(default = "default_manifest_filename")]
    pub manifest_file: PathBuf,
}

fn default_matrix_filename() -> PathBuf {
    PathBuf::from("matrix.txt")
}

fn default_metrics_filename() -> PathBuf {
    PathBuf::from("metrics.csv")
}

fn default_manifest_filename() -> PathBuf {
    PathBuf::from("manifest.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            run_directory: None,
            matrix_file: default_matrix_filename(),
            metrics_file: default_metrics_filename(),
            manifest_file: default_manifest_filename(),
        }
    }
}
