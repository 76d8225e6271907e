use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use asm_core::errors::ErrorInfo;
use asm_core::{AsmError, BitStream, Order, RunProvenance};
use asm_ice::{
    apply_step, apply_step_parallel, canonical_height_hash, canonical_json_hash, extract,
    AlternatingSignMatrix, Extreme, HeightFunction,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::CftpConfig;
use crate::determinism;
use crate::manifest::{SampleManifest, MANIFEST_SCHEMA};
use crate::metrics::{self, AttemptRecord, MetricsRecorder, VolumeSample};

/// Thread layout used to advance an attempt. Results do not depend on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Advance the lower and upper chains concurrently.
    pub parallel_chains: bool,
    /// Split each half-sweep across rows.
    pub parallel_sites: bool,
}

impl From<&CftpConfig> for Schedule {
    fn from(config: &CftpConfig) -> Self {
        Self {
            parallel_chains: config.parallel_chains,
            parallel_sites: config.parallel_sites,
        }
    }
}

/// Trajectories started from the minimal and maximal configurations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPair {
    /// Chain started from [`HeightFunction::minimal`].
    pub lower: HeightFunction,
    /// Chain started from [`HeightFunction::maximal`].
    pub upper: HeightFunction,
}

impl ChainPair {
    /// Fresh pair at the two extremes.
    pub fn extremal(order: Order) -> Self {
        Self {
            lower: HeightFunction::minimal(order),
            upper: HeightFunction::maximal(order),
        }
    }

    /// True once both chains hold the same configuration.
    pub fn is_coalesced(&self) -> bool {
        self.lower == self.upper
    }

    /// `sum(upper - lower)`, zero exactly when coalesced.
    pub fn volume_difference(&self) -> i64 {
        HeightFunction::volume_difference(&self.lower, &self.upper)
    }

    /// Applies the updates for times `from..to` to both chains.
    pub fn advance(&mut self, stream: &BitStream, from: i64, to: i64, schedule: Schedule) {
        let sites = schedule.parallel_sites;
        if schedule.parallel_chains {
            let (lower, upper) = (&mut self.lower, &mut self.upper);
            rayon::join(
                || advance_chain(lower, stream, from, to, sites),
                || advance_chain(upper, stream, from, to, sites),
            );
        } else {
            advance_chain(&mut self.lower, stream, from, to, sites);
            advance_chain(&mut self.upper, stream, from, to, sites);
        }
    }
}

fn advance_chain(
    config: &mut HeightFunction,
    stream: &BitStream,
    from: i64,
    to: i64,
    parallel_sites: bool,
) {
    let sites = config.order().sites();
    for t in from..to {
        let bits = stream.step(t, sites);
        if parallel_sites {
            apply_step_parallel(config, &bits);
        } else {
            apply_step(config, &bits);
        }
    }
}

/// Time `-depth` at which an attempt of that depth starts.
fn start_time(depth: u64) -> Result<i64, AsmError> {
    i64::try_from(depth).map(|d| -d).map_err(|_| {
        AsmError::Config(
            ErrorInfo::new("depth-range", "attempt depth does not fit a time index")
                .with_context("depth", depth)
                .with_context("limit", i64::MAX),
        )
    })
}

/// Runs one attempt: both extremes advanced from time `-depth` to `0`.
pub fn run_attempt(
    order: Order,
    stream: &BitStream,
    depth: u64,
    schedule: Schedule,
) -> Result<ChainPair, AsmError> {
    let from = start_time(depth)?;
    let mut pair = ChainPair::extremal(order);
    pair.advance(stream, from, 0, schedule);
    Ok(pair)
}

fn traced_attempt(
    order: Order,
    stream: &BitStream,
    depth: u64,
    schedule: Schedule,
    report: bool,
) -> Result<(ChainPair, AttemptRecord), AsmError> {
    let from = start_time(depth)?;
    let mut pair = ChainPair::extremal(order);
    let start_volume = pair.volume_difference();
    let mut trace_samples = Vec::new();
    if report {
        let boundaries = determinism::dyadic_boundaries(depth);
        for (index, &from) in boundaries.iter().enumerate() {
            let to = boundaries.get(index + 1).copied().unwrap_or(0);
            let volume = pair.volume_difference();
            trace!(depth, time = from, volume, "volume difference");
            trace_samples.push(VolumeSample { time: from, volume });
            pair.advance(stream, from, to, schedule);
        }
    } else {
        pair.advance(stream, from, 0, schedule);
    }
    let end_volume = pair.volume_difference();
    if report {
        trace_samples.push(VolumeSample {
            time: 0,
            volume: end_volume,
        });
    }
    let record = AttemptRecord {
        depth,
        start_volume,
        end_volume,
        coalesced: pair.is_coalesced(),
        trace: trace_samples,
    };
    Ok((pair, record))
}

/// Progress of the doubling protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CftpState {
    /// An attempt from time `-depth` is due.
    Running(u64),
    /// The attempt at `depth` ended apart; the next one starts twice as deep.
    Doubling(u64),
    /// The chains met; `configuration` is an exact uniform sample.
    Coalesced {
        /// Depth of the coalescing attempt.
        depth: u64,
        /// The common configuration at time `0`.
        configuration: HeightFunction,
    },
}

/// Summary returned to callers after a sample is drawn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleSummary {
    /// Matrix order.
    pub order: Order,
    /// Seed of the bit stream.
    pub seed: u64,
    /// Depth of the coalescing attempt.
    pub coalescence_depth: u64,
    /// Every attempt in order, the last one coalesced.
    pub attempts: Vec<AttemptRecord>,
    /// Time steps simulated per chain over all attempts.
    pub total_steps: u64,
    /// Sampled height function.
    pub heights: HeightFunction,
    /// Sampled alternating sign matrix.
    pub matrix: AlternatingSignMatrix,
    /// Canonical hash of `matrix`.
    pub matrix_hash: String,
    /// Matrix text written during the run.
    pub matrix_path: Option<PathBuf>,
    /// Metrics CSV written during the run.
    pub metrics_path: Option<PathBuf>,
    /// Manifest path, if emitted.
    pub manifest_path: Option<PathBuf>,
}

/// Draws an exact uniform sample of order `n` from the stream seeded by `seed`.
///
/// Pure computation: nothing is written regardless of `config.output`.
pub fn sample(n: usize, seed: u64, config: &CftpConfig) -> Result<SampleSummary, AsmError> {
    let order = Order::new(n)?;
    let initial = config.effective_initial_depth()?;
    let stream = determinism::stream_for(seed);
    let schedule = Schedule::from(config);
    let mut recorder = MetricsRecorder::new();
    let started = Instant::now();

    let mut state = CftpState::Running(initial);
    let (depth, heights) = loop {
        state = match state {
            CftpState::Running(depth) => {
                let (pair, record) = traced_attempt(order, &stream, depth, schedule, config.report)?;
                debug!(
                    depth,
                    start_volume = record.start_volume,
                    end_volume = record.end_volume,
                    "attempt finished"
                );
                recorder.push(record);
                if pair.is_coalesced() {
                    CftpState::Coalesced {
                        depth,
                        configuration: pair.upper,
                    }
                } else {
                    CftpState::Doubling(depth)
                }
            }
            CftpState::Doubling(depth) => match depth
                .checked_mul(2)
                .filter(|next| *next <= config.max_depth)
            {
                Some(next) => CftpState::Running(next),
                None => {
                    return Err(AsmError::ResourceExhausted(
                        ErrorInfo::new("depth-ceiling", "chains did not coalesce within max depth")
                            .with_context("order", order)
                            .with_context("seed", seed)
                            .with_context("depth", depth)
                            .with_context("max_depth", config.max_depth)
                            .with_hint("raise max_depth"),
                    ))
                }
            },
            CftpState::Coalesced {
                depth,
                configuration,
            } => break (depth, configuration),
        };
    };

    let matrix = extract(&heights)?;
    let matrix_hash = matrix.canonical_hash();
    let total_steps = recorder.total_steps();
    info!(
        %order,
        seed,
        depth,
        attempts = recorder.attempts().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "random alternating sign matrix generated"
    );

    Ok(SampleSummary {
        order,
        seed,
        coalescence_depth: depth,
        attempts: recorder.into_attempts(),
        total_steps,
        heights,
        matrix,
        matrix_hash,
        matrix_path: None,
        metrics_path: None,
        manifest_path: None,
    })
}

/// Samples a matrix of order `n` with default settings.
pub fn sample_asm(n: usize, seed: u64) -> Result<AlternatingSignMatrix, AsmError> {
    sample(n, seed, &CftpConfig::default()).map(|summary| summary.matrix)
}

/// Returns the unsampled extremal configuration of order `n`.
pub fn extremal(n: usize, extreme: Extreme) -> Result<HeightFunction, AsmError> {
    Ok(HeightFunction::extremal(Order::new(n)?, extreme))
}

/// Resolves the seed, samples, and writes artefacts when a run directory is set.
pub fn run(n: usize, config: &CftpConfig) -> Result<SampleSummary, AsmError> {
    let seed = determinism::resolve_seed(&config.seed_policy);
    let mut summary = sample(n, seed, config)?;
    if let Some(run_dir) = config.output.run_directory.clone() {
        write_artefacts(config, &mut summary, &run_dir)?;
    }
    Ok(summary)
}

fn write_artefacts(
    config: &CftpConfig,
    summary: &mut SampleSummary,
    run_dir: &Path,
) -> Result<(), AsmError> {
    fs::create_dir_all(run_dir).map_err(|err| AsmError::io("run-dir", err, run_dir))?;

    let matrix_path = run_dir.join(&config.output.matrix_file);
    fs::write(&matrix_path, summary.matrix.to_text())
        .map_err(|err| AsmError::io("matrix-write", err, &matrix_path))?;

    let metrics_path = run_dir.join(&config.output.metrics_file);
    metrics::write_csv(&summary.attempts, &metrics_path)
        .map_err(|err| AsmError::io("metrics-write", err, &metrics_path))?;
    if config.report {
        let trace_path = run_dir.join("trace.csv");
        metrics::write_trace_csv(&summary.attempts, &trace_path)
            .map_err(|err| AsmError::io("trace-write", err, &trace_path))?;
    }

    let config_hash = canonical_json_hash(config).map_err(|err| {
        AsmError::Serde(ErrorInfo::new("config-hash", err.to_string()))
    })?;
    let manifest_path = run_dir.join(&config.output.manifest_file);
    let manifest = SampleManifest {
        schema_version: MANIFEST_SCHEMA,
        config: config.clone(),
        order: summary.order.get(),
        seed_label: config.seed_policy.label.clone(),
        coalescence_depth: summary.coalescence_depth,
        attempts: summary.attempts.len(),
        total_steps: summary.total_steps,
        matrix_file: Some(config.output.matrix_file.clone()),
        metrics_file: Some(config.output.metrics_file.clone()),
        provenance: RunProvenance::for_sample(summary.seed, chrono::Utc::now().to_rfc3339())
            .with_hashes(
                config_hash,
                summary.matrix_hash.clone(),
                canonical_height_hash(&summary.heights),
            )
            .with_tool(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
    };
    manifest.write(&manifest_path)?;

    summary.matrix_path = Some(matrix_path);
    summary.metrics_path = Some(metrics_path);
    summary.manifest_path = Some(manifest_path);
    Ok(())
}
