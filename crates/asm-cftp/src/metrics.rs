use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Volume difference between the chains at one time index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeSample {
    /// Time index, `-depth <= time <= 0`.
    pub time: i64,
    /// `sum(upper - lower)` at that time.
    pub volume: i64,
}

/// Outcome of one attempt at a fixed depth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Depth `T` of the attempt.
    pub depth: u64,
    /// Volume difference of the extremal states at `-T`.
    pub start_volume: i64,
    /// Volume difference at time `0`.
    pub end_volume: i64,
    /// Whether the chains met by time `0`.
    pub coalesced: bool,
    /// Volumes at each dyadic boundary, present when reporting is enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<VolumeSample>,
}

/// Collects per-attempt records over a run.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    attempts: Vec<AttemptRecord>,
}

impl MetricsRecorder {
    /// Creates a new recorder instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attempt record.
    pub fn push(&mut self, record: AttemptRecord) {
        self.attempts.push(record);
    }

    /// Returns an immutable view over the recorded attempts.
    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }

    /// Total number of time steps simulated per chain over all attempts.
    pub fn total_steps(&self) -> u64 {
        self.attempts.iter().map(|a| a.depth).sum()
    }

    /// Consumes the recorder, returning the attempts.
    pub fn into_attempts(self) -> Vec<AttemptRecord> {
        self.attempts
    }
}

/// Writes one CSV row per attempt.
pub fn write_csv<P: AsRef<Path>>(attempts: &[AttemptRecord], path: P) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "attempt,depth,start_volume,end_volume,coalesced")?;
    for (index, attempt) in attempts.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{},{}",
            index, attempt.depth, attempt.start_volume, attempt.end_volume, attempt.coalesced
        )?;
    }
    file.flush()
}

/// Writes the dyadic volume trace of every attempt, one row per sample.
pub fn write_trace_csv<P: AsRef<Path>>(
    attempts: &[AttemptRecord],
    path: P,
) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "attempt,depth,time,volume")?;
    for (index, attempt) in attempts.iter().enumerate() {
        for sample in &attempt.trace {
            writeln!(
                file,
                "{},{},{},{}",
                index, attempt.depth, sample.time, sample.volume
            )?;
        }
    }
    file.flush()
}
