use std::error::Error;
use std::path::PathBuf;

use asm_cftp::{extremal, run as run_sampler, CftpConfig, SampleSummary};
use asm_ice::flip::count_flippable;
use asm_ice::render::owned_grid;
use asm_ice::{extract, AlternatingSignMatrix, Extreme, HeightFunction};
use clap::{Args, ValueEnum};
use tracing::info;

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Matrix order `n`.
    pub order: usize,
    /// Seed of the bit stream; drawn from entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Depth of the first attempt (rounded up to a power of two).
    #[arg(long = "initial")]
    pub initial_depth: Option<u64>,
    /// Give up once the doubling passes this depth.
    #[arg(long = "max-depth")]
    pub max_depth: Option<u64>,
    /// Rendering written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Asm)]
    pub format: OutputFormat,
    /// Print an extremal configuration instead of sampling.
    #[arg(long, value_enum)]
    pub extreme: Option<ExtremeArg>,
    /// Log per-attempt volume differences.
    #[arg(long)]
    pub report: bool,
    /// Advance both chains and each sweep on the rayon pool.
    #[arg(long)]
    pub parallel: bool,
    /// YAML configuration; flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory for matrix, metrics and manifest artefacts.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Integer entries, one row per line.
    Asm,
    /// `+`, `-` and blanks.
    Pretty,
    /// The height function on the `(n+1) x (n+1)` grid.
    Height,
    /// Corner sums of the matrix.
    Csum,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExtremeArg {
    Min,
    Max,
}

impl From<ExtremeArg> for Extreme {
    fn from(value: ExtremeArg) -> Self {
        match value {
            ExtremeArg::Min => Extreme::Min,
            ExtremeArg::Max => Extreme::Max,
        }
    }
}

pub fn run(args: &SampleArgs) -> Result<(), Box<dyn Error>> {
    if let Some(extreme) = args.extreme {
        let heights = extremal(args.order, extreme.into())?;
        let matrix = extract(&heights)?;
        print!("{}", render(args.format, &heights, &matrix));
        return Ok(());
    }

    let config = resolve_config(args)?;
    let summary = run_sampler(args.order, &config)?;
    if args.report {
        log_report(&summary);
    }
    print!("{}", render(args.format, &summary.heights, &summary.matrix));
    Ok(())
}

fn resolve_config(args: &SampleArgs) -> Result<CftpConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => CftpConfig::from_yaml_path(path)?,
        None => CftpConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed_policy.master_seed = Some(seed);
    }
    if let Some(depth) = args.initial_depth {
        config.initial_depth = depth;
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    if args.report {
        config.report = true;
    }
    if args.parallel {
        config.parallel_chains = true;
        config.parallel_sites = true;
    }
    if let Some(out) = &args.out {
        config.output.run_directory = Some(out.clone());
    }
    Ok(config)
}

fn render(format: OutputFormat, heights: &HeightFunction, matrix: &AlternatingSignMatrix) -> String {
    match format {
        OutputFormat::Asm => matrix.to_text(),
        OutputFormat::Pretty => matrix.to_pretty(),
        OutputFormat::Height => heights.to_text(),
        OutputFormat::Csum => owned_grid(&heights.corner_sums()),
    }
}

fn log_report(summary: &SampleSummary) {
    for (index, attempt) in summary.attempts.iter().enumerate() {
        info!(
            attempt = index,
            depth = attempt.depth,
            start_volume = attempt.start_volume,
            end_volume = attempt.end_volume,
            coalesced = attempt.coalesced,
            "attempt"
        );
        for sample in &attempt.trace {
            info!(
                depth = attempt.depth,
                time = sample.time,
                volume = sample.volume,
                "volume difference"
            );
        }
    }
    info!(
        seed = summary.seed,
        total_steps = summary.total_steps,
        negatives = summary.matrix.count_negative(),
        flippable = count_flippable(&summary.heights),
        hash = %summary.matrix_hash,
        "sample statistics"
    );
}
