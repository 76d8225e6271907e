use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    sample::{self, SampleArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "asm-sim", about = "Exact sampler for random alternating sign matrices")]
struct Cli {
    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a uniform alternating sign matrix by coupling from the past.
    Sample(SampleArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Sample(args) => sample::run(&args),
        Command::Version(args) => version::run(&args),
    }
}

fn init_tracing(verbose: bool) {
    // stdout is reserved for the matrix text
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::sample::{ExtremeArg, OutputFormat};

    #[test]
    fn parses_sample_flags() {
        let cli = Cli::try_parse_from([
            "asm-sim", "sample", "6", "--seed", "3", "--format", "pretty", "--extreme", "max",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Sample(args) => {
                assert_eq!(args.order, 6);
                assert_eq!(args.seed, Some(3));
                assert_eq!(args.format, OutputFormat::Pretty);
                assert_eq!(args.extreme, Some(ExtremeArg::Max));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn order_is_required() {
        assert!(Cli::try_parse_from(["asm-sim", "sample"]).is_err());
    }
}
