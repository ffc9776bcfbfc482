use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pdbstat")]
#[command(version, about = "Atom, residue, chain and secondary-structure statistics for PDB files")]
struct Cli {
    /// Structure files (.pdb or .txt)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[arg(long, short, default_value = "text", help = "Output format: text, json")]
    format: pdbstat::OutputFormat,

    #[arg(
        long,
        short,
        env = "PDBSTAT_OUTPUT_DIR",
        help = "Write one report per input into this directory instead of stdout"
    )]
    output_dir: Option<PathBuf>,

    #[arg(long, help = "Memory-map input files instead of buffered reads")]
    mmap: bool,

    #[arg(long, help = "Reject input files larger than this many bytes")]
    max_bytes: Option<u64>,

    #[arg(long, help = "Log debug output to stderr")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "pdbstat=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = pdbstat::Config {
        inputs: cli.files,
        output_dir: cli.output_dir,
        format: cli.format,
        use_mmap: cli.mmap,
        max_bytes: cli.max_bytes,
    };

    match pdbstat::run(&config) {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(summary) => {
            eprintln!(
                "pdbstat: {} of {} files could not be analyzed",
                summary.failed,
                summary.failed + summary.analyzed
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("pdbstat failed: {err}");
            ExitCode::FAILURE
        }
    }
}
