//! Binary entrypoint for optgate.
use clap::{ArgAction, Parser, Subcommand};
use optgate_cli::commands;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

/// Exit code for I/O, parse, and configuration errors
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "optgate", version, about = "Equivalence and regression gate for optimized pipelines")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare a baseline and a candidate report
    Compare {
        #[arg(long)]
        baseline: PathBuf,
        #[arg(long)]
        candidate: PathBuf,
        /// YAML gate profile
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Where to write the validation record (JSON)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Value-level diff of two CSV outputs
    Diff {
        baseline: PathBuf,
        candidate: PathBuf,
        #[arg(long)]
        profile: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Recompute a report's output hash from its retained data
    VerifyHash { report: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Compare {
            baseline,
            candidate,
            profile,
            output,
        } => commands::compare(baseline, candidate, profile.as_deref(), output.as_deref()),
        Command::Diff {
            baseline,
            candidate,
            profile,
            output,
        } => commands::diff(baseline, candidate, profile.as_deref(), output.as_deref()),
        Command::VerifyHash { report } => commands::verify_hash(report),
    };

    match result {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
