//! Quell CLI - command-line interface for narrowband noise analysis and
//! removal.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quell")]
#[command(author, version, about = "Narrowband noise analysis and removal", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the spectrum and noise profile of an audio file
    Analyze(commands::analyze::AnalyzeArgs),

    /// Remove narrowband noise from an audio file
    Denoise(commands::denoise::DenoiseArgs),

    /// Denoise every WAV file in a directory
    Batch(commands::batch::BatchArgs),

    /// Compare an original recording against its filtered version
    Evaluate(commands::evaluate::EvaluateArgs),

    /// Generate test signals
    Generate(commands::generate::GenerateArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Denoise(args) => commands::denoise::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Evaluate(args) => commands::evaluate::run(args),
        Commands::Generate(args) => commands::generate::run(args),
    }
}
