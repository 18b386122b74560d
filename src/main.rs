use clap::{Parser, Subcommand};
use std::process;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the best citizen allocation for one city.
    Optimize(cmd::optimize::OptimizeArgs),
    /// Cross-check the cached search against brute force.
    Verify(cmd::verify::VerifyArgs),
    /// Optimise every city in a directory in parallel.
    Batch(cmd::batch::BatchArgs),
    /// Build or inspect a persisted parameter record.
    Param(cmd::param::ParamArgs),
    /// Write synthetic city definitions.
    Generate(cmd::generate::GenerateArgs),
    /// List the built-in objective presets.
    Presets,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Optimize(args) => cmd::optimize::run(args),
        Commands::Verify(args) => cmd::verify::run(args),
        Commands::Batch(args) => cmd::batch::run(args),
        Commands::Param(args) => cmd::param::run(args),
        Commands::Generate(args) => cmd::generate::run(args),
        Commands::Presets => cmd::presets::run(),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
