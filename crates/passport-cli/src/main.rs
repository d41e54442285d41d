//! Passport CLI — Assemble, sign, verify and lint health credentials.
//!
//! Subcommands: init, keygen, generate, sign, verify, lint, write.

mod commands;
mod data;
mod fetch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use passport_core::config::LoggingConfig;
use passport_core::PassportConfig;

/// Passport — Health credential tooling.
#[derive(Parser, Debug)]
#[command(name = "passport", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "passport.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Generate a signing key and its verification method document.
    Keygen(commands::keygen::KeygenArgs),
    /// Assemble credential records from input records with a recipe.
    Generate(commands::generate::GenerateArgs),
    /// Sign every document of a stream.
    Sign(commands::sign::SignArgs),
    /// Verify credentials and show their fields.
    Verify(commands::verify::VerifyArgs),
    /// Verify credentials and lint them against their schema.
    Lint(commands::lint::LintArgs),
    /// Write each document of a stream to its own file.
    Write(commands::write::WriteArgs),
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = PassportConfig::load(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging(&config.logging);

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config),
        Commands::Keygen(args) => commands::keygen::run(args, &config),
        Commands::Generate(args) => commands::generate::run(args, &config).await,
        Commands::Sign(args) => commands::sign::run(args, &config).await,
        Commands::Verify(args) => commands::verify::run(args, &config).await,
        Commands::Lint(args) => commands::lint::run(args, &config).await,
        Commands::Write(args) => commands::write::run(args, &config).await,
    }
}
