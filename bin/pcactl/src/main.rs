//! ---
//! pca_section: "05-command-line-interfaces"
//! pca_subsection: "binary"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Command line entry point for protection coordination studies."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod study;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Protection coordination assessment utility",
    long_about = None
)]
struct Cli {
    /// Path to the study configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Compute primary and backup reach factors")]
    Reach(study::ModelArgs),
    #[command(about = "Assess conductor damage over the reclose sequence")]
    Damage(study::ModelArgs),
    #[command(about = "Run both studies and export JSON reports")]
    Analyze(study::ModelArgs),
    #[command(about = "Load and validate a network model")]
    Check(study::CheckArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = study::load_config(cli.config.as_deref())?;
    pca_common::init_tracing("pcactl", &config.logging)?;
    match cli.command {
        Commands::Reach(args) => study::reach(&config, &args)?,
        Commands::Damage(args) => study::damage(&config, &args)?,
        Commands::Analyze(args) => study::analyze(&config, &args)?,
        Commands::Check(args) => study::check(&args)?,
    }
    Ok(())
}
