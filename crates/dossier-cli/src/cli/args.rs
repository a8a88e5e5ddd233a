use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Generate evaluation report artifacts from experiment records.
#[derive(Debug, Parser)]
#[command(name = "dossier", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Produce one report artifact (PDF document or CSV export).
    Generate(GenerateArgs),
    /// Print a console summary for one experiment.
    Inspect(InspectArgs),
    /// List experiments available in the data directory.
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Report configuration (YAML).
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    /// Directory holding experiments/ and arenas/ JSON records.
    #[arg(long, value_name = "DIR", env = "DOSSIER_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Where the artifact file is written.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Directory holding experiments/ and arenas/ JSON records.
    #[arg(long, value_name = "DIR", env = "DOSSIER_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Experiment id to summarize.
    #[arg(long, value_name = "ID")]
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory holding experiments/ and arenas/ JSON records.
    #[arg(long, value_name = "DIR", env = "DOSSIER_DATA_DIR")]
    pub data_dir: PathBuf,
}
