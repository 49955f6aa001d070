//! Argument definitions for `claimsim`

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use claims_engine::{FilterControls, Variant};

/// Synthetic healthcare claims generator
#[derive(Parser, Debug)]
#[command(name = "claimsim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (YAML or TOML); `claimsim.yaml` is used when present
    #[arg(short, long, global = true, env = "CLAIMSIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the generator variants and their row limits
    Variants,

    /// Generate a claims dataset and write it as CSV
    Generate(GenerateArgs),

    /// Filter an existing CSV or JSON claims file
    Filter(FilterArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Generator variant (classic, payor-mix, dimensional)
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Number of claims to generate
    #[arg(short, long)]
    pub rows: Option<usize>,

    #[command(flatten)]
    pub filters: FilterFlags,

    /// Output file; CSV goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the payor, diagnosis and facility dimension tables here
    #[arg(long)]
    pub dimensions_dir: Option<PathBuf>,

    /// Print the first N rows to stderr
    #[arg(long, value_name = "N")]
    pub preview: Option<usize>,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Claims file to read (.csv or .json)
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub filters: FilterFlags,

    /// Output file; CSV goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the first N rows to stderr
    #[arg(long, value_name = "N")]
    pub preview: Option<usize>,
}

/// Same four controls as the interactive claims view
#[derive(Args, Debug, Clone, Default)]
pub struct FilterFlags {
    /// Claim status to keep (Paid, Denied, Pending or All)
    #[arg(long)]
    pub status: Option<String>,

    /// Provider ID to keep
    #[arg(long)]
    pub provider_id: Option<String>,

    /// Earliest claim date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest claim date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

impl From<FilterFlags> for FilterControls {
    fn from(flags: FilterFlags) -> Self {
        FilterControls {
            status: flags.status,
            provider_id: flags.provider_id,
            date_from: flags.from,
            date_to: flags.to,
        }
    }
}
