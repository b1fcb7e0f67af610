//! Command line argument parsing for the sitescore CLI using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// sitescore - keyword relevance scoring over a crawled site
#[derive(Parser, Debug, Clone)]
#[command(name = "sitescore")]
#[command(about = "Score a crawled site against target keywords")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SiteScoreArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SiteScoreArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Score a site against every keyword in a keyword file
    Match(MatchArgs),

    /// Show per-page match records for some keywords
    Detail(DetailArgs),
}

/// Dispatch settings shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Number of worker threads (defaults to the CPU count)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Ceiling on pages x keywords tasks
    #[arg(long, value_name = "N")]
    pub max_tasks: Option<usize>,

    /// Abort the dispatch after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

/// Arguments for scoring a site
#[derive(Parser, Debug, Clone)]
pub struct MatchArgs {
    /// Site aggregate file (JSON)
    #[arg(value_name = "SITE_FILE")]
    pub site_file: PathBuf,

    /// Keyword file, one keyword per line
    #[arg(value_name = "KEYWORDS_FILE")]
    pub keywords_file: PathBuf,

    /// Dispatch settings
    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for showing match records
#[derive(Parser, Debug, Clone)]
pub struct DetailArgs {
    /// Site aggregate file (JSON)
    #[arg(value_name = "SITE_FILE")]
    pub site_file: PathBuf,

    /// Keywords to match
    #[arg(value_name = "KEYWORD", required = true)]
    pub keywords: Vec<String>,

    /// Maximum records to show per keyword
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Dispatch settings
    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}
