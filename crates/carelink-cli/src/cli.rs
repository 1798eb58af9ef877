//! CLI argument definitions using clap.

use std::path::PathBuf;

use carelink_core::SgvLimit;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Text,
    /// Nightscout entries as a JSON array
    #[default]
    Json,
}

impl OutputFormat {
    /// Parse the `format` value stored in the config file.
    pub fn from_config(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }
}

/// Snapshot source shared by the commands that read one.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Snapshot JSON file (reads stdin when omitted or `-`)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,
}

/// Arguments of the `transform` command.
#[derive(Debug, Clone, Args)]
pub struct TransformArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Keep only the latest N glucose entries (`unbounded` keeps all)
    #[arg(short = 'n', long, env = "CARELINK_SGV_LIMIT", value_parser = parse_sgv_limit)]
    pub sgv_limit: Option<SgvLimit>,

    /// Output format (defaults to the config file, then json)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output compact JSON (no pretty-printing)
    #[arg(long)]
    pub compact: bool,

    /// JSON object merged into every emitted entry
    #[arg(long, value_name = "JSON", value_parser = parse_extra)]
    pub extra: Option<serde_json::Value>,
}

#[derive(Parser)]
#[command(name = "carelink")]
#[command(author, version, about = "Turn CareLink snapshots into Nightscout entries", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform a snapshot into Nightscout entries
    Transform(TransformArgs),

    /// Show the pump timezone offset inferred from a snapshot
    Offset {
        #[command(flatten)]
        input: InputArgs,

        /// Output format (defaults to the config file, then json)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}

fn parse_sgv_limit(s: &str) -> Result<SgvLimit, String> {
    s.parse().map_err(|e: carelink_core::Error| e.to_string())
}

fn parse_extra(s: &str) -> Result<serde_json::Value, String> {
    match serde_json::from_str(s) {
        Ok(value @ serde_json::Value::Object(_)) => Ok(value),
        Ok(_) => Err("expected a JSON object, e.g. '{\"enteredBy\": \"carelink\"}'".to_string()),
        Err(e) => Err(format!("invalid JSON: {}", e)),
    }
}
