//! CLI interface using clap
//!
//! Provides the command-line interface for docverifier

mod commands;

pub use commands::*;

use crate::diagnostics::Severity;
use crate::docstring::StyleSetting;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docverifier - Checks docstrings against the code they document
#[derive(Parser, Debug)]
#[command(name = "docverifier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root holding `.docverifier.toml` (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub path: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify extraction reports and print diagnostics
    Check(CheckArgs),

    /// Detect the style of a docstring
    Detect(DetectArgs),

    /// Parse a docstring and show its structure
    Parse(ParseArgs),

    /// Normalize type spellings
    Normalize(NormalizeArgs),

    /// Apply suggested fixes to one function's docstring
    Fix(FixArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Lowest severity that makes `check` fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FailOn {
    Warning,
    Information,
}

impl FailOn {
    pub fn is_triggered_by(&self, severity: Severity) -> bool {
        match self {
            FailOn::Warning => severity == Severity::Warning,
            FailOn::Information => true,
        }
    }
}

/// Arguments for check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Extraction reports, or directories searched for `*.json` reports
    /// (defaults to the project root)
    pub targets: Vec<PathBuf>,

    /// Exit with a failure status when a diagnostic of this severity or
    /// higher is found
    #[arg(long)]
    pub fail_on: Option<FailOn>,

    /// Only report these codes (e.g. DSV102)
    #[arg(short, long = "code")]
    pub codes: Vec<String>,
}

/// Arguments for detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// File holding the docstring text
    pub file: PathBuf,
}

/// Arguments for parse command
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// File holding the docstring text
    pub file: PathBuf,

    /// Docstring style (defaults to the configured style)
    #[arg(short, long)]
    pub style: Option<StyleSetting>,
}

/// Arguments for normalize command
#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Type spellings, e.g. "Optional[Dict[str, int]]"
    #[arg(required = true)]
    pub types: Vec<String>,
}

/// Arguments for fix command
#[derive(Parser, Debug)]
pub struct FixArgs {
    /// Extraction report holding the function
    pub report: PathBuf,

    /// Function whose docstring is fixed
    #[arg(short, long)]
    pub function: String,

    /// Write the fixed docstring to this file instead of printing a diff
    #[arg(short, long)]
    pub write: Option<PathBuf>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Reset to defaults
    #[arg(long)]
    pub reset: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
