//! CLI command definitions and parsing
use crate::analysis::AnalysisKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logsage",
    version,
    about = "Device log analysis with LLM assistance",
    long_about = "logsage sends device logs to an OpenAI-compatible completion endpoint for \
                  narrative analysis. Logs too large for one request are split into overlapping \
                  segments, analyzed in order with carried-forward context, and merged into a \
                  single report."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/logsage/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Profile to apply on top of the config file
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a log file
    Analyze {
        /// Log file to analyze
        file: PathBuf,

        /// Log type (audio, display, general); unknown types use the general role
        #[arg(short = 't', long, default_value = "general")]
        log_type: String,

        /// Analysis mode
        #[arg(short, long, value_enum, default_value = "comprehensive")]
        kind: KindArg,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Also write the rendered result to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Preview how a log would be segmented, without calling the endpoint
    Segment {
        /// Log file to segment
        file: PathBuf,

        /// Character budget per segment (defaults to config)
        #[arg(long)]
        max_chars: Option<usize>,

        /// Overlap lines between segments (defaults to config)
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Check that the completion endpoint is reachable
    Ping,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Comprehensive,
    Errors,
    Summary,
}

impl From<KindArg> for AnalysisKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Comprehensive => AnalysisKind::Comprehensive,
            KindArg::Errors => AnalysisKind::ErrorPatterns,
            KindArg::Summary => AnalysisKind::IssueSummary,
        }
    }
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
