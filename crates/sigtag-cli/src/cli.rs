//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sigtag",
    version,
    about = "Resolve process tags to signal columns and plan plots per step",
    long_about = "Resolve process tags to signal columns and plan plots per step.\n\n\
                  Reads CSV exports whose header rows carry column names, tag names\n\
                  and descriptions, then classifies the requested signals as\n\
                  discrete or continuous across one or more sources."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show how each file's tag metadata lines up with its columns.
    Inspect(InspectArgs),

    /// Resolve and classify the tags of every configured step.
    Run(RunArgs),
}

/// Options shared by every command that loads CSV sources.
#[derive(Parser, Clone)]
pub struct SourceArgs {
    /// CSV files with column-name, tag and description header rows.
    #[arg(value_name = "CSV", required = true)]
    pub files: Vec<PathBuf>,

    /// Leading metadata cells to skip before aligning tags with columns.
    #[arg(long = "metadata-offset", value_name = "N", default_value_t = 0)]
    pub metadata_offset: usize,

    /// Token treated as an absent tag or description.
    #[arg(long = "placeholder", value_name = "TOKEN", default_value = "nan")]
    pub placeholder: String,

    /// Print machine-readable JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
}

#[derive(Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// JSON step configuration listing the tags to plot per step.
    #[arg(long = "steps", value_name = "JSON")]
    pub steps: PathBuf,

    /// Source labels, in file order (default: file stem).
    #[arg(long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Override the configured time column.
    #[arg(long = "time-column", value_name = "NAME")]
    pub time_column: Option<String>,

    /// Maximum number of similar tags suggested for an unresolved tag.
    #[arg(long = "suggestions", value_name = "N", default_value_t = 3)]
    pub suggestion_limit: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
