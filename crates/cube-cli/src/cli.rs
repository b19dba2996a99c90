//! CLI argument definitions for cube-guardian.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cube-guardian",
    version,
    about = "Validate the cubes exposed by an analytics query API",
    long_about = "Validate the cubes exposed by an analytics query API.\n\n\
                  Every cube is queried once with all of its measures and dimensions.\n\
                  When that query fails, each dimension is queried on its own to\n\
                  point at the fields that break it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub connection: ConnectionArgs,

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

/// Where the API lives and how to authenticate.
#[derive(Args)]
pub struct ConnectionArgs {
    /// TOML config file (default: ./cube-guardian.toml when present).
    ///
    /// Only TOML is read; a YAML `config.yaml` is ignored. Keys: api_url,
    /// api_token, concurrency, fail_fast, cubes.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the query API.
    #[arg(long = "api-url", env = "API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token used for every request.
    #[arg(
        long = "api-token",
        env = "API_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub api_token: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate cubes and report which dimensions fail.
    Check(CheckArgs),

    /// List the cubes in the catalog without validating them.
    Cubes,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Stop probing a failed cube's dimensions at the first failure.
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Only validate these cubes (default: every cube in the catalog).
    #[arg(long = "cubes", value_name = "NAME", num_args = 1..)]
    pub cubes: Option<Vec<String>>,

    /// Maximum number of cubes validated at the same time (default: 10).
    #[arg(long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
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
