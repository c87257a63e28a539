//! CLI argument definitions for the ETL runner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use etl_pipeline::DEFAULT_PIPELINE;

#[derive(Parser)]
#[command(
    name = "etl",
    version,
    about = "Run validated ETL pipelines",
    long_about = "Run the project's ETL pipelines.\n\n\
                  Secrets for the selected environment are read from Azure Key Vault\n\
                  (KEY_VAULT_URI) and exported before the run starts."
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

    /// Allow row values (e.g. duplicate keys) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a pipeline.
    Run(RunArgs),

    /// List registered pipelines and their nodes.
    List,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Configuration environment (selects conf/<ENV> and required secrets).
    #[arg(long = "env", short = 'e', default_value = "local")]
    pub env: String,

    /// Name of the registered pipeline to run.
    #[arg(long = "pipeline", default_value = DEFAULT_PIPELINE)]
    pub pipeline: String,

    /// Run only the named nodes. Repeatable; accepts comma-separated names.
    #[arg(long = "node", short = 'n', value_delimiter = ',')]
    pub nodes: Vec<String>,

    /// Run only nodes with these tags. Repeatable; accepts comma-separated tags.
    #[arg(long = "tag", short = 't', value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Project root (default: current directory).
    #[arg(long = "project-dir", value_name = "DIR")]
    pub project_dir: Option<PathBuf>,
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
