//! ETL runner CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

use etl_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use etl_cli::commands::{provision_secrets, run_list, run_pipeline};
use etl_cli::logging::{LogConfig, LogFormat, init_logging};
use etl_cli::summary::print_run_summary;
use etl_pipeline::ProjectPaths;
use etl_secrets::ProvisionedEnvironment;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Run(args) => match run(&args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::List => {
            run_list();
            0
        }
    };
    std::process::exit(exit_code);
}

fn run(args: &etl_cli::cli::RunArgs) -> anyhow::Result<()> {
    let paths = ProjectPaths::discover(args.project_dir.clone())?;
    let provisioned = provision_secrets(&args.env)?;
    export_environment(&provisioned);
    let summary = run_pipeline(args, &paths)?;
    print_run_summary(&summary);
    Ok(())
}

/// Export provisioned variables to this process.
#[allow(unsafe_code)]
fn export_environment(provisioned: &ProvisionedEnvironment) {
    for (name, value) in provisioned.variables() {
        // SAFETY: the process is single-threaded here. The blocking reqwest
        // client built by `provision_secrets` runs its own runtime thread, but
        // the client is dropped, and that thread joined, before
        // `provision_environment` returns. The session and the polars pool
        // have not started yet.
        unsafe { std::env::set_var(name, value) };
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
