//! `run` and `list` subcommands.

use anyhow::{Context, Result, anyhow};
use tracing::{error, info, info_span};

use etl_pipeline::{
    PipelineError, ProjectPaths, RunOptions, RunSummary, Session, elapsed_ms, register_pipelines,
};
use etl_secrets::{KeyVaultClient, ProvisionedEnvironment, provision_environment};
use etl_validate::ValidationError;

use crate::cli::RunArgs;
use crate::logging::redact_value;
use crate::redact::redact_dataset_error;
use crate::summary::print_pipelines;

/// Service name attached to the run span.
pub const SERVICE_NAME: &str = "application";

/// Fetch the secrets `env` needs from Key Vault.
///
/// The vault is only contacted when the environment needs a secret.
pub fn provision_secrets(env: &str) -> Result<ProvisionedEnvironment> {
    provision_environment(env, KeyVaultClient::from_env)
        .with_context(|| format!("provision secrets for env '{env}'"))
}

/// Selection options for a run, with empty and padded names dropped.
pub fn run_options(args: &RunArgs) -> RunOptions {
    RunOptions {
        pipeline: args.pipeline.clone(),
        node_names: clean_values(&args.nodes),
        tags: clean_values(&args.tags),
    }
}

fn clean_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run the selected pipeline inside the `run` span.
///
/// Failures are logged here with row values and dataset errors redacted; the
/// returned error carries the same redacted message.
pub fn run_pipeline(args: &RunArgs, paths: &ProjectPaths) -> Result<RunSummary> {
    let git_head = paths.git_head();
    let span = info_span!(
        "run",
        service = SERVICE_NAME,
        env = %args.env,
        git_head = %git_head
    );
    let _guard = span.enter();

    let mut session = Session::create(paths, &args.env)
        .map_err(|e| anyhow!(describe_failure(&e)))
        .context("open session")?;
    let options = run_options(args);
    info!(pipeline = %options.pipeline, "starting run");

    match session.run(&options) {
        Ok(summary) => {
            info!(
                nodes = summary.nodes.len(),
                elapsed_ms = elapsed_ms(summary.elapsed),
                "run completed"
            );
            Ok(summary)
        }
        Err(failure) => {
            let message = describe_failure(&failure);
            error!("{message}");
            log_duplicate_groups(&failure);
            Err(anyhow!(message)).context(format!("pipeline '{}' failed", options.pipeline))
        }
    }
}

/// Print the registered pipelines.
pub fn run_list() {
    print_pipelines(&register_pipelines());
}

/// Message for a failed run; dataset errors are scrubbed.
pub fn describe_failure(failure: &PipelineError) -> String {
    match failure {
        PipelineError::Catalog(_) => redact_dataset_error(&failure.to_string()),
        _ => failure.to_string(),
    }
}

fn log_duplicate_groups(failure: &PipelineError) {
    let diagnostic = failure
        .node_error()
        .and_then(|node| node.as_validation())
        .and_then(ValidationError::cardinality_diagnostic);
    let Some(diagnostic) = diagnostic else {
        return;
    };
    error!(
        rows = diagnostic.row_count,
        distinct = diagnostic.distinct_count,
        "duplicate keys over [{}]",
        diagnostic.columns.join(", ")
    );
    for line in diagnostic.render_groups(|value| redact_value(value).to_string()) {
        error!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(nodes: &[&str]) -> RunArgs {
        RunArgs {
            env: "test".into(),
            pipeline: "__default__".into(),
            nodes: nodes.iter().map(|n| (*n).to_string()).collect(),
            tags: Vec::new(),
            project_dir: None,
        }
    }

    #[test]
    fn blank_selection_values_are_dropped() {
        let options = run_options(&args(&[" intermediate_test_node ", ""]));
        assert_eq!(options.node_names, ["intermediate_test_node"]);
        assert!(options.tags.is_empty());
    }

    #[test]
    fn catalog_failures_are_redacted() {
        let failure = PipelineError::Catalog(etl_pipeline::CatalogError::DatasetNotFound {
            name: "raw_test".into(),
        });
        assert!(describe_failure(&failure).contains("raw_test"));
    }
}
