//! Running a pipeline against a catalog.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use crate::catalog::DataCatalog;
use crate::error::{PipelineError, Result};
use crate::node::Pipeline;
use crate::project::ProjectPaths;
use crate::registry::{DEFAULT_PIPELINE, register_pipelines};

/// Which part of which pipeline to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub pipeline: String,
    /// Restrict the run to these node names. Empty means all nodes.
    pub node_names: Vec<String>,
    /// Restrict the run to nodes carrying any of these tags. Empty means all nodes.
    pub tags: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            pipeline: DEFAULT_PIPELINE.to_string(),
            node_names: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// Outcome of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRun {
    pub node: String,
    pub input: String,
    pub output: String,
    pub input_rows: usize,
    pub output_rows: usize,
    pub elapsed: Duration,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pipeline: String,
    pub nodes: Vec<NodeRun>,
    pub elapsed: Duration,
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
pub fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// A catalog plus the registered pipelines.
#[derive(Debug)]
pub struct Session {
    env: String,
    catalog: DataCatalog,
    pipelines: BTreeMap<String, Pipeline>,
}

impl Session {
    /// Open a session for `env` with the project's catalog and pipelines.
    pub fn create(paths: &ProjectPaths, env: &str) -> Result<Self> {
        let catalog = DataCatalog::for_env(paths, env)?;
        Ok(Self::with_catalog(env, catalog))
    }

    pub fn with_catalog(env: impl Into<String>, catalog: DataCatalog) -> Self {
        Self {
            env: env.into(),
            catalog,
            pipelines: register_pipelines(),
        }
    }

    /// Replace the registered pipelines.
    #[must_use]
    pub fn with_pipelines(mut self, pipelines: BTreeMap<String, Pipeline>) -> Self {
        self.pipelines = pipelines;
        self
    }

    pub fn catalog(&self) -> &DataCatalog {
        &self.catalog
    }

    pub fn pipelines(&self) -> &BTreeMap<String, Pipeline> {
        &self.pipelines
    }

    /// Apply the pipeline, node and tag selection in `options`.
    pub fn select(&self, options: &RunOptions) -> Result<Pipeline> {
        let mut pipeline = self
            .pipelines
            .get(&options.pipeline)
            .cloned()
            .ok_or_else(|| PipelineError::UnknownPipeline {
                name: options.pipeline.clone(),
            })?;
        if !options.node_names.is_empty() {
            pipeline = pipeline.only_nodes(&options.node_names)?;
        }
        if !options.tags.is_empty() {
            pipeline = pipeline.only_nodes_with_tags(&options.tags);
        }
        if pipeline.is_empty() {
            return Err(PipelineError::EmptySelection);
        }
        Ok(pipeline)
    }

    /// Run the selected nodes once, in order.
    ///
    /// Each node reads its input from an earlier node's output when one
    /// produced it, otherwise from the catalog. Outputs are saved to the
    /// catalog. The first failing node aborts the run.
    pub fn run(&mut self, options: &RunOptions) -> Result<RunSummary> {
        let pipeline = self.select(options)?;
        debug!(
            env = %self.env,
            pipeline = %options.pipeline,
            nodes = pipeline.len(),
            "nodes selected"
        );
        let started = Instant::now();
        let mut produced: HashMap<String, DataFrame> = HashMap::new();
        let mut nodes = Vec::with_capacity(pipeline.len());

        for node in pipeline.nodes() {
            let _span = info_span!("node", node = node.name()).entered();
            let node_started = Instant::now();

            let input = match produced.get(node.input()) {
                Some(df) => df.clone(),
                None => self.catalog.load(node.input())?,
            };
            let input_rows = input.height();
            info!(dataset = node.input(), rows = input_rows, "running node");

            let output = node.run(input).map_err(|source| PipelineError::Node {
                node: node.name().to_string(),
                source,
            })?;
            let output_rows = output.height();
            self.catalog.save(node.output(), output.clone())?;
            produced.insert(node.output().to_string(), output);

            let elapsed = node_started.elapsed();
            info!(
                dataset = node.output(),
                rows = output_rows,
                elapsed_ms = elapsed_ms(elapsed),
                "node completed"
            );
            nodes.push(NodeRun {
                node: node.name().to_string(),
                input: node.input().to_string(),
                output: node.output().to_string(),
                input_rows,
                output_rows,
                elapsed,
            });
        }

        Ok(RunSummary {
            pipeline: options.pipeline.clone(),
            nodes,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NodeError;
    use crate::node::Node;
    use polars::prelude::*;

    fn passthrough(df: DataFrame) -> std::result::Result<DataFrame, NodeError> {
        Ok(df)
    }

    fn head(df: DataFrame) -> std::result::Result<DataFrame, NodeError> {
        Ok(df.head(Some(1)))
    }

    fn chained_session() -> Session {
        let mut catalog = DataCatalog::new(".");
        catalog.add_memory("raw", df! { "a" => &["1", "2", "3"] }.unwrap());
        let pipeline = Pipeline::new(vec![
            Node::new(passthrough, "raw", "mid", "first").with_tag("a"),
            Node::new(head, "mid", "out", "second").with_tag("b"),
        ]);
        let mut pipelines = BTreeMap::new();
        pipelines.insert(DEFAULT_PIPELINE.to_string(), pipeline);
        Session::with_catalog("test", catalog).with_pipelines(pipelines)
    }

    #[test]
    fn outputs_feed_later_nodes() {
        let mut session = chained_session();
        let summary = session.run(&RunOptions::default()).unwrap();
        assert_eq!(summary.nodes.len(), 2);
        assert_eq!(summary.nodes[1].input_rows, 3);
        assert_eq!(summary.nodes[1].output_rows, 1);
        assert_eq!(session.catalog().load("out").unwrap().height(), 1);
    }

    #[test]
    fn tag_selection() {
        let session = chained_session();
        let options = RunOptions {
            tags: vec!["b".into()],
            ..RunOptions::default()
        };
        let selected = session.select(&options).unwrap();
        assert_eq!(selected.node_names().collect::<Vec<_>>(), ["second"]);
    }

    #[test]
    fn empty_selection_is_an_error() {
        let session = chained_session();
        let options = RunOptions {
            tags: vec!["missing".into()],
            ..RunOptions::default()
        };
        assert!(matches!(
            session.select(&options),
            Err(PipelineError::EmptySelection)
        ));
    }

    #[test]
    fn unknown_pipeline() {
        let session = chained_session();
        let options = RunOptions {
            pipeline: "nope".into(),
            ..RunOptions::default()
        };
        assert!(matches!(
            session.select(&options),
            Err(PipelineError::UnknownPipeline { .. })
        ));
    }

    #[test]
    fn elapsed_ms_saturates() {
        assert_eq!(elapsed_ms(Duration::from_micros(2_500)), 2);
        assert_eq!(elapsed_ms(Duration::MAX), u64::MAX);
    }

    #[test]
    fn missing_input_aborts() {
        let mut session = Session::with_catalog("test", DataCatalog::new("."));
        let err = session.run(&RunOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Catalog(_)));
    }
}
