//! Project pipeline registry.

use std::collections::BTreeMap;

use crate::node::Pipeline;
use crate::nodes::intermediate;

/// Name of the pipeline run when none is requested.
pub const DEFAULT_PIPELINE: &str = "__default__";

/// Every pipeline the project defines, keyed by name.
///
/// `__default__` runs the same nodes as `main`.
pub fn register_pipelines() -> BTreeMap<String, Pipeline> {
    let main = Pipeline::new(vec![intermediate::node()]);

    let mut pipelines = BTreeMap::new();
    pipelines.insert(DEFAULT_PIPELINE.to_string(), main.clone());
    pipelines.insert("main".to_string(), main);
    pipelines
}
