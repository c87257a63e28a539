//! Pipeline plumbing for the ETL runner.
//!
//! - **node**: [`Node`] and [`Pipeline`], an ordered list of dataset-to-dataset steps
//! - **registry**: named pipelines known to the project
//! - **catalog**: dataset declarations loaded from `conf/<env>/catalog.toml`
//! - **session**: runs a pipeline against a catalog
//! - **project**: project root layout and git head lookup
//! - **nodes**: the transform functions registered as nodes

mod error;

pub mod catalog;
pub mod node;
pub mod nodes;
pub mod project;
pub mod registry;
pub mod session;

pub use catalog::{CatalogConfig, DataCatalog, DatasetConfig};
pub use error::{CatalogError, NodeError, PipelineError, Result};
pub use node::{Node, NodeFn, Pipeline};
pub use project::{GIT_HEAD_FILE, LOCAL_HEAD, ProjectPaths};
pub use registry::{DEFAULT_PIPELINE, register_pipelines};
pub use session::{NodeRun, RunOptions, RunSummary, Session, elapsed_ms};
