//! Nodes and pipelines.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;

use crate::error::{NodeError, PipelineError, Result};

/// Function run by a node: one dataset in, one dataset out.
pub type NodeFn = fn(DataFrame) -> std::result::Result<DataFrame, NodeError>;

/// A named transform between two catalog datasets.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    input: String,
    output: String,
    tags: BTreeSet<String>,
    func: NodeFn,
}

impl Node {
    pub fn new(
        func: NodeFn,
        input: impl Into<String>,
        output: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            output: output.into(),
            tags: BTreeSet::new(),
            func,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Call the node function.
    pub fn run(&self, df: DataFrame) -> std::result::Result<DataFrame, NodeError> {
        (self.func)(df)
    }
}

/// Ordered list of nodes. Nodes run in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    nodes: Vec<Node>,
}

impl Pipeline {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(Node::name)
    }

    /// Datasets consumed but not produced by this pipeline.
    pub fn inputs(&self) -> BTreeSet<&str> {
        let produced: BTreeSet<&str> = self.nodes.iter().map(Node::output).collect();
        self.nodes
            .iter()
            .map(Node::input)
            .filter(|input| !produced.contains(input))
            .collect()
    }

    /// Datasets produced by this pipeline.
    pub fn outputs(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(Node::output).collect()
    }

    /// Keep only the named nodes.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownNodes`] listing every name that does not
    /// match a node.
    pub fn only_nodes<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let unknown: Vec<String> = names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| !self.nodes.iter().any(|node| node.name == *name))
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(PipelineError::UnknownNodes { names: unknown });
        }
        let nodes = self
            .nodes
            .iter()
            .filter(|node| names.iter().any(|name| name.as_ref() == node.name))
            .cloned()
            .collect();
        Ok(Self { nodes })
    }

    /// Keep nodes carrying at least one of `tags`.
    pub fn only_nodes_with_tags<S: AsRef<str>>(&self, tags: &[S]) -> Self {
        let nodes = self
            .nodes
            .iter()
            .filter(|node| tags.iter().any(|tag| node.tags.contains(tag.as_ref())))
            .cloned()
            .collect();
        Self { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(df: DataFrame) -> std::result::Result<DataFrame, NodeError> {
        Ok(df)
    }

    fn sample() -> Pipeline {
        Pipeline::new(vec![
            Node::new(identity, "raw", "clean", "clean_node").with_tag("prep"),
            Node::new(identity, "clean", "model", "model_node").with_tag("train"),
        ])
    }

    #[test]
    fn inputs_exclude_intermediate_datasets() {
        let pipeline = sample();
        assert_eq!(pipeline.inputs().into_iter().collect::<Vec<_>>(), ["raw"]);
        assert_eq!(
            pipeline.outputs().into_iter().collect::<Vec<_>>(),
            ["clean", "model"]
        );
    }

    #[test]
    fn only_nodes_keeps_registration_order() {
        let filtered = sample().only_nodes(&["model_node", "clean_node"]).unwrap();
        assert_eq!(
            filtered.node_names().collect::<Vec<_>>(),
            ["clean_node", "model_node"]
        );
    }

    #[test]
    fn only_nodes_rejects_unknown_names() {
        let err = sample().only_nodes(&["clean_node", "ghost"]).unwrap_err();
        match err {
            PipelineError::UnknownNodes { names } => assert_eq!(names, ["ghost"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tag_filter_matches_any_tag() {
        let pipeline = sample();
        assert_eq!(pipeline.only_nodes_with_tags(&["train"]).len(), 1);
        assert_eq!(pipeline.only_nodes_with_tags(&["train", "prep"]).len(), 2);
        assert!(pipeline.only_nodes_with_tags(&["none"]).is_empty());
    }
}
