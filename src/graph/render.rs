//! Graph rendering collaborators.
//!
//! The graph hands a node list and an edge list to a [`GraphRenderer`] and
//! does no drawing itself. [`DotRenderer`] emits Graphviz DOT text and
//! [`DotFile`] writes that text to disk for `dot -Tpng` to pick up.

use crate::core::error::{RenderError, RenderResult};
use crate::core::node::Node;
use crate::graph::connection::Edge;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Turns a node list and an edge list into some artifact.
pub trait GraphRenderer {
    /// What rendering produces.
    type Output;

    /// Render. Self-loops are never included in `edges`.
    fn render(&mut self, nodes: &[&Node], edges: &[Edge]) -> RenderResult<Self::Output>;
}

/// Renders Graphviz DOT text.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    name: String,
}

impl DotRenderer {
    /// Create a renderer for a digraph with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for DotRenderer {
    fn default() -> Self {
        Self::new("graph")
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

impl GraphRenderer for DotRenderer {
    type Output = String;

    fn render(&mut self, nodes: &[&Node], edges: &[Edge]) -> RenderResult<String> {
        // Names are not unique, so statements use positional keys and the
        // name only as a label.
        let keys: HashMap<_, _> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id(), format!("n{}", i)))
            .collect();

        let mut dot = String::new();
        let fmt_err = |e: std::fmt::Error| RenderError::Other(e.to_string());
        writeln!(dot, "digraph {} {{", quote(&self.name)).map_err(fmt_err)?;
        for (i, node) in nodes.iter().enumerate() {
            writeln!(dot, "    n{} [label={}];", i, quote(&node.name)).map_err(fmt_err)?;
        }
        for edge in edges {
            let (Some(source), Some(target)) = (keys.get(&edge.source), keys.get(&edge.target))
            else {
                return Err(RenderError::Other(format!(
                    "edge {} -> {} references a node outside the node list",
                    edge.source, edge.target
                )));
            };
            writeln!(dot, "    {} -> {};", source, target).map_err(fmt_err)?;
        }
        dot.push_str("}\n");
        Ok(dot)
    }
}

/// Writes DOT text to a file and returns its path.
#[derive(Debug, Clone)]
pub struct DotFile {
    path: PathBuf,
    dot: DotRenderer,
}

impl DotFile {
    /// Write to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dot: DotRenderer::default(),
        }
    }

    /// Use a custom digraph name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.dot = DotRenderer::new(name);
        self
    }
}

impl GraphRenderer for DotFile {
    type Output = PathBuf;

    fn render(&mut self, nodes: &[&Node], edges: &[Edge]) -> RenderResult<PathBuf> {
        let text = self.dot.render(nodes, edges)?;
        std::fs::write(&self.path, text)?;
        Ok(self.path.clone())
    }
}
