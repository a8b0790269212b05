//! Edge types for the graph.

use crate::core::error::NodeId;
use crate::core::node::Node;
use serde::{Deserialize, Serialize};

/// A directed edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Where data flows from.
    pub source: NodeId,
    /// Where data flows to.
    pub target: NodeId,
}

impl Edge {
    /// Create a new edge.
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    /// Whether both ends are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((source, target): (NodeId, NodeId)) -> Self {
        Self::new(source, target)
    }
}

/// Result of a connect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// The edge was created.
    Connected,
    /// The edge already existed; nothing changed.
    AlreadyConnected,
}

/// Result of a disconnect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// The edge was removed.
    Disconnected,
    /// There was no edge; nothing changed.
    NotConnected,
}

/// Reference to a registered node, by id or by position.
///
/// Positions are only valid until the next add or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    /// By identity.
    Id(NodeId),
    /// By position in the current ordering.
    Index(usize),
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        NodeRef::Id(id)
    }
}

impl From<usize> for NodeRef {
    fn from(index: usize) -> Self {
        NodeRef::Index(index)
    }
}

impl From<&Node> for NodeRef {
    fn from(node: &Node) -> Self {
        NodeRef::Id(node.id())
    }
}
