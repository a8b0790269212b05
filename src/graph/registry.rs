//! The node registry.
//!
//! Holds nodes keyed by id. Uses IndexMap so iteration order is stable
//! between mutations and nodes can be addressed by position. Removal shifts
//! later positions down by one.

use crate::core::error::{GraphError, GraphResult, NodeId};
use crate::core::node::Node;
use crate::graph::connection::NodeRef;
use indexmap::IndexMap;

/// Set of uniquely identified nodes.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: IndexMap<NodeId, Node>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Fails if its id is already registered.
    pub fn add(&mut self, node: Node) -> GraphResult<NodeId> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Remove a node by id or by position.
    pub fn remove(&mut self, node: impl Into<NodeRef>) -> GraphResult<Node> {
        match node.into() {
            NodeRef::Id(id) => self.nodes.shift_remove(&id).ok_or(GraphError::NotFound(id)),
            NodeRef::Index(index) => self
                .nodes
                .shift_remove_index(index)
                .map(|(_, node)| node)
                .ok_or(GraphError::InvalidIndex {
                    index,
                    len: self.nodes.len(),
                }),
        }
    }

    /// Resolve a reference to an id without removing anything.
    pub fn resolve(&self, node: impl Into<NodeRef>) -> GraphResult<NodeId> {
        match node.into() {
            NodeRef::Id(id) if self.nodes.contains_key(&id) => Ok(id),
            NodeRef::Id(id) => Err(GraphError::NotFound(id)),
            NodeRef::Index(index) => self
                .nodes
                .get_index(index)
                .map(|(id, _)| *id)
                .ok_or(GraphError::InvalidIndex {
                    index,
                    len: self.nodes.len(),
                }),
        }
    }

    /// Nodes in their current order.
    pub fn list(&self) -> Vec<&Node> {
        self.nodes.values().collect()
    }

    /// Iterate over nodes in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate mutably over nodes in their current order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Node ids in their current order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes.get(&id).ok_or(GraphError::NotFound(id))
    }

    /// Get a node mutably by id.
    pub fn get_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(GraphError::NotFound(id))
    }

    /// Get a node by position.
    pub fn get_index(&self, index: usize) -> GraphResult<&Node> {
        self.nodes
            .get_index(index)
            .map(|(_, node)| node)
            .ok_or(GraphError::InvalidIndex {
                index,
                len: self.nodes.len(),
            })
    }

    /// Current position of a node.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    /// Check if a node is registered.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_by_id() {
        let mut registry = NodeRegistry::new();
        let id = registry.add(Node::new("a")).unwrap();
        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);

        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.name, "a");
        assert!(registry.is_empty());
        assert_eq!(registry.remove(id).unwrap_err(), GraphError::NotFound(id));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = NodeRegistry::new();
        let id = registry.add(Node::new("a")).unwrap();

        let result = registry.add(Node::new("b").with_id(id));
        assert_eq!(result.unwrap_err(), GraphError::DuplicateNode(id));
        assert_eq!(registry.get(id).unwrap().name, "a");
    }

    #[test]
    fn test_names_need_not_be_unique() {
        let mut registry = NodeRegistry::new();
        registry.add(Node::new("same")).unwrap();
        registry.add(Node::new("same")).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_by_index_shifts_positions() {
        let mut registry = NodeRegistry::new();
        let a = registry.add(Node::new("a")).unwrap();
        let b = registry.add(Node::new("b")).unwrap();
        let c = registry.add(Node::new("c")).unwrap();

        assert_eq!(registry.remove(1usize).unwrap().id(), b);
        assert_eq!(registry.position(a), Some(0));
        assert_eq!(registry.position(c), Some(1));

        let names: Vec<_> = registry.list().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_invalid_index() {
        let mut registry = NodeRegistry::new();
        registry.add(Node::new("a")).unwrap();
        assert_eq!(
            registry.remove(3usize).unwrap_err(),
            GraphError::InvalidIndex { index: 3, len: 1 }
        );
        assert!(registry.get_index(1).is_err());
        assert_eq!(registry.len(), 1);
    }
}
