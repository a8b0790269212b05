//! Adjacency storage.
//!
//! Edges live in a petgraph `StableDiGraph` whose node weights are node ids.
//! Stable indices survive removal of other nodes, so nothing has to be
//! renumbered when the registry shrinks. [`AdjacencyMatrix`] is the
//! positional boolean view derived from it on demand.

use crate::core::error::NodeId;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;

/// Index-stable edge set keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    arena: StableDiGraph<NodeId, ()>,
    slots: HashMap<NodeId, NodeIndex>,
}

impl Adjacency {
    /// Create an empty edge set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of node slots.
    pub fn dimension(&self) -> usize {
        self.arena.node_count()
    }

    /// Allocate a slot for `id`, optionally marking its self-loop.
    /// Returns `false` if the slot already exists.
    pub fn grow(&mut self, id: NodeId, self_loop: bool) -> bool {
        if self.slots.contains_key(&id) {
            return false;
        }
        let slot = self.arena.add_node(id);
        if self_loop {
            self.arena.add_edge(slot, slot, ());
        }
        self.slots.insert(id, slot);
        true
    }

    /// Free the slot for `id` along with every edge touching it.
    pub fn shrink(&mut self, id: NodeId) -> bool {
        match self.slots.remove(&id) {
            Some(slot) => self.arena.remove_node(slot).is_some(),
            None => false,
        }
    }

    /// Set `source -> target`. Returns `false` if it was already set or either
    /// end has no slot.
    pub fn insert(&mut self, source: NodeId, target: NodeId) -> bool {
        match (self.slots.get(&source), self.slots.get(&target)) {
            (Some(&a), Some(&b)) if self.arena.find_edge(a, b).is_none() => {
                self.arena.add_edge(a, b, ());
                true
            }
            _ => false,
        }
    }

    /// Clear `source -> target`. Returns `false` if it was not set.
    pub fn remove(&mut self, source: NodeId, target: NodeId) -> bool {
        let edge = match (self.slots.get(&source), self.slots.get(&target)) {
            (Some(&a), Some(&b)) => self.arena.find_edge(a, b),
            _ => None,
        };
        match edge {
            Some(edge) => self.arena.remove_edge(edge).is_some(),
            None => false,
        }
    }

    /// Whether `source -> target` is set.
    pub fn contains(&self, source: NodeId, target: NodeId) -> bool {
        match (self.slots.get(&source), self.slots.get(&target)) {
            (Some(&a), Some(&b)) => self.arena.contains_edge(a, b),
            _ => false,
        }
    }

    /// Nodes with an edge from `id`, self excluded.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Nodes with an edge to `id`, self excluded.
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Number of set edges that are not self-loops.
    pub fn edge_count(&self) -> usize {
        self.arena
            .edge_indices()
            .filter_map(|e| self.arena.edge_endpoints(e))
            .filter(|(a, b)| a != b)
            .count()
    }

    fn neighbors(&self, id: NodeId, direction: Direction) -> Vec<NodeId> {
        let Some(&slot) = self.slots.get(&id) else {
            return Vec::new();
        };
        let mut peers: Vec<NodeId> = self
            .arena
            .neighbors_directed(slot, direction)
            .filter(|&n| n != slot)
            .map(|n| self.arena[n])
            .collect();
        // petgraph yields neighbours newest-edge first.
        peers.reverse();
        peers
    }
}

/// Dense boolean view of the edge set, indexed by registry position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    order: Vec<NodeId>,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    /// Build the view for nodes in `order`.
    pub fn from_adjacency(adjacency: &Adjacency, order: Vec<NodeId>) -> Self {
        let cells = order
            .iter()
            .flat_map(|&a| order.iter().map(move |&b| adjacency.contains(a, b)))
            .collect();
        Self { order, cells }
    }

    /// Rows (and columns) in the matrix.
    pub fn dimension(&self) -> usize {
        self.order.len()
    }

    /// Node id at a position.
    pub fn node_at(&self, index: usize) -> Option<NodeId> {
        self.order.get(index).copied()
    }

    /// Cell value; out-of-range positions read as `false`.
    pub fn get(&self, row: usize, col: usize) -> bool {
        let n = self.dimension();
        row < n && col < n && self.cells[row * n + col]
    }

    /// One row of the matrix.
    pub fn row(&self, row: usize) -> &[bool] {
        let n = self.dimension();
        if row < n {
            &self.cells[row * n..(row + 1) * n]
        } else {
            &[]
        }
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        (0..self.dimension()).map(move |r| self.row(r))
    }
}

impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<&str> = row.iter().map(|&set| if set { "1" } else { "0" }).collect();
            writeln!(f, "[{}]", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_marks_self_loop() {
        let mut adjacency = Adjacency::new();
        let a = NodeId::new();
        assert!(adjacency.grow(a, true));
        assert!(!adjacency.grow(a, true));
        assert!(adjacency.contains(a, a));
        assert_eq!(adjacency.edge_count(), 0);

        let b = NodeId::new();
        adjacency.grow(b, false);
        assert!(!adjacency.contains(b, b));
        assert_eq!(adjacency.dimension(), 2);
    }

    #[test]
    fn test_insert_remove() {
        let mut adjacency = Adjacency::new();
        let (a, b) = (NodeId::new(), NodeId::new());
        adjacency.grow(a, true);
        adjacency.grow(b, true);

        assert!(adjacency.insert(a, b));
        assert!(!adjacency.insert(a, b));
        assert!(adjacency.contains(a, b));
        assert!(!adjacency.contains(b, a));
        assert_eq!(adjacency.successors(a), vec![b]);
        assert_eq!(adjacency.predecessors(b), vec![a]);

        assert!(adjacency.remove(a, b));
        assert!(!adjacency.remove(a, b));
        assert!(!adjacency.insert(a, NodeId::new()));
    }

    #[test]
    fn test_shrink_drops_incident_edges_and_keeps_others() {
        let mut adjacency = Adjacency::new();
        let (a, b, c) = (NodeId::new(), NodeId::new(), NodeId::new());
        for id in [a, b, c] {
            adjacency.grow(id, true);
        }
        adjacency.insert(a, b);
        adjacency.insert(b, c);
        adjacency.insert(a, c);

        assert!(adjacency.shrink(b));
        assert!(!adjacency.shrink(b));
        assert_eq!(adjacency.dimension(), 2);
        assert!(adjacency.contains(a, c));
        assert!(adjacency.contains(c, c));
        assert_eq!(adjacency.edge_count(), 1);
    }

    #[test]
    fn test_matrix_view() {
        let mut adjacency = Adjacency::new();
        let (a, b) = (NodeId::new(), NodeId::new());
        adjacency.grow(a, true);
        adjacency.grow(b, true);
        adjacency.insert(a, b);

        let matrix = AdjacencyMatrix::from_adjacency(&adjacency, vec![a, b]);
        assert_eq!(matrix.dimension(), 2);
        assert!(matrix.get(0, 1));
        assert!(!matrix.get(1, 0));
        assert!(!matrix.get(5, 0));
        assert_eq!(matrix.node_at(1), Some(b));
        assert_eq!(matrix.to_string(), "[1 1]\n[0 1]\n");
    }
}
