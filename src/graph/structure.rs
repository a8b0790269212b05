//! The connection graph.
//!
//! [`ConnectionGraph`] owns the node registry and the directed edge set over
//! its members. It is the single entry point for mutations so that:
//! - the adjacency dimension always equals the registry size
//! - role hooks see every edge created or removed
//! - every change and advisory reaches the event sink

use crate::core::error::{GraphError, GraphResult, NodeId, RenderResult};
use crate::core::node::Node;
use crate::graph::adjacency::{Adjacency, AdjacencyMatrix};
use crate::graph::connection::{ConnectOutcome, DisconnectOutcome, Edge, NodeRef};
use crate::graph::events::{EventSink, GraphEvent, LogSink};
use crate::graph::options::GraphOptions;
use crate::graph::registry::NodeRegistry;
use crate::graph::render::GraphRenderer;
use std::fmt;

/// Change in registry size that the edge set must follow.
enum Resize {
    Grow(NodeId),
    Shrink(NodeId),
}

/// A directed graph of registered nodes.
pub struct ConnectionGraph {
    registry: NodeRegistry,
    adjacency: Adjacency,
    options: GraphOptions,
    sink: Box<dyn EventSink>,
}

impl fmt::Debug for ConnectionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGraph")
            .field("registry", &self.registry)
            .field("adjacency", &self.adjacency)
            .field("options", &self.options)
            .finish()
    }
}

impl fmt::Display for ConnectionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes: Vec<String> = self.registry.iter().map(|n| n.to_string()).collect();
        write!(f, "Graph([{}])", nodes.join(", "))
    }
}

impl ConnectionGraph {
    /// Create an empty graph with default options, logging through `log`.
    pub fn new() -> Self {
        Self::with_options(GraphOptions::default())
    }

    /// Create an empty graph with the given options.
    pub fn with_options(options: GraphOptions) -> Self {
        let mut sink: Box<dyn EventSink> = Box::new(LogSink::default());
        sink.open(options.name.as_deref());
        Self {
            registry: NodeRegistry::new(),
            adjacency: Adjacency::new(),
            options,
            sink,
        }
    }

    /// Replace the event sink. The old sink is closed, the new one opened.
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink.close();
        self.sink = Box::new(sink);
        self.sink.open(self.options.name.as_deref());
        self
    }

    /// The options this graph was built with.
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// The underlying registry.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    // ========================================================================
    // Node Management
    // ========================================================================

    /// Register a node.
    pub fn add(&mut self, node: Node) -> GraphResult<NodeId> {
        let name = node.name.clone();
        let id = self.registry.add(node)?;
        self.resize(Resize::Grow(id));
        self.emit(GraphEvent::NodeAdded { id, name });
        Ok(id)
    }

    /// Remove a node by id or by position, along with all its edges.
    pub fn remove(&mut self, node: impl Into<NodeRef>) -> GraphResult<Node> {
        let id = self.registry.resolve(node)?;

        // Peers hear about the edges they lose before the node goes.
        let outgoing = self.adjacency.successors(id);
        let incoming = self.adjacency.predecessors(id);
        for &target in &outgoing {
            self.notify(id, target, false);
        }
        for &source in &incoming {
            self.notify(source, id, false);
        }

        let removed = self.registry.remove(id)?;
        self.resize(Resize::Shrink(id));
        self.emit(GraphEvent::NodeRemoved {
            id,
            name: removed.name.clone(),
        });
        Ok(removed)
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> GraphResult<&Node> {
        self.registry.get(id)
    }

    /// Get a node mutably by id.
    pub fn get_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.registry.get_mut(id)
    }

    /// Check if a node is registered.
    pub fn contains(&self, id: NodeId) -> bool {
        self.registry.contains(id)
    }

    /// Nodes in their current order.
    pub fn list(&self) -> Vec<&Node> {
        self.registry.list()
    }

    /// Current position of a node.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.registry.position(id)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ========================================================================
    // Connection Management
    // ========================================================================

    /// Create the edge `source -> target`.
    ///
    /// Asking for an edge that already exists is not an error: the graph is
    /// left alone and [`ConnectOutcome::AlreadyConnected`] is returned.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> GraphResult<ConnectOutcome> {
        self.require_known(source, target)?;

        let (source_label, target_label) = self.labels(source, target);
        if self.adjacency.insert(source, target) {
            self.notify(source, target, true);
            self.emit(GraphEvent::Connected {
                source: source_label,
                target: target_label,
            });
            Ok(ConnectOutcome::Connected)
        } else {
            self.emit(GraphEvent::AlreadyConnected {
                source: source_label,
                target: target_label,
            });
            Ok(ConnectOutcome::AlreadyConnected)
        }
    }

    /// Remove the edge `source -> target`.
    ///
    /// Removing an edge that does not exist is not an error: the graph is
    /// left alone and [`DisconnectOutcome::NotConnected`] is returned.
    pub fn disconnect(&mut self, source: NodeId, target: NodeId) -> GraphResult<DisconnectOutcome> {
        self.require_known(source, target)?;

        let (source_label, target_label) = self.labels(source, target);
        if self.adjacency.remove(source, target) {
            // Peers stay linked while the reverse edge exists.
            if !self.adjacency.contains(target, source) {
                self.notify(source, target, false);
            }
            self.emit(GraphEvent::Disconnected {
                source: source_label,
                target: target_label,
            });
            Ok(DisconnectOutcome::Disconnected)
        } else {
            self.emit(GraphEvent::NotConnected {
                source: source_label,
                target: target_label,
            });
            Ok(DisconnectOutcome::NotConnected)
        }
    }

    /// Whether `source -> target` exists. Unknown ids are never connected.
    pub fn is_connected(&self, source: NodeId, target: NodeId) -> bool {
        self.adjacency.contains(source, target)
    }

    /// All edges except self-loops, ordered by source then target position.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let registry = &self.registry;
        let adjacency = &self.adjacency;
        registry.ids().flat_map(move |source| {
            registry
                .ids()
                .filter(move |&target| source != target && adjacency.contains(source, target))
                .map(move |target| Edge::new(source, target))
        })
    }

    /// Number of edges, self-loops excluded.
    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    /// Nodes `id` has an edge to.
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.adjacency.successors(id)
    }

    /// Nodes with an edge to `id`.
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.adjacency.predecessors(id)
    }

    /// Positional boolean view of the edge set.
    pub fn adjacency_matrix(&self) -> AdjacencyMatrix {
        AdjacencyMatrix::from_adjacency(&self.adjacency, self.registry.ids().collect())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Bring every node up. Returns how many changed status.
    pub fn start(&mut self) -> usize {
        let mut started = Vec::new();
        for node in self.registry.iter_mut() {
            if node.up() {
                started.push(GraphEvent::NodeStarted {
                    id: node.id(),
                    name: node.name.clone(),
                });
            }
        }
        let count = started.len();
        started.into_iter().for_each(|event| self.emit(event));
        count
    }

    /// Take every node down. Returns how many changed status.
    pub fn stop(&mut self) -> usize {
        let mut stopped = Vec::new();
        for node in self.registry.iter_mut() {
            if node.down() {
                stopped.push(GraphEvent::NodeStopped {
                    id: node.id(),
                    name: node.name.clone(),
                });
            }
        }
        let count = stopped.len();
        stopped.into_iter().for_each(|event| self.emit(event));
        count
    }

    // ========================================================================
    // Presentation
    // ========================================================================

    /// Hand the node and edge lists to a rendering collaborator.
    pub fn render<R: GraphRenderer>(&self, renderer: &mut R) -> RenderResult<R::Output> {
        let nodes = self.registry.list();
        let edges: Vec<Edge> = self.edges().collect();
        renderer.render(&nodes, &edges)
    }

    /// Numbered listing of the nodes in their current order.
    pub fn describe_nodes(&self) -> String {
        let rule = "=".repeat(87);
        let mut out = format!("{} Nodes {}\n", "=".repeat(40), "=".repeat(40));
        for (i, node) in self.registry.iter().enumerate() {
            out.push_str(&format!(
                "{}: {} [{}] {:?} {}\n",
                i,
                node,
                node.role().kind(),
                node.status(),
                node.id()
            ));
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn resize(&mut self, delta: Resize) {
        match delta {
            Resize::Grow(id) => {
                self.adjacency.grow(id, self.options.self_loops);
            }
            Resize::Shrink(id) => {
                self.adjacency.shrink(id);
            }
        }
        debug_assert_eq!(self.adjacency.dimension(), self.registry.len());
    }

    fn require_known(&self, source: NodeId, target: NodeId) -> GraphResult<()> {
        for id in [source, target] {
            if !self.registry.contains(id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        Ok(())
    }

    fn labels(&self, source: NodeId, target: NodeId) -> (String, String) {
        let label = |id: NodeId| {
            self.registry
                .get(id)
                .map(|n| n.to_string())
                .unwrap_or_else(|_| id.to_string())
        };
        (label(source), label(target))
    }

    /// Run connect or disconnect hooks on both ends of an edge.
    fn notify(&mut self, source: NodeId, target: NodeId, connected: bool) {
        for (node, peer) in [(source, target), (target, source)] {
            if let Ok(node) = self.registry.get_mut(node) {
                if connected {
                    node.notify_connect(peer);
                } else {
                    node.notify_disconnect(peer);
                }
            }
            if source == target {
                break;
            }
        }
    }

    fn emit(&mut self, event: GraphEvent) {
        self.sink.record(&event);
    }
}

impl Default for ConnectionGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConnectionGraph {
    fn drop(&mut self) {
        self.sink.close();
    }
}
