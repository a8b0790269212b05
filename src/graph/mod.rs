//! Graph module for wiring nodes together.
//!
//! A connection graph is a directed graph where nodes are registered units
//! and edges record which node feeds which.

pub mod registry;
pub mod connection;
pub mod adjacency;
pub mod events;
pub mod options;
pub mod render;
pub mod structure;

// Re-export commonly used types
pub use registry::NodeRegistry;
pub use connection::{ConnectOutcome, DisconnectOutcome, Edge, NodeRef};
pub use adjacency::AdjacencyMatrix;
pub use events::{EventSink, GraphEvent, LogSink, RecordingSink};
pub use options::GraphOptions;
pub use render::{DotFile, DotRenderer, GraphRenderer};
pub use structure::ConnectionGraph;
