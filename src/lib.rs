//! # Polysophia - Node-based Message Passing
//!
//! Polysophia lets you declare computational nodes (publishers, subscribers,
//! servers, clients) and wire them into a directed graph that describes how
//! data flows between them.
//!
//! ## Features
//!
//! - **Node Registry**: Uniquely identified nodes, addressable by id or position
//! - **Connection Graph**: Directed edges with connect/disconnect advisories
//! - **Typed Roles**: Lifecycle hooks per role instead of ad-hoc callbacks
//! - **Pluggable Collaborators**: Processors, transports, renderers and event sinks are traits
//!
//! ## Quick Start
//!
//! ```rust
//! use polysophia::prelude::*;
//!
//! let mut graph = ConnectionGraph::new();
//!
//! let a = graph.add(Node::new("A")).unwrap();
//! let b = graph.add(Node::new("B")).unwrap();
//!
//! graph.connect(a, b).unwrap();
//! assert_eq!(graph.edges().collect::<Vec<_>>(), vec![Edge::new(a, b)]);
//!
//! graph.disconnect(a, b).unwrap();
//! assert_eq!(graph.edges().count(), 0);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Values, packets, nodes, roles, processors, transports, errors
//! - [`graph`]: Node registry, edge storage, events, options and rendering

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod graph;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use polysophia::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::context::Inputs;
    pub use crate::core::memory::{Buffer, Memory};
    pub use crate::core::packet::DataPacket;
    pub use crate::core::types::Value;

    // Nodes and roles
    pub use crate::core::node::{Node, NodeStatus};
    pub use crate::core::role::{Client, Lifecycle, Publisher, Role, RoleKind, Server, Subscriber};

    // Collaborators
    pub use crate::core::processor::{
        FnProcessor, IdentityProcessor, PrintProcessor, Processor, SharedProcessor,
    };
    pub use crate::core::transport::{LoopbackTransport, Transport};

    // Errors
    pub use crate::core::error::{
        ConfigError, GraphError, NodeError, NodeId, PolysophiaError, PolysophiaResult,
        ProcessorError, RenderError, TransportError,
    };

    // Graph
    pub use crate::graph::adjacency::AdjacencyMatrix;
    pub use crate::graph::connection::{ConnectOutcome, DisconnectOutcome, Edge, NodeRef};
    pub use crate::graph::events::{EventSink, GraphEvent, LogSink, RecordingSink};
    pub use crate::graph::options::GraphOptions;
    pub use crate::graph::registry::NodeRegistry;
    pub use crate::graph::render::{DotFile, DotRenderer, GraphRenderer};
    pub use crate::graph::structure::ConnectionGraph;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
