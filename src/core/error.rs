//! Error types for Polysophia.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Be raised synchronously at the point of violation
//! - Include the offending node or index
//! - Convert into the top-level [`PolysophiaError`] with `?`

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::core::role::RoleKind;

/// Unique identifier for a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a node ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type for Polysophia.
#[derive(Error, Debug)]
pub enum PolysophiaError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Processor error: {0}")]
    Processor(#[from] ProcessorError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised by the node registry and the connection graph.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphError {
    #[error("Node {0} is already registered")]
    DuplicateNode(NodeId),

    #[error("Node {0} not found")]
    NotFound(NodeId),

    #[error("Index {index} is out of bounds for a registry of {len} node(s)")]
    InvalidIndex { index: usize, len: usize },

    #[error("Node {0} is not registered in this graph")]
    UnknownNode(NodeId),
}

/// Errors from node role operations.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Node '{name}' is a {actual} node, expected a {expected} node")]
    RoleMismatch {
        name: String,
        expected: RoleKind,
        actual: RoleKind,
    },

    #[error("Node '{0}' has no processor attached")]
    MissingProcessor(String),

    #[error("Node '{0}' has no transport attached")]
    MissingTransport(String),

    #[error(transparent)]
    Processor(#[from] ProcessorError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors raised while invoking a processor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessorError {
    #[error("Processor '{processor}' is missing argument '{argument}'")]
    MissingArgument { processor: String, argument: String },

    #[error("Processor '{processor}' got an invalid argument '{argument}': {reason}")]
    InvalidArgument {
        processor: String,
        argument: String,
        reason: String,
    },

    #[error("Processor '{processor}' failed: {reason}")]
    Failed { processor: String, reason: String },
}

/// Errors from transport collaborators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Transport to {0} is closed")]
    Closed(String),

    #[error("Failed to encode packet: {0}")]
    Encode(String),

    #[error("Failed to decode packet: {0}")]
    Decode(String),
}

/// Errors from render collaborators.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write rendering: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl GraphError {
    /// Get the node ID this error refers to, if any.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            GraphError::DuplicateNode(id)
            | GraphError::NotFound(id)
            | GraphError::UnknownNode(id) => Some(*id),
            GraphError::InvalidIndex { .. } => None,
        }
    }
}

/// Result type alias for Polysophia operations.
pub type PolysophiaResult<T> = Result<T, PolysophiaError>;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for node role operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// Result type alias for processor invocations.
pub type ProcessorResult<T> = Result<T, ProcessorError>;

/// Result type alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type alias for render collaborators.
pub type RenderResult<T> = Result<T, RenderError>;
