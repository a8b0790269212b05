//! Core types and traits for the Polysophia node framework.
//!
//! This module contains the foundational types that make up a node graph
//! including:
//! - Value types and data packets
//! - Nodes, their roles and lifecycle hooks
//! - Processor and transport collaborator traits
//! - Packet memory
//! - Error types

pub mod types;
pub mod context;
pub mod error;
pub mod packet;
pub mod memory;
pub mod processor;
pub mod transport;
pub mod role;
pub mod node;

// Re-export commonly used types
pub use types::Value;
pub use context::Inputs;
pub use error::{GraphError, NodeError, NodeId, PolysophiaError, ProcessorError, TransportError};
pub use packet::DataPacket;
pub use memory::{Buffer, Memory};
pub use processor::{FnProcessor, Processor, SharedProcessor};
pub use transport::{LoopbackTransport, Transport};
pub use role::{Lifecycle, Role, RoleKind};
pub use node::{Node, NodeStatus};
