//! Nodes: addressable units of the graph.
//!
//! A [`Node`] carries an immutable id, a display name, an up/down status, an
//! optional processor and a [`Role`]. Role operations (publish, poll,
//! respond, request, post) are only valid on a node of the matching role.

use crate::core::context::Inputs;
use crate::core::error::{NodeError, NodeId, NodeResult};
use crate::core::memory::Memory;
use crate::core::packet::DataPacket;
use crate::core::processor::{Processor, SharedProcessor};
use crate::core::role::{Client, Lifecycle, Publisher, Role, RoleKind, Server, Subscriber};
use crate::core::transport::Transport;
use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle status of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Running.
    Up,
    /// Not running.
    #[default]
    Down,
}

/// A node instance.
pub struct Node {
    id: NodeId,
    /// Display name; not required to be unique.
    pub name: String,
    status: NodeStatus,
    processor: Option<SharedProcessor>,
    role: Role,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("status", &self.status)
            .field("processor", &self.processor.as_ref().map(|p| p.name().to_string()))
            .field("role", &self.role)
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node('{}')", self.name)
    }
}

impl Node {
    /// Create a plain node with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            status: NodeStatus::Down,
            processor: None,
            role: Role::Plain,
        }
    }

    /// Create a publisher.
    pub fn publisher(name: impl Into<String>, processor: impl Processor + 'static) -> Self {
        Self::new(name)
            .with_role(Role::Publisher(Publisher::default()))
            .with_processor(processor)
    }

    /// Create a subscriber.
    pub fn subscriber(name: impl Into<String>, processor: impl Processor + 'static) -> Self {
        Self::new(name)
            .with_role(Role::Subscriber(Subscriber::default()))
            .with_processor(processor)
    }

    /// Create a server.
    pub fn server(name: impl Into<String>, processor: impl Processor + 'static) -> Self {
        Self::new(name)
            .with_role(Role::Server(Server::default()))
            .with_processor(processor)
    }

    /// Create a client.
    pub fn client(name: impl Into<String>, processor: impl Processor + 'static) -> Self {
        Self::new(name)
            .with_role(Role::Client(Client::default()))
            .with_processor(processor)
    }

    /// Create with a specific ID.
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    /// Attach a processor.
    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processor = Some(Arc::new(processor));
        self
    }

    /// Attach a processor that is shared with other nodes.
    pub fn with_shared_processor(mut self, processor: SharedProcessor) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Replace the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Attach a transport. Plain nodes have nowhere to put one and ignore it.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        match self.role.link_mut() {
            Some(link) => link.transport = Some(Box::new(transport)),
            None => log::warn!("Node('{}') is a plain node; transport ignored", self.name),
        }
        self
    }

    /// Attach memory to a publisher. Other roles ignore it.
    pub fn with_memory(mut self, memory: Memory) -> Self {
        match &mut self.role {
            Role::Publisher(publisher) => publisher.memory = Some(memory),
            _ => log::warn!("Node('{}') is not a publisher; memory ignored", self.name),
        }
        self
    }

    /// The node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current status.
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    /// Whether the node is up.
    pub fn is_up(&self) -> bool {
        self.status == NodeStatus::Up
    }

    /// The attached processor.
    pub fn processor(&self) -> Option<&SharedProcessor> {
        self.processor.as_ref()
    }

    /// The node's role.
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// The node's role, mutably.
    pub fn role_mut(&mut self) -> &mut Role {
        &mut self.role
    }

    /// The publisher memory, if this is a publisher with memory.
    pub fn memory_mut(&mut self) -> Option<&mut Memory> {
        match &mut self.role {
            Role::Publisher(publisher) => publisher.memory.as_mut(),
            _ => None,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Bring the node up. Returns `false` if it already was.
    pub fn up(&mut self) -> bool {
        if self.is_up() {
            return false;
        }
        self.status = NodeStatus::Up;
        self.role.on_start(self.id, &self.name);
        true
    }

    /// Take the node down. Returns `false` if it already was.
    pub fn down(&mut self) -> bool {
        if !self.is_up() {
            return false;
        }
        self.status = NodeStatus::Down;
        self.role.on_stop(self.id, &self.name);
        true
    }

    pub(crate) fn notify_connect(&mut self, peer: NodeId) {
        self.role.on_connect(self.id, &self.name, peer);
    }

    pub(crate) fn notify_disconnect(&mut self, peer: NodeId) {
        self.role.on_disconnect(self.id, &self.name, peer);
    }

    // ========================================================================
    // Processing
    // ========================================================================

    /// Call the attached processor.
    pub fn invoke(&self, inputs: &Inputs) -> NodeResult<Option<Value>> {
        let processor = self
            .processor
            .as_ref()
            .ok_or_else(|| NodeError::MissingProcessor(self.name.clone()))?;
        Ok(processor.call(inputs)?)
    }

    /// Publish once: feed the newest remembered packet and `kwargs` to the
    /// processor, then send any output.
    pub fn publish_once(&mut self, kwargs: Inputs) -> NodeResult<Option<Value>> {
        let mut inputs = Inputs::new();
        if let Role::Publisher(publisher) = &self.role {
            if let Some(packet) = publisher.memory.as_ref().and_then(|m| m.newest(&self.name)) {
                inputs.insert("data", packet.data.clone());
            }
        } else {
            return Err(self.role_mismatch(RoleKind::Publisher));
        }
        inputs.merge(kwargs);

        let output = self.invoke(&inputs)?;
        if let Some(value) = &output {
            let name = self.name.clone();
            if let Role::Publisher(publisher) = &mut self.role {
                let transport = publisher
                    .link
                    .transport
                    .as_mut()
                    .ok_or(NodeError::MissingTransport(name))?;
                transport.send(DataPacket::new(value.clone()))?;
                publisher.published += 1;
            }
        }
        Ok(output)
    }

    /// Drain waiting packets into the processor. Returns how many were handled.
    pub fn poll(&mut self) -> NodeResult<usize> {
        self.expect_role(RoleKind::Subscriber)?;
        let mut handled = 0;
        while let Some(packet) = self.receive()? {
            self.invoke(&Inputs::new().with("data", packet.data))?;
            handled += 1;
            if let Role::Subscriber(subscriber) = &mut self.role {
                subscriber.received += 1;
            }
        }
        Ok(handled)
    }

    /// Process a request packet and send the output back as the reply.
    pub fn respond(&mut self, packet: DataPacket) -> NodeResult<Option<Value>> {
        self.expect_role(RoleKind::Server)?;
        let output = self.invoke(&Inputs::new().with("data", packet.data))?;
        if let Some(value) = &output {
            self.send(DataPacket::new(value.clone()))?;
        }
        Ok(output)
    }

    /// Receive one packet, if any, and process it.
    pub fn request(&mut self) -> NodeResult<Option<Value>> {
        self.expect_role(RoleKind::Client)?;
        match self.receive()? {
            Some(packet) => self.invoke(&Inputs::new().with("data", packet.data)),
            None => Ok(None),
        }
    }

    /// Send a packet to the server.
    pub fn post(&mut self, packet: DataPacket) -> NodeResult<()> {
        self.expect_role(RoleKind::Client)?;
        self.send(packet)
    }

    fn transport(&mut self) -> NodeResult<&mut Box<dyn Transport>> {
        let name = &self.name;
        self.role
            .link_mut()
            .and_then(|link| link.transport.as_mut())
            .ok_or_else(|| NodeError::MissingTransport(name.clone()))
    }

    fn send(&mut self, packet: DataPacket) -> NodeResult<()> {
        Ok(self.transport()?.send(packet)?)
    }

    fn receive(&mut self) -> NodeResult<Option<DataPacket>> {
        Ok(self.transport()?.receive()?)
    }

    fn expect_role(&self, expected: RoleKind) -> NodeResult<()> {
        if self.role.kind() == expected {
            Ok(())
        } else {
            Err(self.role_mismatch(expected))
        }
    }

    fn role_mismatch(&self, expected: RoleKind) -> NodeError {
        NodeError::RoleMismatch {
            name: self.name.clone(),
            expected,
            actual: self.role.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::processor::{FnProcessor, IdentityProcessor};
    use crate::core::transport::LoopbackTransport;

    fn upper() -> impl Processor {
        FnProcessor::new("upper", |inputs: &Inputs| {
            let text = inputs.require_str("upper", "data")?;
            Ok(Some(Value::String(text.to_uppercase())))
        })
    }

    #[test]
    fn test_new_node_is_down() {
        let node = Node::new("node1");
        assert_eq!(node.status(), NodeStatus::Down);
        assert_eq!(node.role().kind(), RoleKind::Plain);
        assert_eq!(node.to_string(), "Node('node1')");
    }

    #[test]
    fn test_up_down() {
        let mut node = Node::new("node1");
        assert!(node.up());
        assert!(!node.up());
        assert!(node.is_up());
        assert!(node.down());
        assert!(!node.down());
    }

    #[test]
    fn test_invoke_without_processor() {
        let node = Node::new("bare");
        assert!(matches!(
            node.invoke(&Inputs::new()),
            Err(NodeError::MissingProcessor(name)) if name == "bare"
        ));
    }

    #[test]
    fn test_publish_reads_memory_and_sends() {
        let (tx, mut rx) = LoopbackTransport::pair("loopback://text");
        let mut memory = Memory::new();
        memory.push("pub", DataPacket::text("hello"));

        let mut node = Node::publisher("pub", upper())
            .with_memory(memory)
            .with_transport(tx);

        let out = node.publish_once(Inputs::new()).unwrap();
        assert_eq!(out, Some(Value::from("HELLO")));
        assert_eq!(rx.receive().unwrap().unwrap().as_text(), Some("HELLO"));
    }

    #[test]
    fn test_publish_kwargs_override_memory() {
        let (tx, _rx) = LoopbackTransport::pair("loopback://text");
        let mut memory = Memory::new();
        memory.push("pub", DataPacket::text("stale"));
        let mut node = Node::publisher("pub", IdentityProcessor)
            .with_memory(memory)
            .with_transport(tx);

        let out = node.publish_once(Inputs::new().with("data", "fresh")).unwrap();
        assert_eq!(out, Some(Value::from("fresh")));
    }

    #[test]
    fn test_publish_without_transport() {
        let mut node = Node::publisher("pub", IdentityProcessor);
        let result = node.publish_once(Inputs::new().with("data", 1i64));
        assert!(matches!(result, Err(NodeError::MissingTransport(_))));
    }

    #[test]
    fn test_subscriber_poll() {
        let (mut tx, rx) = LoopbackTransport::pair("loopback://text");
        tx.send(DataPacket::text("a")).unwrap();
        tx.send(DataPacket::text("b")).unwrap();

        let mut node = Node::subscriber("sub", upper()).with_transport(rx);
        assert_eq!(node.poll().unwrap(), 2);
        assert_eq!(node.poll().unwrap(), 0);
        match node.role() {
            Role::Subscriber(s) => assert_eq!(s.received, 2),
            other => panic!("unexpected role {:?}", other),
        }
    }

    #[test]
    fn test_poll_counts_packets_before_a_failure() {
        let (mut tx, rx) = LoopbackTransport::pair("loopback://text");
        tx.send(DataPacket::text("ok")).unwrap();
        tx.send(DataPacket::new(7i64)).unwrap();
        tx.send(DataPacket::text("later")).unwrap();

        let mut node = Node::subscriber("sub", upper()).with_transport(rx);
        assert!(matches!(node.poll(), Err(NodeError::Processor(_))));
        match node.role() {
            Role::Subscriber(s) => assert_eq!(s.received, 1),
            other => panic!("unexpected role {:?}", other),
        }

        assert_eq!(node.poll().unwrap(), 1);
        match node.role() {
            Role::Subscriber(s) => assert_eq!(s.received, 2),
            other => panic!("unexpected role {:?}", other),
        }
    }

    #[test]
    fn test_server_and_client() {
        let (server_end, client_end) = LoopbackTransport::pair("loopback://rpc");
        let mut server = Node::server("server", upper()).with_transport(server_end);
        let mut client = Node::client("client", IdentityProcessor).with_transport(client_end);

        assert_eq!(client.request().unwrap(), None);

        server.respond(DataPacket::text("ping")).unwrap();
        assert_eq!(client.request().unwrap(), Some(Value::from("PING")));

        client.post(DataPacket::text("pong")).unwrap();
    }

    #[test]
    fn test_role_mismatch() {
        let mut node = Node::subscriber("sub", IdentityProcessor);
        let err = node.publish_once(Inputs::new()).unwrap_err();
        assert!(matches!(
            err,
            NodeError::RoleMismatch {
                expected: RoleKind::Publisher,
                actual: RoleKind::Subscriber,
                ..
            }
        ));
        assert!(node.respond(DataPacket::text("x")).is_err());
    }
}
