//! Node roles and their lifecycle hooks.
//!
//! Every node plays exactly one [`Role`]. Each role implements the fixed
//! [`Lifecycle`] capability set; the graph drives the hooks when nodes come
//! up, go down, or gain and lose peers.

use crate::core::error::NodeId;
use crate::core::memory::Memory;
use crate::core::transport::Transport;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of role, without the role's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// No messaging behaviour
    Plain,
    /// Produces packets
    Publisher,
    /// Consumes packets
    Subscriber,
    /// Answers requests
    Server,
    /// Issues requests
    Client,
}

impl RoleKind {
    /// Get the display name for this role.
    pub fn display_name(&self) -> &'static str {
        match self {
            RoleKind::Plain => "plain",
            RoleKind::Publisher => "publisher",
            RoleKind::Subscriber => "subscriber",
            RoleKind::Server => "server",
            RoleKind::Client => "client",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lifecycle hooks every role provides.
pub trait Lifecycle {
    /// The node came up.
    fn on_start(&mut self, _node: NodeId, _name: &str) {}

    /// The node went down.
    fn on_stop(&mut self, _node: NodeId, _name: &str) {}

    /// An edge to or from `peer` was created.
    fn on_connect(&mut self, _node: NodeId, _name: &str, _peer: NodeId) {}

    /// An edge to or from `peer` was removed.
    fn on_disconnect(&mut self, _node: NodeId, _name: &str, _peer: NodeId) {}
}

/// Transport plus the set of peers a role currently talks to.
#[derive(Default)]
pub struct Link {
    /// Transport collaborator, if attached.
    pub transport: Option<Box<dyn Transport>>,
    peers: IndexSet<NodeId>,
}

impl Link {
    /// Peers in the order they connected.
    pub fn peers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.peers.iter().copied()
    }

    /// Whether `peer` is linked.
    pub fn has_peer(&self, peer: NodeId) -> bool {
        self.peers.contains(&peer)
    }

    fn attach(&mut self, node: NodeId, peer: NodeId) {
        // Self-loops are bookkeeping, not peers.
        if node != peer {
            self.peers.insert(peer);
        }
    }

    fn detach(&mut self, peer: NodeId) {
        self.peers.shift_remove(&peer);
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("transport", &self.transport.as_ref().map(|t| t.address().to_string()))
            .field("peers", &self.peers)
            .finish()
    }
}

/// A node that produces packets.
#[derive(Debug, Default)]
pub struct Publisher {
    /// Outbound link.
    pub link: Link,
    /// Packets read into each publish, keyed by node name.
    pub memory: Option<Memory>,
    /// Packets sent so far.
    pub published: usize,
}

/// A node that consumes packets.
#[derive(Debug, Default)]
pub struct Subscriber {
    /// Inbound link.
    pub link: Link,
    /// Packets processed so far.
    pub received: usize,
}

/// A node that answers requests.
#[derive(Debug, Default)]
pub struct Server {
    /// Reply link.
    pub link: Link,
}

/// A node that issues requests.
#[derive(Debug, Default)]
pub struct Client {
    /// Request link.
    pub link: Link,
}

macro_rules! linked_lifecycle {
    ($role:ty, $label:literal) => {
        impl Lifecycle for $role {
            fn on_start(&mut self, node: NodeId, name: &str) {
                log::info!("{} {} ({}) started", $label, name, node);
            }

            fn on_stop(&mut self, node: NodeId, name: &str) {
                log::info!("{} {} ({}) stopped", $label, name, node);
            }

            fn on_connect(&mut self, node: NodeId, name: &str, peer: NodeId) {
                self.link.attach(node, peer);
                log::debug!("{} {} linked to {}", $label, name, peer);
            }

            fn on_disconnect(&mut self, _node: NodeId, name: &str, peer: NodeId) {
                self.link.detach(peer);
                log::debug!("{} {} unlinked from {}", $label, name, peer);
            }
        }
    };
}

linked_lifecycle!(Publisher, "publisher");
linked_lifecycle!(Subscriber, "subscriber");
linked_lifecycle!(Server, "server");
linked_lifecycle!(Client, "client");

/// The role a node plays.
#[derive(Debug, Default)]
pub enum Role {
    /// No messaging behaviour.
    #[default]
    Plain,
    /// Produces packets.
    Publisher(Publisher),
    /// Consumes packets.
    Subscriber(Subscriber),
    /// Answers requests.
    Server(Server),
    /// Issues requests.
    Client(Client),
}

impl Role {
    /// The kind of this role.
    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Plain => RoleKind::Plain,
            Role::Publisher(_) => RoleKind::Publisher,
            Role::Subscriber(_) => RoleKind::Subscriber,
            Role::Server(_) => RoleKind::Server,
            Role::Client(_) => RoleKind::Client,
        }
    }

    /// The role's link, if it has one.
    pub fn link(&self) -> Option<&Link> {
        match self {
            Role::Plain => None,
            Role::Publisher(p) => Some(&p.link),
            Role::Subscriber(s) => Some(&s.link),
            Role::Server(s) => Some(&s.link),
            Role::Client(c) => Some(&c.link),
        }
    }

    /// The role's link, mutably.
    pub fn link_mut(&mut self) -> Option<&mut Link> {
        match self {
            Role::Plain => None,
            Role::Publisher(p) => Some(&mut p.link),
            Role::Subscriber(s) => Some(&mut s.link),
            Role::Server(s) => Some(&mut s.link),
            Role::Client(c) => Some(&mut c.link),
        }
    }

    fn hooks(&mut self) -> Option<&mut dyn Lifecycle> {
        match self {
            Role::Plain => None,
            Role::Publisher(p) => Some(p),
            Role::Subscriber(s) => Some(s),
            Role::Server(s) => Some(s),
            Role::Client(c) => Some(c),
        }
    }
}

impl Lifecycle for Role {
    fn on_start(&mut self, node: NodeId, name: &str) {
        match self.hooks() {
            Some(hooks) => hooks.on_start(node, name),
            None => log::info!("{} started", name),
        }
    }

    fn on_stop(&mut self, node: NodeId, name: &str) {
        match self.hooks() {
            Some(hooks) => hooks.on_stop(node, name),
            None => log::info!("{} stopped", name),
        }
    }

    fn on_connect(&mut self, node: NodeId, name: &str, peer: NodeId) {
        if let Some(hooks) = self.hooks() {
            hooks.on_connect(node, name, peer);
        }
    }

    fn on_disconnect(&mut self, node: NodeId, name: &str, peer: NodeId) {
        if let Some(hooks) = self.hooks() {
            hooks.on_disconnect(node, name, peer);
        }
    }
}
