//! Graph events and the sinks that receive them.
//!
//! The graph never logs through global state on its own; it reports every
//! mutation and advisory to the [`EventSink`] it was built with. A sink is
//! opened when it is installed and closed when it is replaced or the graph
//! is dropped.

use crate::core::error::NodeId;
use log::Level;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Something that happened to a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    /// A node was registered.
    NodeAdded { id: NodeId, name: String },
    /// A node was removed.
    NodeRemoved { id: NodeId, name: String },
    /// A node came up.
    NodeStarted { id: NodeId, name: String },
    /// A node went down.
    NodeStopped { id: NodeId, name: String },
    /// An edge was created.
    Connected { source: String, target: String },
    /// An edge was removed.
    Disconnected { source: String, target: String },
    /// Connect was asked for an edge that already existed.
    AlreadyConnected { source: String, target: String },
    /// Disconnect was asked for an edge that did not exist.
    NotConnected { source: String, target: String },
}

impl GraphEvent {
    /// Severity of this event.
    pub fn level(&self) -> Level {
        match self {
            GraphEvent::AlreadyConnected { .. } | GraphEvent::NotConnected { .. } => Level::Warn,
            GraphEvent::Connected { .. } | GraphEvent::Disconnected { .. } => Level::Info,
            GraphEvent::NodeAdded { .. } | GraphEvent::NodeRemoved { .. } => Level::Info,
            GraphEvent::NodeStarted { .. } | GraphEvent::NodeStopped { .. } => Level::Debug,
        }
    }

    /// Whether this is a non-fatal advisory.
    pub fn is_warning(&self) -> bool {
        self.level() == Level::Warn
    }
}

impl fmt::Display for GraphEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphEvent::NodeAdded { id, name } => write!(f, "Node('{}') [{}] added", name, id),
            GraphEvent::NodeRemoved { id, name } => write!(f, "Node('{}') [{}] removed", name, id),
            GraphEvent::NodeStarted { id, name } => write!(f, "Node('{}') [{}] up", name, id),
            GraphEvent::NodeStopped { id, name } => write!(f, "Node('{}') [{}] down", name, id),
            GraphEvent::Connected { source, target } => write!(f, "{} -> {}", source, target),
            GraphEvent::Disconnected { source, target } => write!(f, "{} -/-> {}", source, target),
            GraphEvent::AlreadyConnected { source, target } => {
                write!(f, "{} and {} are already connected", source, target)
            }
            GraphEvent::NotConnected { source, target } => {
                write!(f, "{} and {} are not connected", source, target)
            }
        }
    }
}

/// Receives graph events.
pub trait EventSink: Send {
    /// Called once when the sink is installed on a graph.
    fn open(&mut self, _graph: Option<&str>) {}

    /// Record one event.
    fn record(&mut self, event: &GraphEvent);

    /// Called once when the sink is removed or the graph is dropped.
    fn close(&mut self) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone)]
pub struct LogSink {
    target: String,
}

impl LogSink {
    /// Log under a custom target.
    pub fn with_target(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::with_target("polysophia::graph")
    }
}

impl EventSink for LogSink {
    fn open(&mut self, graph: Option<&str>) {
        log::debug!(target: self.target.as_str(), "graph {} opened", graph.unwrap_or("<unnamed>"));
    }

    fn record(&mut self, event: &GraphEvent) {
        log::log!(target: self.target.as_str(), event.level(), "{}", event);
    }

    fn close(&mut self) {
        log::debug!(target: self.target.as_str(), "graph closed");
    }
}

#[derive(Debug, Default)]
struct Recording {
    events: Vec<GraphEvent>,
    opened: usize,
    closed: usize,
}

/// Keeps every event in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSink {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    pub fn events(&self) -> Vec<GraphEvent> {
        self.inner.lock().events.clone()
    }

    /// Only the advisory events.
    pub fn warnings(&self) -> Vec<GraphEvent> {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|e| e.is_warning())
            .cloned()
            .collect()
    }

    /// Forget recorded events.
    pub fn clear(&self) {
        self.inner.lock().events.clear();
    }

    /// Times the sink was opened.
    pub fn opened(&self) -> usize {
        self.inner.lock().opened
    }

    /// Times the sink was closed.
    pub fn closed(&self) -> usize {
        self.inner.lock().closed
    }
}

impl EventSink for RecordingSink {
    fn open(&mut self, _graph: Option<&str>) {
        self.inner.lock().opened += 1;
    }

    fn record(&mut self, event: &GraphEvent) {
        self.inner.lock().events.push(event.clone());
    }

    fn close(&mut self) {
        self.inner.lock().closed += 1;
    }
}
