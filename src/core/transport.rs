//! Transport collaborators.
//!
//! Networked transports (HTTP, WebSocket, sensor capture) live outside this
//! crate and plug in through [`Transport`]. [`LoopbackTransport`] is an
//! in-process implementation that moves JSON-encoded packets through shared
//! queues.

use crate::core::error::{TransportError, TransportResult};
use crate::core::packet::DataPacket;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Moves packets between a node and its peers.
pub trait Transport: Send {
    /// Address this transport talks to.
    fn address(&self) -> &str;

    /// Send a packet.
    fn send(&mut self, packet: DataPacket) -> TransportResult<()>;

    /// Receive the next packet, if one is waiting. Never blocks.
    fn receive(&mut self) -> TransportResult<Option<DataPacket>>;
}

#[derive(Debug, Default)]
struct Channel {
    queue: VecDeque<String>,
    closed: bool,
}

type SharedChannel = Arc<Mutex<Channel>>;

/// One end of an in-process packet pipe.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    address: String,
    outbound: SharedChannel,
    inbound: SharedChannel,
}

impl LoopbackTransport {
    /// A transport whose sends come back on its own receive side.
    pub fn echo(address: impl Into<String>) -> Self {
        let channel = SharedChannel::default();
        Self {
            address: address.into(),
            outbound: channel.clone(),
            inbound: channel,
        }
    }

    /// Two connected ends; what one sends the other receives.
    pub fn pair(address: impl Into<String>) -> (Self, Self) {
        let address = address.into();
        let forward = SharedChannel::default();
        let backward = SharedChannel::default();
        (
            Self {
                address: address.clone(),
                outbound: forward.clone(),
                inbound: backward.clone(),
            },
            Self {
                address,
                outbound: backward,
                inbound: forward,
            },
        )
    }

    /// Close both directions. Later sends fail, pending packets stay readable.
    pub fn close(&self) {
        self.outbound.lock().closed = true;
        self.inbound.lock().closed = true;
    }

    /// Packets waiting on the receive side.
    pub fn pending(&self) -> usize {
        self.inbound.lock().queue.len()
    }
}

impl Transport for LoopbackTransport {
    fn address(&self) -> &str {
        &self.address
    }

    fn send(&mut self, packet: DataPacket) -> TransportResult<()> {
        let encoded = packet.to_json()?;
        let mut channel = self.outbound.lock();
        if channel.closed {
            return Err(TransportError::Closed(self.address.clone()));
        }
        channel.queue.push_back(encoded);
        Ok(())
    }

    fn receive(&mut self) -> TransportResult<Option<DataPacket>> {
        let next = self.inbound.lock().queue.pop_front();
        next.map(|json| DataPacket::from_json(&json)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;

    #[test]
    fn test_pair_delivers_in_order() {
        let (mut a, mut b) = LoopbackTransport::pair("loopback://text");
        a.send(DataPacket::text("one")).unwrap();
        a.send(DataPacket::text("two")).unwrap();
        assert_eq!(b.pending(), 2);

        assert_eq!(b.receive().unwrap().unwrap().as_text(), Some("one"));
        assert_eq!(b.receive().unwrap().unwrap().as_text(), Some("two"));
        assert!(b.receive().unwrap().is_none());
        assert!(a.receive().unwrap().is_none());
    }

    #[test]
    fn test_echo() {
        let mut echo = LoopbackTransport::echo("loopback://echo");
        echo.send(DataPacket::new(1i64)).unwrap();
        assert_eq!(echo.receive().unwrap().unwrap().data.as_integer(), Some(1));
    }

    #[test]
    fn test_closed_transport_rejects_sends() {
        let (mut a, mut b) = LoopbackTransport::pair("loopback://x");
        a.send(DataPacket::text("before")).unwrap();
        a.close();

        assert_eq!(
            a.send(DataPacket::text("after")),
            Err(TransportError::Closed("loopback://x".into()))
        );
        assert!(b.receive().unwrap().is_some());
    }

    #[test]
    fn test_unencodable_packet_is_not_queued() {
        let (mut a, mut b) = LoopbackTransport::pair("loopback://x");
        let result = a.send(DataPacket::new(Value::Float(f64::NAN)));
        assert!(matches!(result, Err(TransportError::Encode(_))));
        assert_eq!(b.pending(), 0);
        assert!(b.receive().unwrap().is_none());
    }
}
