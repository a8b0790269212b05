//! Packet buffers shared by publishing nodes.
//!
//! A [`Buffer`] keeps packets in arrival order and, when bounded, only the
//! newest `max_size` of them. [`Memory`] holds named buffers; publishers read
//! the buffer named after themselves.

use crate::core::packet::DataPacket;
use indexmap::IndexMap;

/// An ordered, optionally bounded sequence of packets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    content: Vec<DataPacket>,
    max_size: Option<usize>,
}

impl Buffer {
    /// Create an unbounded buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that keeps only the newest `max_size` packets.
    pub fn bounded(max_size: usize) -> Self {
        Self {
            content: Vec::new(),
            max_size: Some(max_size),
        }
    }

    /// The bound, if any.
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Append a packet.
    pub fn add(&mut self, packet: DataPacket) {
        self.content.push(packet);
        self.trim();
    }

    /// Append several packets in order.
    pub fn add_sequence(&mut self, packets: impl IntoIterator<Item = DataPacket>) {
        self.content.extend(packets);
        self.trim();
    }

    /// The newest `n` packets, oldest first.
    pub fn read(&self, n: usize) -> &[DataPacket] {
        let start = self.content.len().saturating_sub(n);
        &self.content[start..]
    }

    /// The oldest `n` packets.
    pub fn read_oldest(&self, n: usize) -> &[DataPacket] {
        &self.content[..n.min(self.content.len())]
    }

    /// Drop all packets.
    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Number of packets held.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The oldest packet.
    pub fn oldest(&self) -> Option<&DataPacket> {
        self.content.first()
    }

    /// The newest packet.
    pub fn newest(&self) -> Option<&DataPacket> {
        self.content.last()
    }

    fn trim(&mut self) {
        // A bound of zero means "unbounded".
        if let Some(max) = self.max_size.filter(|&m| m > 0) {
            if self.content.len() > max {
                let excess = self.content.len() - max;
                self.content.drain(..excess);
            }
        }
    }
}

/// Named packet buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Memory {
    buffers: IndexMap<String, Buffer>,
}

impl Memory {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a buffer by key.
    pub fn buffer(&self, key: &str) -> Option<&Buffer> {
        self.buffers.get(key)
    }

    /// Get a buffer mutably by key.
    pub fn buffer_mut(&mut self, key: &str) -> Option<&mut Buffer> {
        self.buffers.get_mut(key)
    }

    /// Append a packet, creating an unbounded buffer if needed.
    pub fn push(&mut self, key: impl Into<String>, packet: DataPacket) {
        self.buffers.entry(key.into()).or_default().add(packet);
    }

    /// Newest packet under `key`.
    pub fn newest(&self, key: &str) -> Option<&DataPacket> {
        self.buffers.get(key).and_then(Buffer::newest)
    }

    /// Newest `n` packets under `key`.
    pub fn newest_n(&self, key: &str, n: usize) -> &[DataPacket] {
        self.buffers.get(key).map(|b| b.read(n)).unwrap_or(&[])
    }

    /// Oldest packet under `key`.
    pub fn oldest(&self, key: &str) -> Option<&DataPacket> {
        self.buffers.get(key).and_then(Buffer::oldest)
    }

    /// Oldest `n` packets under `key`.
    pub fn oldest_n(&self, key: &str, n: usize) -> &[DataPacket] {
        self.buffers.get(key).map(|b| b.read_oldest(n)).unwrap_or(&[])
    }

    /// Replace the buffer under `key`.
    pub fn overwrite_buffer(&mut self, key: impl Into<String>, buffer: Buffer) {
        self.buffers.insert(key.into(), buffer);
    }

    /// Remove the buffer under `key`, if present.
    pub fn delete_buffer(&mut self, key: &str) -> Option<Buffer> {
        self.buffers.shift_remove(key)
    }

    /// Buffer keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buffers.keys().map(|k| k.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packets(texts: &[&str]) -> Vec<DataPacket> {
        texts.iter().map(|t| DataPacket::text(*t)).collect()
    }

    fn texts(packets: &[DataPacket]) -> Vec<&str> {
        packets.iter().filter_map(DataPacket::as_text).collect()
    }

    #[test]
    fn test_bounded_buffer_keeps_newest() {
        let mut buffer = Buffer::bounded(2);
        buffer.add_sequence(packets(&["a", "b", "c"]));
        assert_eq!(texts(buffer.read(10)), vec!["b", "c"]);

        buffer.add(DataPacket::text("d"));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.oldest().and_then(DataPacket::as_text), Some("c"));
        assert_eq!(buffer.newest().and_then(DataPacket::as_text), Some("d"));
    }

    #[test]
    fn test_unbounded_buffer_reads() {
        let mut buffer = Buffer::new();
        buffer.add_sequence(packets(&["a", "b", "c"]));
        assert_eq!(texts(buffer.read(2)), vec!["b", "c"]);
        assert_eq!(texts(buffer.read_oldest(2)), vec!["a", "b"]);

        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.newest().is_none());
    }

    #[test]
    fn test_memory_missing_key() {
        let memory = Memory::new();
        assert!(memory.buffer("nope").is_none());
        assert!(memory.newest("nope").is_none());
        assert!(memory.newest_n("nope", 3).is_empty());
    }

    #[test]
    fn test_memory_buffers() {
        let mut memory = Memory::new();
        memory.push("camera", DataPacket::text("frame-1"));
        memory.push("camera", DataPacket::text("frame-2"));
        assert_eq!(memory.newest("camera").and_then(DataPacket::as_text), Some("frame-2"));
        assert_eq!(memory.oldest("camera").and_then(DataPacket::as_text), Some("frame-1"));
        assert_eq!(memory.oldest_n("camera", 1).len(), 1);

        memory.overwrite_buffer("camera", Buffer::bounded(1));
        assert!(memory.buffer("camera").unwrap().is_empty());

        assert!(memory.delete_buffer("camera").is_some());
        assert_eq!(memory.keys().count(), 0);
    }
}
