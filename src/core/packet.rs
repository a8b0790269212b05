//! Data packets exchanged between nodes.

use crate::core::error::TransportError;
use crate::core::types::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPacket {
    /// The payload.
    pub data: Value,
    /// Creation time, UTC.
    pub timestamp: DateTime<Utc>,
}

impl DataPacket {
    /// Create a packet stamped with the current time.
    pub fn new(data: impl Into<Value>) -> Self {
        Self {
            data: data.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a text packet.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Value::String(text.into()))
    }

    /// Override the timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The text payload, only if this is a text packet.
    pub fn as_text(&self) -> Option<&str> {
        self.data.as_str()
    }

    /// Encode for a transport.
    ///
    /// Fails on NaN or infinite floats, which JSON cannot carry.
    pub fn to_json(&self) -> Result<String, TransportError> {
        if !self.data.is_finite() {
            return Err(TransportError::Encode(format!(
                "non-finite float in {} payload",
                self.data.type_name()
            )));
        }
        serde_json::to_string(self).map_err(|e| TransportError::Encode(e.to_string()))
    }

    /// Decode from a transport.
    pub fn from_json(json: &str) -> Result<Self, TransportError> {
        serde_json::from_str(json).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_packet() {
        let packet = DataPacket::text("hello");
        assert_eq!(packet.as_text(), Some("hello"));
        assert_eq!(DataPacket::new(5i64).as_text(), None);
    }

    #[test]
    fn test_timestamps_taken_at_creation() {
        let first = DataPacket::text("a");
        let second = DataPacket::text("b");
        assert!(second.timestamp >= first.timestamp);
    }

    #[test]
    fn test_json_encoding() {
        let packet = DataPacket::text("over the wire");
        let decoded = DataPacket::from_json(&packet.to_json().unwrap()).unwrap();
        assert_eq!(decoded, packet);

        assert!(matches!(
            DataPacket::from_json("not json"),
            Err(TransportError::Decode(_))
        ));
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        assert!(matches!(
            DataPacket::new(f64::NAN).to_json(),
            Err(TransportError::Encode(_))
        ));
        let nested = Value::Array(vec![Value::Integer(1), Value::Float(f64::INFINITY)]);
        assert!(DataPacket::new(nested).to_json().is_err());
        assert!(DataPacket::new(0.5f64).to_json().is_ok());
    }
}
