//! Inbound message representation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message headers as carried by the broker.
///
/// Ordered so that lookups which scan the map are deterministic.
pub type Headers = BTreeMap<String, HeaderValue>;

/// A typed header value.
///
/// AMQP header tables carry more than strings; only text-like values
/// can hold propagation data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Bool(bool),
    Int(i64),
    String(String),
    Bytes(Vec<u8>),
}

impl HeaderValue {
    /// Text view of the value, if it has one.
    ///
    /// Byte strings are accepted when they are valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            HeaderValue::String(s) => Some(s),
            HeaderValue::Bytes(b) => std::str::from_utf8(b).ok(),
            HeaderValue::Bool(_) | HeaderValue::Int(_) => None,
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::String(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::String(value)
    }
}

/// Metadata of a received message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageProperties {
    /// Broker or publisher assigned message identifier.
    pub message_id: Option<String>,
    /// Header table, including any propagation headers.
    pub headers: Headers,
    /// Queue the message was consumed from.
    pub consumer_queue: String,
    /// Exchange the message was published to.
    pub received_exchange: String,
    /// Routing key the message was published with.
    pub received_routing_key: String,
    /// Body size in bytes, when the transport reports it.
    pub content_length: Option<u64>,
}

/// A single message delivered by the transport.
///
/// Created once per delivery and consumed by exactly one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub body: Vec<u8>,
    pub properties: MessageProperties,
}

impl Delivery {
    /// Create a delivery for `queue` carrying `body`.
    pub fn new(queue: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            properties: MessageProperties {
                consumer_queue: queue.into(),
                ..MessageProperties::default()
            },
        }
    }

    /// Set the exchange and routing key the message arrived through.
    pub fn with_route(mut self, exchange: impl Into<String>, routing_key: impl Into<String>) -> Self {
        self.properties.received_exchange = exchange.into();
        self.properties.received_routing_key = routing_key.into();
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.properties.headers.insert(key.into(), value.into());
        self
    }

    /// Set the reported content length.
    pub fn with_content_length(mut self, length: u64) -> Self {
        self.properties.content_length = Some(length);
        self
    }

    /// Set the message identifier.
    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.properties.message_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_text() {
        assert_eq!(HeaderValue::from("abc").as_text(), Some("abc"));
        assert_eq!(HeaderValue::Bytes(b"abc".to_vec()).as_text(), Some("abc"));
        assert_eq!(HeaderValue::Bytes(vec![0xff, 0xfe]).as_text(), None);
        assert_eq!(HeaderValue::Int(7).as_text(), None);
        assert_eq!(HeaderValue::Bool(true).as_text(), None);
    }

    #[test]
    fn test_header_value_untagged_json() {
        let headers: Headers =
            serde_json::from_str(r#"{"a": "x", "b": 3, "c": false, "d": [104, 105]}"#).unwrap();
        assert_eq!(headers["a"], HeaderValue::String("x".into()));
        assert_eq!(headers["b"], HeaderValue::Int(3));
        assert_eq!(headers["c"], HeaderValue::Bool(false));
        assert_eq!(headers["d"].as_text(), Some("hi"));
    }

    #[test]
    fn test_builder() {
        let delivery = Delivery::new("flight.received", "{}")
            .with_route("flights", "flight.created")
            .with_header("traceparent", "00-abc")
            .with_content_length(2);

        assert_eq!(delivery.properties.consumer_queue, "flight.received");
        assert_eq!(delivery.properties.received_exchange, "flights");
        assert_eq!(delivery.properties.received_routing_key, "flight.created");
        assert_eq!(delivery.properties.content_length, Some(2));
        assert_eq!(delivery.properties.headers.len(), 1);
        assert!(delivery.properties.message_id.is_none());
    }
}
