//! Delivery sources.
//!
//! # Responsibilities
//! - Abstract where deliveries come from (`DeliverySource`)
//! - Provide a newline-delimited JSON source for local replay
//!
//! # Envelope Format
//! ```text
//! {"queue": "flight.received", "exchange": "flights", "routing_key": "flight.created",
//!  "headers": {"traceparent": "00-..."}, "body": {"flightNumber": "LH400", ...}}
//! ```
//! `body` may be a JSON string (taken verbatim) or any other JSON value
//! (re-serialized). `queue` falls back to the configured queue.

use serde::Deserialize;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::messaging::delivery::{Delivery, Headers, MessageProperties};

/// Errors that end a delivery source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Reading from the underlying stream failed.
    #[error("failed to read deliveries: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that yields deliveries one at a time.
pub trait DeliverySource: Send {
    /// Next delivery, or `None` once the source is exhausted.
    ///
    /// Must be cancel safe: dropping the future loses no delivery.
    fn next(&mut self) -> impl Future<Output = Result<Option<Delivery>, SourceError>> + Send;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    queue: Option<String>,
    #[serde(default)]
    exchange: String,
    #[serde(default)]
    routing_key: String,
    #[serde(default)]
    headers: Headers,
    #[serde(default)]
    content_length: Option<u64>,
    body: serde_json::Value,
}

/// Reads one JSON envelope per line.
///
/// Lines that are blank or fail to parse are skipped with a warning.
pub struct LineSource<R> {
    lines: Lines<R>,
    default_queue: String,
    line_number: u64,
}

impl LineSource<BufReader<Stdin>> {
    /// Read envelopes from standard input.
    pub fn stdin(default_queue: impl Into<String>) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), default_queue)
    }
}

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    pub fn new(reader: R, default_queue: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            default_queue: default_queue.into(),
            line_number: 0,
        }
    }

    fn parse(&self, line: &str) -> Result<Delivery, serde_json::Error> {
        let envelope: Envelope = serde_json::from_str(line)?;
        let body = match envelope.body {
            serde_json::Value::String(text) => text.into_bytes(),
            other => serde_json::to_vec(&other)?,
        };

        Ok(Delivery {
            properties: MessageProperties {
                message_id: Some(
                    envelope
                        .message_id
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                ),
                headers: envelope.headers,
                consumer_queue: envelope
                    .queue
                    .unwrap_or_else(|| self.default_queue.clone()),
                received_exchange: envelope.exchange,
                received_routing_key: envelope.routing_key,
                content_length: Some(envelope.content_length.unwrap_or(body.len() as u64)),
            },
            body,
        })
    }
}

impl<R: AsyncBufRead + Unpin + Send> DeliverySource for LineSource<R> {
    async fn next(&mut self) -> Result<Option<Delivery>, SourceError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            match self.parse(&line) {
                Ok(delivery) => return Ok(Some(delivery)),
                Err(e) => {
                    tracing::warn!(line = self.line_number, error = %e, "Skipping malformed envelope");
                }
            }
        }
        Ok(None)
    }
}
