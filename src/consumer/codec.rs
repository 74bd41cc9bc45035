//! Payload decoding.

use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use crate::consumer::error::DecodeError;

/// Turns a message body into a business entity.
pub trait Decoder: Send + Sync {
    type Entity: Send;

    fn decode(&self, body: &[u8]) -> Result<Self::Entity, DecodeError>;
}

/// Decodes JSON bodies with `serde_json`.
pub struct JsonDecoder<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> JsonDecoder<E> {
    pub fn new() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E> Default for JsonDecoder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for JsonDecoder<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for JsonDecoder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDecoder")
            .field("entity", &std::any::type_name::<E>())
            .finish()
    }
}

impl<E: DeserializeOwned + Send> Decoder for JsonDecoder<E> {
    type Entity = E;

    fn decode(&self, body: &[u8]) -> Result<E, DecodeError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(DecodeError::Empty);
        }
        Ok(serde_json::from_slice(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        id: u32,
    }

    #[test]
    fn test_decode_ok() {
        let decoder = JsonDecoder::<Ping>::new();
        assert_eq!(decoder.decode(br#"{"id": 7}"#).unwrap(), Ping { id: 7 });
    }

    #[test]
    fn test_decode_empty() {
        let decoder = JsonDecoder::<Ping>::new();
        assert!(matches!(decoder.decode(b""), Err(DecodeError::Empty)));
        assert!(matches!(decoder.decode(b" \n"), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_decode_malformed() {
        let decoder = JsonDecoder::<Ping>::new();
        assert!(matches!(decoder.decode(b"{\"id\": "), Err(DecodeError::Json(_))));
        assert!(matches!(decoder.decode(br#"{"id": "x"}"#), Err(DecodeError::Json(_))));
    }
}
