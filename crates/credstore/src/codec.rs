//! Payload codecs.
//!
//! The store treats persisted bytes as opaque; a [`Codec`] is the seam
//! that turns typed records into those bytes and back. [`JsonCodec`] is
//! the default.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Encodes typed records to bytes and decodes them back.
pub trait Codec: Send + Sync {
    /// Encode a record. Fails with [`Error::Encode`] on unencodable input.
    fn encode<T: Serialize + ?Sized>(&self, record: &T) -> Result<Vec<u8>>;

    /// Decode a stored payload. Fails with [`Error::Decode`] on malformed
    /// input.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, record: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(record).map_err(|e| Error::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}
