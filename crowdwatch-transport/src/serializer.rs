use thiserror::Error;

use crate::message::Message;

#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary serialization failed: {0}")]
    Binary(#[from] bincode::Error),
}

/// Turns a message into one line of text for a [`Sender`](crate::Sender).
pub trait Serializer: Send + Sync {
    fn serialize(&self, message: &Message<'_>) -> Result<String, SerializationError>;

    /// Short name used in logs.
    fn format(&self) -> &'static str;
}

/// Plain JSON, one object per message.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, message: &Message<'_>) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(message)?)
    }

    fn format(&self) -> &'static str {
        "json"
    }
}

/// bincode, base64-encoded so every message still fits on a single text line.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinarySerializer;

impl Serializer for BinarySerializer {
    fn serialize(&self, message: &Message<'_>) -> Result<String, SerializationError> {
        let bytes = bincode::serialize(message)?;
        Ok(base64::encode(bytes))
    }

    fn format(&self) -> &'static str {
        "binary"
    }
}
