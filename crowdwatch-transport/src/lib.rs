//! Publishing simulation output: frames and risk tier changes.

use std::io;

use crowdwatch_config::{SenderConfig, SerializerType, TransportConfig};
use crowdwatch_core::{Snapshot, TierChange};
use crowdwatch_simulation::HeatMap;
use log::info;
use thiserror::Error;

pub use self::message::{FrameMessage, Message};
pub use self::sender::{FileSender, NullSender, Sender, StdioSender};
pub use self::serializer::{BinarySerializer, JsonSerializer, SerializationError, Serializer};

mod message;
mod sender;
mod serializer;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerializationError),

    #[error("Invalid transport configuration: {0}")]
    ConfigurationError(String),
}

/// Serializes and sends everything the runner publishes.
///
/// Frames are throttled to one every `output_frequency` frames; tier
/// changes are always sent.
pub struct TransportController {
    serializer: Box<dyn Serializer>,
    sender: Box<dyn Sender>,
    output_frequency: u64,
    frames_sent: u64,
}

impl TransportController {
    pub fn new(serializer: Box<dyn Serializer>, sender: Box<dyn Sender>, output_frequency: u32) -> Self {
        Self {
            serializer,
            sender,
            output_frequency: u64::from(output_frequency.max(1)),
            frames_sent: 0,
        }
    }

    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        if config.output_frequency == 0 {
            return Err(TransportError::ConfigurationError(
                "output_frequency must be greater than 0".to_string(),
            ));
        }

        let serializer: Box<dyn Serializer> = match config.serializer {
            SerializerType::Json => Box::new(JsonSerializer),
            SerializerType::Binary => Box::new(BinarySerializer),
        };

        let sender: Box<dyn Sender> = match &config.sender {
            SenderConfig::Stdio => Box::new(StdioSender::new()),
            SenderConfig::File { output_path } => {
                if output_path.trim().is_empty() {
                    return Err(TransportError::ConfigurationError(
                        "file sender needs an output_path".to_string(),
                    ));
                }
                info!("Writing simulation output to {}", output_path);
                Box::new(FileSender::create(output_path)?)
            }
            SenderConfig::Null => Box::new(NullSender::new()),
        };

        info!(
            "Publishing {} frames every {} tick(s)",
            serializer.format(),
            config.output_frequency
        );
        Ok(Self::new(serializer, sender, config.output_frequency))
    }

    /// True when the frame with this number would be published.
    pub fn wants_frame(&self, frame: u64) -> bool {
        frame % self.output_frequency == 0
    }

    /// Publishes a frame if it is due. Returns whether it was sent.
    pub fn publish_frame(
        &mut self,
        snapshot: &Snapshot,
        heat_map: Option<&HeatMap>,
    ) -> Result<bool, TransportError> {
        if !self.wants_frame(snapshot.frame) {
            return Ok(false);
        }
        self.publish(&Message::frame(snapshot, heat_map))?;
        self.frames_sent += 1;
        Ok(true)
    }

    pub fn publish_tier_change(&mut self, change: &TierChange) -> Result<(), TransportError> {
        self.publish(&Message::tier_change(change))
    }

    fn publish(&mut self, message: &Message<'_>) -> Result<(), TransportError> {
        let data = self.serializer.serialize(message)?;
        self.sender.send(data.as_bytes())
    }

    pub fn flush(&mut self) -> Result<(), TransportError> {
        self.sender.flush()
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}
