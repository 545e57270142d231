//! Dispatch layer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler is already bound to this (protocol, message type) pair
    #[error("handler already registered for protocol {protocol} type {message_type}")]
    HandlerAlreadyRegistered { protocol: u16, message_type: u16 },

    /// Encoding an outbound message failed
    #[error("codec error: {0}")]
    Codec(#[from] nemo_codec::CodecError),

    /// The underlying transport failed
    #[error("transport error: {0}")]
    Transport(#[from] nemo_transport::TransportError),

    /// Configuration file could not be read or parsed
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DispatchError {
    pub fn configuration(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
