//! Transport error types

use thiserror::Error;

/// Errors surfaced by transport adapters
///
/// `Disconnected` is terminal for a given adapter: once returned from
/// `receive`, the peer is gone and the adapter will not produce more frames.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Peer closed the connection or the channel endpoint was dropped
    #[error("transport disconnected")]
    Disconnected,

    /// Outbound or declared inbound frame exceeds the framing cap
    #[error("frame of {size} bytes exceeds maximum {max}")]
    FrameTooLarge { size: usize, max: usize },

    /// Connection setup failure
    #[error("connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// I/O error on an established connection
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    pub fn connection(message: impl Into<String>, source: Option<std::io::Error>) -> Self {
        Self::Connection {
            message: message.into(),
            source,
        }
    }

    /// True when the error means the peer is unreachable and the session
    /// should tear down rather than retry
    pub fn is_disconnect(&self) -> bool {
        match self {
            TransportError::Disconnected => true,
            TransportError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;
