//! Codec-level errors for envelope processing
//!
//! Each variant carries enough context to log a dropped message usefully.
//! Every on-wire failure here is recoverable session-side (drop and keep
//! reading); only the registration errors are init-time contract violations.

use thiserror::Error;

/// Envelope encode/decode and catalog registration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated message: need {need} bytes, got {got}")]
    TruncatedMessage { need: usize, got: usize },

    #[error("oversized payload: {size} bytes exceeds cap {max}")]
    OversizedPayload { size: usize, max: usize },

    #[error("payload length mismatch: declared {declared}, shape implies {expected}")]
    PayloadSizeMismatch { declared: usize, expected: usize },

    #[error("unknown protocol id: {0}")]
    UnknownProtocol(u16),

    #[error("unknown message type {message_type} in protocol {protocol}")]
    UnknownMessageType { protocol: u16, message_type: u16 },

    #[error("version mismatch for protocol {protocol}: local major {local}, peer major {peer}")]
    VersionMismatch { protocol: u16, local: u8, peer: u8 },

    #[error("bounded copy overflow: {len} bytes into capacity {capacity}")]
    Overflow { capacity: usize, len: usize },

    #[error("duplicate registration for protocol {protocol}, message type {message_type}")]
    DuplicateRegistration { protocol: u16, message_type: u16 },

    #[error("protocol {0} registered twice")]
    DuplicateProtocol(u16),

    #[error("shape descriptor inconsistent with its own sizes: {reason}")]
    InvalidShape { reason: &'static str },
}

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
