//! Binary codec for the inter-task messaging substrate
//!
//! Everything on the wire is network byte order. An envelope is a fixed
//! 10-byte header followed by a typed payload; the [`MessageCatalog`] holds
//! the per-protocol version tags and per-message size shapes that decoding
//! validates against before any payload bytes are interpreted.
//!
//! Encoding is infallible once a message has been constructed (constructors
//! enforce the payload caps); decoding returns a [`CodecError`] naming the
//! first check that failed.

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod payload;
pub(crate) mod wire;

pub use catalog::{MessageCatalog, PayloadShape};
pub use envelope::{
    decode_envelope, encode_message, Envelope, EnvelopeHeader, ENVELOPE_HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
pub use error::{CodecError, CodecResult};
pub use payload::{
    register_builtin, Message, MlacpRxPdu, PeersByebye, PeersHello, SetVstpState, SportPdu,
    VlanBridgeId, VlanEnable, VlanMakeRoot, VlanPortCost, VlanPortPri,
};
