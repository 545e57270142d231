//! # Nemo Type System - Protocol Namespaces and Addressing
//!
//! Shared type definitions for the Nemo inter-task messaging substrate:
//! protocol namespace identifiers, per-namespace message-type numbers,
//! version tags, and the chassis addressing vocabulary (slot/port/CPU numbers
//! and topology-stable logical port handles).
//!
//! The numeric values in this crate are wire identity. They are shared with
//! peers that may run older or newer software on other CPUs in the chassis,
//! so they are never renumbered once shipped. New message types append; they
//! never reuse a retired number.

pub mod addressing;
pub mod protocol;

pub use addressing::{CpuNum, EndpointAddr, LportHandle, PortNum, SlotId};
pub use protocol::{
    MlacpMsgType, ProtocolId, StpPeersMsgType, StpVlanMsgType, UnknownMessageType,
    UnknownProtocol, VersionTag,
};

/// Maximum PDU bytes carried by an `rxPdu`/`txPdu` message.
///
/// Matches the largest LACPDU/BPDU carrier frame the slot drivers hand up;
/// anything larger is a corrupt or hostile frame and is rejected before copy.
pub const MAX_PDU_DATA: usize = 124;

/// Maximum trailing port-handle entries in a `stp/vlan enable` payload.
pub const MAX_ENABLE_PORTS: usize = 256;
