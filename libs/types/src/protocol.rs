//! Protocol namespace registry for the Nemo messaging substrate
//!
//! A protocol namespace is a stable small integer owning a private
//! message-type number space. The numbers here are preserved bit-for-bit for
//! wire compatibility with existing peers; see the per-enum comments for the
//! owning module.

use num_enum::TryFromPrimitive;
use thiserror::Error;

/// Protocol namespaces carried on the Nemo envelope
///
/// Globally unique across the catalog and never reused for a different
/// subsystem within a running system's lifetime.
#[repr(u16)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum ProtocolId {
    /// LACP driver messages between slot drivers and the mLACP master
    DriversMlacp = 1,
    /// STP master <-> per-slot helper liveness and PDU exchange
    StpPeers = 2,
    /// STP master -> VLAN manager port/state control
    StpVlan = 3,
}

impl ProtocolId {
    /// Human-readable namespace name, matching the module that owns it
    pub fn name(&self) -> &'static str {
        match *self {
            ProtocolId::DriversMlacp => "drivers/mlacp",
            ProtocolId::StpPeers => "stp/peers",
            ProtocolId::StpVlan => "stp/vlan",
        }
    }
}

/// Message types owned by the `drivers/mlacp` namespace
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum MlacpMsgType {
    /// Received LACPDU forwarded from a slot driver to the master
    RxPdu = 1,
}

/// Message types owned by the `stp/peers` namespace
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum StpPeersMsgType {
    /// Helper daemon announces itself to the master
    Hello = 1,
    /// Helper daemon leaves (orderly shutdown)
    Byebye = 2,
    /// Master asks a helper to transmit a BPDU on a port
    TxPdu = 3,
    /// Helper forwards a received BPDU to the master
    RxPdu = 4,
    /// Master pushes per-VLAN spanning tree state to a helper
    SetVstpState = 5,
}

/// Message types owned by the `stp/vlan` namespace
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum StpVlanMsgType {
    /// Enable spanning tree on a slot's set of ports
    Enable = 1,
    /// Force this bridge to become root for a VLAN
    MakeRoot = 2,
    /// Set the bridge identifier for a VLAN
    BridgeId = 3,
    /// Set a port's STP priority
    PortPri = 4,
    /// Set a port's STP path cost
    PortCost = 5,
}

/// Per-namespace protocol version
///
/// A receiver rejects a major mismatch; minor increases are additive (new
/// optional fields or message types) and never change existing field meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VersionTag {
    pub major: u8,
    pub minor: u8,
}

impl VersionTag {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Whether a peer advertising `other` can interoperate with us
    pub fn compatible_with(&self, other: VersionTag) -> bool {
        self.major == other.major
    }
}

impl std::fmt::Display for VersionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Raw protocol id not present in [`ProtocolId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown protocol id: {0}")]
pub struct UnknownProtocol(pub u16);

/// Raw message type not registered within its namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown message type {message_type} in protocol {protocol}")]
pub struct UnknownMessageType {
    pub protocol: u16,
    pub message_type: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_id_values_are_stable() {
        // Wire identity - these numbers must never change
        assert_eq!(ProtocolId::DriversMlacp as u16, 1);
        assert_eq!(ProtocolId::StpPeers as u16, 2);
        assert_eq!(ProtocolId::StpVlan as u16, 3);
    }

    #[test]
    fn test_message_type_values_are_stable() {
        assert_eq!(MlacpMsgType::RxPdu as u16, 1);

        assert_eq!(StpPeersMsgType::Hello as u16, 1);
        assert_eq!(StpPeersMsgType::Byebye as u16, 2);
        assert_eq!(StpPeersMsgType::TxPdu as u16, 3);
        assert_eq!(StpPeersMsgType::RxPdu as u16, 4);
        assert_eq!(StpPeersMsgType::SetVstpState as u16, 5);

        assert_eq!(StpVlanMsgType::Enable as u16, 1);
        assert_eq!(StpVlanMsgType::MakeRoot as u16, 2);
        assert_eq!(StpVlanMsgType::BridgeId as u16, 3);
        assert_eq!(StpVlanMsgType::PortPri as u16, 4);
        assert_eq!(StpVlanMsgType::PortCost as u16, 5);
    }

    #[test]
    fn test_try_from_primitive() {
        assert_eq!(ProtocolId::try_from(2u16).unwrap(), ProtocolId::StpPeers);
        assert!(ProtocolId::try_from(99u16).is_err());

        assert_eq!(
            StpPeersMsgType::try_from(5u16).unwrap(),
            StpPeersMsgType::SetVstpState
        );
        assert!(StpPeersMsgType::try_from(6u16).is_err());
    }

    #[test]
    fn test_version_compatibility() {
        let v1_0 = VersionTag::new(1, 0);
        let v1_3 = VersionTag::new(1, 3);
        let v2_0 = VersionTag::new(2, 0);

        // Minor skew is fine, major skew is not
        assert!(v1_0.compatible_with(v1_3));
        assert!(v1_3.compatible_with(v1_0));
        assert!(!v1_0.compatible_with(v2_0));
    }
}
