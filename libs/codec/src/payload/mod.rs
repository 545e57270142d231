//! Typed payloads for every registered message
//!
//! One module per protocol namespace, plus the [`Message`] enum the dispatch
//! layer works with. Each payload owns its data: nothing decoded here borrows
//! the transport buffer past the decode call.

pub mod mlacp;
pub mod stp_peers;
pub mod stp_vlan;

pub use mlacp::MlacpRxPdu;
pub use stp_peers::{PeersByebye, PeersHello, SetVstpState, SportPdu};
pub use stp_vlan::{VlanBridgeId, VlanEnable, VlanMakeRoot, VlanPortCost, VlanPortPri};

use crate::catalog::MessageCatalog;
use crate::error::{CodecError, CodecResult};
use nemo_types::{
    EndpointAddr, MlacpMsgType, ProtocolId, StpPeersMsgType, StpVlanMsgType, VersionTag,
};

/// A decoded (or to-be-encoded) message with its wire identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    MlacpRxPdu(MlacpRxPdu),
    PeersHello(PeersHello),
    PeersByebye(PeersByebye),
    PeersTxPdu(SportPdu),
    PeersRxPdu(SportPdu),
    PeersSetVstpState(SetVstpState),
    VlanEnable(VlanEnable),
    VlanMakeRoot(VlanMakeRoot),
    VlanBridgeId(VlanBridgeId),
    VlanPortPri(VlanPortPri),
    VlanPortCost(VlanPortCost),
}

impl Message {
    /// Protocol namespace owning this message
    pub fn protocol_id(&self) -> ProtocolId {
        match self {
            Message::MlacpRxPdu(_) => ProtocolId::DriversMlacp,
            Message::PeersHello(_)
            | Message::PeersByebye(_)
            | Message::PeersTxPdu(_)
            | Message::PeersRxPdu(_)
            | Message::PeersSetVstpState(_) => ProtocolId::StpPeers,
            Message::VlanEnable(_)
            | Message::VlanMakeRoot(_)
            | Message::VlanBridgeId(_)
            | Message::VlanPortPri(_)
            | Message::VlanPortCost(_) => ProtocolId::StpVlan,
        }
    }

    /// Message-type number within the owning namespace
    pub fn message_type(&self) -> u16 {
        match self {
            Message::MlacpRxPdu(_) => MlacpMsgType::RxPdu as u16,
            Message::PeersHello(_) => StpPeersMsgType::Hello as u16,
            Message::PeersByebye(_) => StpPeersMsgType::Byebye as u16,
            Message::PeersTxPdu(_) => StpPeersMsgType::TxPdu as u16,
            Message::PeersRxPdu(_) => StpPeersMsgType::RxPdu as u16,
            Message::PeersSetVstpState(_) => StpPeersMsgType::SetVstpState as u16,
            Message::VlanEnable(_) => StpVlanMsgType::Enable as u16,
            Message::VlanMakeRoot(_) => StpVlanMsgType::MakeRoot as u16,
            Message::VlanBridgeId(_) => StpVlanMsgType::BridgeId as u16,
            Message::VlanPortPri(_) => StpVlanMsgType::PortPri as u16,
            Message::VlanPortCost(_) => StpVlanMsgType::PortCost as u16,
        }
    }

    /// Logical address this message targets, when it carries one
    ///
    /// Slot-scoped messages (hello, byebye, enable, makeRoot, bridgeId) route
    /// by handler registration alone and return `None`.
    pub fn endpoint(&self) -> Option<EndpointAddr> {
        match self {
            Message::MlacpRxPdu(pdu) => Some(pdu.lport_handle.into()),
            Message::PeersTxPdu(pdu) | Message::PeersRxPdu(pdu) => {
                Some(pdu.sport_handle.into())
            }
            Message::PeersSetVstpState(msg) => Some(msg.sport_handle.into()),
            Message::VlanPortPri(msg) => Some(msg.lport_handle.into()),
            Message::VlanPortCost(msg) => Some(msg.lport_handle.into()),
            Message::PeersHello(_)
            | Message::PeersByebye(_)
            | Message::VlanEnable(_)
            | Message::VlanMakeRoot(_)
            | Message::VlanBridgeId(_) => None,
        }
    }

    /// Serialize payload fields in declaration order, network byte order
    pub(crate) fn encode_payload(&self, buf: &mut Vec<u8>) {
        match self {
            Message::MlacpRxPdu(p) => p.encode_into(buf),
            Message::PeersHello(p) => p.encode_into(buf),
            Message::PeersByebye(p) => p.encode_into(buf),
            Message::PeersTxPdu(p) | Message::PeersRxPdu(p) => p.encode_into(buf),
            Message::PeersSetVstpState(p) => p.encode_into(buf),
            Message::VlanEnable(p) => p.encode_into(buf),
            Message::VlanMakeRoot(p) => p.encode_into(buf),
            Message::VlanBridgeId(p) => p.encode_into(buf),
            Message::VlanPortPri(p) => p.encode_into(buf),
            Message::VlanPortCost(p) => p.encode_into(buf),
        }
    }

    /// Decode a shape-validated payload into its typed form
    pub(crate) fn decode_payload(
        protocol: ProtocolId,
        message_type: u16,
        payload: &[u8],
    ) -> CodecResult<Self> {
        let unknown = CodecError::UnknownMessageType {
            protocol: protocol as u16,
            message_type,
        };
        match protocol {
            ProtocolId::DriversMlacp => match MlacpMsgType::try_from(message_type) {
                Ok(MlacpMsgType::RxPdu) => Ok(Message::MlacpRxPdu(MlacpRxPdu::decode(payload)?)),
                Err(_) => Err(unknown),
            },
            ProtocolId::StpPeers => match StpPeersMsgType::try_from(message_type) {
                Ok(StpPeersMsgType::Hello) => {
                    Ok(Message::PeersHello(PeersHello::decode(payload)?))
                }
                Ok(StpPeersMsgType::Byebye) => {
                    Ok(Message::PeersByebye(PeersByebye::decode(payload)?))
                }
                Ok(StpPeersMsgType::TxPdu) => Ok(Message::PeersTxPdu(SportPdu::decode(payload)?)),
                Ok(StpPeersMsgType::RxPdu) => Ok(Message::PeersRxPdu(SportPdu::decode(payload)?)),
                Ok(StpPeersMsgType::SetVstpState) => {
                    Ok(Message::PeersSetVstpState(SetVstpState::decode(payload)?))
                }
                Err(_) => Err(unknown),
            },
            ProtocolId::StpVlan => match StpVlanMsgType::try_from(message_type) {
                Ok(StpVlanMsgType::Enable) => Ok(Message::VlanEnable(VlanEnable::decode(payload)?)),
                Ok(StpVlanMsgType::MakeRoot) => {
                    Ok(Message::VlanMakeRoot(VlanMakeRoot::decode(payload)?))
                }
                Ok(StpVlanMsgType::BridgeId) => {
                    Ok(Message::VlanBridgeId(VlanBridgeId::decode(payload)?))
                }
                Ok(StpVlanMsgType::PortPri) => {
                    Ok(Message::VlanPortPri(VlanPortPri::decode(payload)?))
                }
                Ok(StpVlanMsgType::PortCost) => {
                    Ok(Message::VlanPortCost(VlanPortCost::decode(payload)?))
                }
                Err(_) => Err(unknown),
            },
        }
    }
}

/// Register the builtin compatibility namespaces into a catalog
///
/// Called once per process at startup (usually via
/// [`MessageCatalog::builtin`]); shapes here match the wire layouts the
/// payload modules encode.
pub fn register_builtin(catalog: &mut MessageCatalog) -> CodecResult<()> {
    let v1 = VersionTag::new(1, 0);

    catalog.register_protocol(ProtocolId::DriversMlacp, v1)?;
    catalog.register_message(
        ProtocolId::DriversMlacp,
        MlacpMsgType::RxPdu as u16,
        mlacp::RX_PDU_SHAPE,
    )?;

    catalog.register_protocol(ProtocolId::StpPeers, v1)?;
    catalog.register_message(
        ProtocolId::StpPeers,
        StpPeersMsgType::Hello as u16,
        stp_peers::HELLO_SHAPE,
    )?;
    catalog.register_message(
        ProtocolId::StpPeers,
        StpPeersMsgType::Byebye as u16,
        stp_peers::BYEBYE_SHAPE,
    )?;
    catalog.register_message(
        ProtocolId::StpPeers,
        StpPeersMsgType::TxPdu as u16,
        stp_peers::PDU_SHAPE,
    )?;
    catalog.register_message(
        ProtocolId::StpPeers,
        StpPeersMsgType::RxPdu as u16,
        stp_peers::PDU_SHAPE,
    )?;
    catalog.register_message(
        ProtocolId::StpPeers,
        StpPeersMsgType::SetVstpState as u16,
        stp_peers::SET_VSTP_STATE_SHAPE,
    )?;

    catalog.register_protocol(ProtocolId::StpVlan, v1)?;
    catalog.register_message(
        ProtocolId::StpVlan,
        StpVlanMsgType::Enable as u16,
        stp_vlan::ENABLE_SHAPE,
    )?;
    catalog.register_message(
        ProtocolId::StpVlan,
        StpVlanMsgType::MakeRoot as u16,
        stp_vlan::MAKE_ROOT_SHAPE,
    )?;
    catalog.register_message(
        ProtocolId::StpVlan,
        StpVlanMsgType::BridgeId as u16,
        stp_vlan::BRIDGE_ID_SHAPE,
    )?;
    catalog.register_message(
        ProtocolId::StpVlan,
        StpVlanMsgType::PortPri as u16,
        stp_vlan::PORT_PRI_SHAPE,
    )?;
    catalog.register_message(
        ProtocolId::StpVlan,
        StpVlanMsgType::PortCost as u16,
        stp_vlan::PORT_COST_SHAPE,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nemo_types::{CpuNum, LportHandle, SlotId};

    #[test]
    fn test_message_wire_identity() {
        let hello = Message::PeersHello(PeersHello {
            cpu_num: CpuNum(3),
            slot_num: SlotId(1),
        });
        assert_eq!(hello.protocol_id(), ProtocolId::StpPeers);
        assert_eq!(hello.message_type(), 1);
        assert_eq!(hello.endpoint(), None);

        let pdu = Message::MlacpRxPdu(MlacpRxPdu::new(LportHandle(0x50), vec![1, 2]).unwrap());
        assert_eq!(pdu.protocol_id(), ProtocolId::DriversMlacp);
        assert_eq!(pdu.endpoint(), Some(EndpointAddr::Handle(LportHandle(0x50))));
    }

    #[test]
    fn test_decode_unknown_message_type() {
        let err = Message::decode_payload(ProtocolId::StpVlan, 99, &[]).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownMessageType {
                protocol: 3,
                message_type: 99
            }
        );
    }
}
