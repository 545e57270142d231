//! Envelope framing - the fixed header plus typed payload on the wire
//!
//! Wire layout, network byte order:
//!
//! ```text
//! [protocol_id: u16][message_type: u16][version_major: u8][version_minor: u8]
//! [payload_length: u32][payload: payload_length bytes]
//! ```
//!
//! Decoding validates in order: header presence, global frame cap, declared
//! length against available bytes, protocol/version against the catalog,
//! payload length against the registered shape, then typed payload decode.
//! The first failure wins; nothing is copied before the length checks pass.

use crate::catalog::MessageCatalog;
use crate::error::{CodecError, CodecResult};
use crate::payload::Message;
use crate::wire;
use nemo_types::{ProtocolId, VersionTag};
use tracing::trace;

/// Fixed envelope header size in bytes
pub const ENVELOPE_HEADER_SIZE: usize = 10;

/// Hard cap on a single envelope's payload
///
/// Control-plane messages are small; anything near this size is a framing
/// error or corruption, not a legitimate message.
pub const MAX_PAYLOAD_SIZE: usize = 4096;

/// Decoded envelope header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub protocol: ProtocolId,
    pub message_type: u16,
    pub version: VersionTag,
    pub payload_len: u32,
}

/// A fully decoded envelope: header identity plus owned typed payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub header: EnvelopeHeader,
    pub message: Message,
}

/// Encode a typed message into a complete wire envelope
///
/// Fails with `UnknownMessageType` when the catalog has no entry for the
/// message's (protocol, type) pair; the shape check on the encoded payload is
/// a self-consistency assertion between the payload codecs and the catalog.
pub fn encode_message(catalog: &MessageCatalog, message: &Message) -> CodecResult<Vec<u8>> {
    let protocol = message.protocol_id();
    let message_type = message.message_type();

    let shape = catalog
        .lookup(protocol, message_type)
        .ok_or(CodecError::UnknownMessageType {
            protocol: protocol as u16,
            message_type,
        })?;
    let version = catalog
        .protocol_version(protocol)
        .ok_or(CodecError::UnknownProtocol(protocol as u16))?;

    let mut payload = Vec::with_capacity(shape.max_size().min(MAX_PAYLOAD_SIZE));
    message.encode_payload(&mut payload);
    shape.validate(&payload)?;

    let mut buf = Vec::with_capacity(ENVELOPE_HEADER_SIZE + payload.len());
    wire::put_u16(&mut buf, protocol as u16);
    wire::put_u16(&mut buf, message_type);
    wire::put_u8(&mut buf, version.major);
    wire::put_u8(&mut buf, version.minor);
    wire::put_u32(&mut buf, payload.len() as u32);
    buf.extend_from_slice(&payload);

    trace!(
        protocol = protocol.name(),
        message_type,
        len = buf.len(),
        "encoded envelope"
    );
    Ok(buf)
}

/// Decode and validate one wire envelope
///
/// The returned [`Envelope`] owns its payload; `bytes` can be reused or
/// dropped immediately after this call.
pub fn decode_envelope(catalog: &MessageCatalog, bytes: &[u8]) -> CodecResult<Envelope> {
    if bytes.len() < ENVELOPE_HEADER_SIZE {
        return Err(CodecError::TruncatedMessage {
            need: ENVELOPE_HEADER_SIZE,
            got: bytes.len(),
        });
    }

    let protocol_raw = wire::get_u16(bytes, 0)?;
    let message_type = wire::get_u16(bytes, 2)?;
    let peer_version = VersionTag::new(wire::get_u8(bytes, 4)?, wire::get_u8(bytes, 5)?);
    let payload_len = wire::get_u32(bytes, 6)? as usize;

    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(CodecError::OversizedPayload {
            size: payload_len,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    let total = ENVELOPE_HEADER_SIZE + payload_len;
    if bytes.len() < total {
        return Err(CodecError::TruncatedMessage {
            need: total,
            got: bytes.len(),
        });
    }
    if bytes.len() > total {
        // Datagram framing delivers exact envelopes; trailing slack means the
        // framer and the header disagree.
        return Err(CodecError::PayloadSizeMismatch {
            declared: bytes.len() - ENVELOPE_HEADER_SIZE,
            expected: payload_len,
        });
    }

    let protocol =
        ProtocolId::try_from(protocol_raw).map_err(|_| CodecError::UnknownProtocol(protocol_raw))?;

    let local_version = catalog
        .protocol_version(protocol)
        .ok_or(CodecError::UnknownProtocol(protocol_raw))?;
    if !local_version.compatible_with(peer_version) {
        return Err(CodecError::VersionMismatch {
            protocol: protocol_raw,
            local: local_version.major,
            peer: peer_version.major,
        });
    }

    let shape = catalog
        .lookup(protocol, message_type)
        .ok_or(CodecError::UnknownMessageType {
            protocol: protocol_raw,
            message_type,
        })?;

    let payload = &bytes[ENVELOPE_HEADER_SIZE..total];
    if payload.len() > shape.max_size() {
        return Err(CodecError::OversizedPayload {
            size: payload.len(),
            max: shape.max_size(),
        });
    }
    shape.validate(payload)?;

    let message = Message::decode_payload(protocol, message_type, payload)?;

    Ok(Envelope {
        header: EnvelopeHeader {
            protocol,
            message_type,
            version: peer_version,
            payload_len: payload_len as u32,
        },
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{MlacpRxPdu, PeersHello, SportPdu, VlanEnable};
    use nemo_types::{CpuNum, LportHandle, SlotId};

    fn catalog() -> MessageCatalog {
        MessageCatalog::builtin()
    }

    #[test]
    fn test_hello_round_trip() {
        let catalog = catalog();
        let hello = Message::PeersHello(PeersHello {
            cpu_num: CpuNum(3),
            slot_num: SlotId(1),
        });

        let bytes = encode_message(&catalog, &hello).unwrap();
        // header: proto=2, type=1, ver 1.0, len=4
        assert_eq!(bytes.len(), ENVELOPE_HEADER_SIZE + 4);
        assert_eq!(&bytes[..2], &[0, 2]);
        assert_eq!(&bytes[2..4], &[0, 1]);
        assert_eq!(bytes[4], 1);
        assert_eq!(bytes[5], 0);
        assert_eq!(&bytes[6..10], &[0, 0, 0, 4]);

        let envelope = decode_envelope(&catalog, &bytes).unwrap();
        assert_eq!(envelope.message, hello);
        assert_eq!(envelope.header.protocol, ProtocolId::StpPeers);
        assert_eq!(envelope.header.payload_len, 4);
    }

    #[test]
    fn test_every_message_round_trips() {
        use crate::payload::{SetVstpState, VlanBridgeId, VlanMakeRoot, VlanPortCost, VlanPortPri};
        let catalog = catalog();
        let messages = vec![
            Message::MlacpRxPdu(MlacpRxPdu::new(LportHandle(0x11), vec![1, 2, 3]).unwrap()),
            Message::PeersHello(PeersHello {
                cpu_num: CpuNum(1),
                slot_num: SlotId(2),
            }),
            Message::PeersByebye(crate::payload::PeersByebye {
                cpu_num: CpuNum(1),
                slot_num: SlotId(2),
            }),
            Message::PeersTxPdu(SportPdu::new(LportHandle(0x22), vec![0xAA; 35]).unwrap()),
            Message::PeersRxPdu(SportPdu::new(LportHandle(0x33), vec![]).unwrap()),
            Message::PeersSetVstpState(SetVstpState {
                sport_handle: LportHandle(0x44),
                vlan_id: 10,
                state: 3,
            }),
            Message::VlanEnable(
                VlanEnable::new(SlotId(2), 1, vec![LportHandle(0x10), LportHandle(0x20)]).unwrap(),
            ),
            Message::VlanMakeRoot(VlanMakeRoot { vlan_id: 7 }),
            Message::VlanBridgeId(VlanBridgeId {
                vlan_id: 7,
                bridge_id: 0x8000_0011_2233_4455,
            }),
            Message::VlanPortPri(VlanPortPri {
                lport_handle: LportHandle(0x55),
                priority: 128,
            }),
            Message::VlanPortCost(VlanPortCost {
                lport_handle: LportHandle(0x66),
                cost: 4,
            }),
        ];

        for message in messages {
            let bytes = encode_message(&catalog, &message).unwrap();
            let envelope = decode_envelope(&catalog, &bytes).unwrap();
            assert_eq!(envelope.message, message, "round trip for {:?}", message);
        }
    }

    #[test]
    fn test_truncated_prefixes_never_panic() {
        let catalog = catalog();
        let message = Message::VlanEnable(
            VlanEnable::new(SlotId(2), 1, vec![LportHandle(0x10), LportHandle(0x20)]).unwrap(),
        );
        let bytes = encode_message(&catalog, &message).unwrap();

        for cut in 0..bytes.len() {
            let err = decode_envelope(&catalog, &bytes[..cut]).unwrap_err();
            assert!(
                matches!(
                    err,
                    CodecError::TruncatedMessage { .. } | CodecError::PayloadSizeMismatch { .. }
                ),
                "prefix of {} bytes gave {:?}",
                cut,
                err
            );
        }
    }

    #[test]
    fn test_oversized_pdu_rejected_before_copy() {
        let catalog = catalog();
        // Hand-build an rxPdu envelope claiming 125 data bytes
        let mut bytes = Vec::new();
        wire::put_u16(&mut bytes, ProtocolId::DriversMlacp as u16);
        wire::put_u16(&mut bytes, 1);
        wire::put_u8(&mut bytes, 1);
        wire::put_u8(&mut bytes, 0);
        wire::put_u32(&mut bytes, 12 + 125);
        wire::put_u64(&mut bytes, 0x77);
        wire::put_u32(&mut bytes, 125);
        bytes.extend_from_slice(&[0u8; 125]);

        assert!(matches!(
            decode_envelope(&catalog, &bytes).unwrap_err(),
            CodecError::OversizedPayload { .. }
        ));
    }

    #[test]
    fn test_count_length_inconsistency_rejected() {
        let catalog = catalog();
        // enable with numPorts=5 but only 3 handles on the wire
        let mut bytes = Vec::new();
        wire::put_u16(&mut bytes, ProtocolId::StpVlan as u16);
        wire::put_u16(&mut bytes, 1);
        wire::put_u8(&mut bytes, 1);
        wire::put_u8(&mut bytes, 0);
        wire::put_u32(&mut bytes, 8 + 3 * 8);
        wire::put_u16(&mut bytes, 2); // slot_num
        wire::put_u16(&mut bytes, 1); // slot_type
        wire::put_u32(&mut bytes, 5); // numPorts lies
        for handle in [0x10u64, 0x20, 0x30] {
            wire::put_u64(&mut bytes, handle);
        }

        assert_eq!(
            decode_envelope(&catalog, &bytes).unwrap_err(),
            CodecError::PayloadSizeMismatch {
                declared: 32,
                expected: 48
            }
        );
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let catalog = catalog();
        let hello = Message::PeersHello(PeersHello {
            cpu_num: CpuNum(0),
            slot_num: SlotId(0),
        });
        let mut bytes = encode_message(&catalog, &hello).unwrap();

        // Newer minor from a peer is additive, still accepted
        bytes[5] = 9;
        assert!(decode_envelope(&catalog, &bytes).is_ok());

        // Major bump is rejected
        bytes[4] = 2;
        assert_eq!(
            decode_envelope(&catalog, &bytes).unwrap_err(),
            CodecError::VersionMismatch {
                protocol: 2,
                local: 1,
                peer: 2
            }
        );
    }

    #[test]
    fn test_unknown_protocol_and_type() {
        let catalog = catalog();
        let mut bytes = Vec::new();
        wire::put_u16(&mut bytes, 42);
        wire::put_u16(&mut bytes, 1);
        wire::put_u8(&mut bytes, 1);
        wire::put_u8(&mut bytes, 0);
        wire::put_u32(&mut bytes, 0);
        assert_eq!(
            decode_envelope(&catalog, &bytes).unwrap_err(),
            CodecError::UnknownProtocol(42)
        );

        let mut bytes = Vec::new();
        wire::put_u16(&mut bytes, ProtocolId::StpPeers as u16);
        wire::put_u16(&mut bytes, 200);
        wire::put_u8(&mut bytes, 1);
        wire::put_u8(&mut bytes, 0);
        wire::put_u32(&mut bytes, 0);
        assert_eq!(
            decode_envelope(&catalog, &bytes).unwrap_err(),
            CodecError::UnknownMessageType {
                protocol: 2,
                message_type: 200
            }
        );
    }

    #[test]
    fn test_trailing_slack_rejected() {
        let catalog = catalog();
        let hello = Message::PeersHello(PeersHello {
            cpu_num: CpuNum(0),
            slot_num: SlotId(0),
        });
        let mut bytes = encode_message(&catalog, &hello).unwrap();
        bytes.push(0xFF);
        assert!(matches!(
            decode_envelope(&catalog, &bytes).unwrap_err(),
            CodecError::PayloadSizeMismatch { .. }
        ));
    }
}
