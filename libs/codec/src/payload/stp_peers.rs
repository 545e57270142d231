//! `stp/peers` payloads
//!
//! Liveness (`hello`/`byebye`) between the STP master and per-slot helpers,
//! BPDU exchange in both directions, and per-VLAN spanning tree state pushes.
//! Liveness is deliberately an above-the-envelope concern: Nemo itself does
//! no keepalive, so these are ordinary messages.

use crate::catalog::PayloadShape;
use crate::error::{CodecError, CodecResult};
use crate::wire;
use nemo_types::{CpuNum, LportHandle, SlotId, MAX_PDU_DATA};

pub const HELLO_SHAPE: PayloadShape = PayloadShape::Fixed(4);
pub const BYEBYE_SHAPE: PayloadShape = PayloadShape::Fixed(4);
pub const PDU_SHAPE: PayloadShape = PayloadShape::Variable {
    base: 12,
    elem_size: 1,
    count_offset: 8,
    max_count: MAX_PDU_DATA,
};
pub const SET_VSTP_STATE_SHAPE: PayloadShape = PayloadShape::Fixed(11);

/// Helper daemon announcing itself to the master
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeersHello {
    pub cpu_num: CpuNum,
    pub slot_num: SlotId,
}

impl PeersHello {
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u16(buf, self.cpu_num.0);
        wire::put_u16(buf, self.slot_num.0);
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        Ok(Self {
            cpu_num: CpuNum(wire::get_u16(payload, 0)?),
            slot_num: SlotId(wire::get_u16(payload, 2)?),
        })
    }
}

/// Helper daemon leaving; same addressing fields as `hello`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeersByebye {
    pub cpu_num: CpuNum,
    pub slot_num: SlotId,
}

impl PeersByebye {
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u16(buf, self.cpu_num.0);
        wire::put_u16(buf, self.slot_num.0);
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        Ok(Self {
            cpu_num: CpuNum(wire::get_u16(payload, 0)?),
            slot_num: SlotId(wire::get_u16(payload, 2)?),
        })
    }
}

/// BPDU carrier used by both `txPdu` (master -> helper) and `rxPdu`
/// (helper -> master); direction comes from the message type, not the shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportPdu {
    pub sport_handle: LportHandle,
    data: Vec<u8>,
}

impl SportPdu {
    pub fn new(sport_handle: LportHandle, data: Vec<u8>) -> CodecResult<Self> {
        if data.len() > MAX_PDU_DATA {
            return Err(CodecError::OversizedPayload {
                size: data.len(),
                max: MAX_PDU_DATA,
            });
        }
        Ok(Self { sport_handle, data })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u64(buf, self.sport_handle.0);
        wire::put_u32(buf, self.data.len() as u32);
        buf.extend_from_slice(&self.data);
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        let sport_handle = LportHandle(wire::get_u64(payload, 0)?);
        let len = wire::get_u32(payload, 8)? as usize;
        let tail = payload.get(12..12 + len).ok_or(CodecError::TruncatedMessage {
            need: 12 + len,
            got: payload.len(),
        })?;
        let data = wire::copy_bounded(MAX_PDU_DATA, tail)?;
        Ok(Self { sport_handle, data })
    }
}

/// Per-VLAN spanning tree state push for one spanning-tree port
///
/// `state` is the protocol module's port-state encoding; Nemo carries it
/// opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetVstpState {
    pub sport_handle: LportHandle,
    pub vlan_id: u16,
    pub state: u8,
}

impl SetVstpState {
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u64(buf, self.sport_handle.0);
        wire::put_u16(buf, self.vlan_id);
        wire::put_u8(buf, self.state);
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        Ok(Self {
            sport_handle: LportHandle(wire::get_u64(payload, 0)?),
            vlan_id: wire::get_u16(payload, 8)?,
            state: wire::get_u8(payload, 10)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_round_trip() {
        let hello = PeersHello {
            cpu_num: CpuNum(3),
            slot_num: SlotId(7),
        };
        let mut buf = Vec::new();
        hello.encode_into(&mut buf);
        assert_eq!(buf, [0, 3, 0, 7]);
        assert_eq!(PeersHello::decode(&buf).unwrap(), hello);
    }

    #[test]
    fn test_sport_pdu_round_trip() {
        let pdu = SportPdu::new(LportHandle(0xDEAD), vec![0x42; 60]).unwrap();
        let mut buf = Vec::new();
        pdu.encode_into(&mut buf);
        assert_eq!(buf.len(), 72);
        assert_eq!(SportPdu::decode(&buf).unwrap(), pdu);
    }

    #[test]
    fn test_sport_pdu_cap() {
        assert!(SportPdu::new(LportHandle(1), vec![0; MAX_PDU_DATA]).is_ok());
        assert!(SportPdu::new(LportHandle(1), vec![0; MAX_PDU_DATA + 1]).is_err());
    }

    #[test]
    fn test_set_vstp_state_round_trip() {
        let msg = SetVstpState {
            sport_handle: LportHandle(0x30),
            vlan_id: 100,
            state: 2,
        };
        let mut buf = Vec::new();
        msg.encode_into(&mut buf);
        assert_eq!(buf.len(), 11);
        assert_eq!(SetVstpState::decode(&buf).unwrap(), msg);
    }
}
