//! `stp/vlan` payloads
//!
//! Port/state control from the STP master toward the VLAN manager. `enable`
//! carries a trailing array of logical port handles whose count field is
//! validated against the declared payload length before any copy.

use crate::catalog::PayloadShape;
use crate::error::{CodecError, CodecResult};
use crate::wire;
use nemo_types::{LportHandle, SlotId, MAX_ENABLE_PORTS};

pub const ENABLE_SHAPE: PayloadShape = PayloadShape::Variable {
    base: 8,
    elem_size: 8,
    count_offset: 4,
    max_count: MAX_ENABLE_PORTS,
};
pub const MAKE_ROOT_SHAPE: PayloadShape = PayloadShape::Fixed(2);
pub const BRIDGE_ID_SHAPE: PayloadShape = PayloadShape::Fixed(10);
pub const PORT_PRI_SHAPE: PayloadShape = PayloadShape::Fixed(10);
pub const PORT_COST_SHAPE: PayloadShape = PayloadShape::Fixed(12);

/// Enable spanning tree on a slot's ports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanEnable {
    pub slot_num: SlotId,
    pub slot_type: u16,
    port_handles: Vec<LportHandle>,
}

impl VlanEnable {
    pub fn new(
        slot_num: SlotId,
        slot_type: u16,
        port_handles: Vec<LportHandle>,
    ) -> CodecResult<Self> {
        if port_handles.len() > MAX_ENABLE_PORTS {
            return Err(CodecError::OversizedPayload {
                size: port_handles.len(),
                max: MAX_ENABLE_PORTS,
            });
        }
        Ok(Self {
            slot_num,
            slot_type,
            port_handles,
        })
    }

    pub fn port_handles(&self) -> &[LportHandle] {
        &self.port_handles
    }

    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u16(buf, self.slot_num.0);
        wire::put_u16(buf, self.slot_type);
        wire::put_u32(buf, self.port_handles.len() as u32);
        for handle in &self.port_handles {
            wire::put_u64(buf, handle.0);
        }
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        let slot_num = SlotId(wire::get_u16(payload, 0)?);
        let slot_type = wire::get_u16(payload, 2)?;
        let num_ports = wire::get_u32(payload, 4)? as usize;
        if num_ports > MAX_ENABLE_PORTS {
            return Err(CodecError::OversizedPayload {
                size: num_ports,
                max: MAX_ENABLE_PORTS,
            });
        }
        let mut port_handles = Vec::with_capacity(num_ports);
        for i in 0..num_ports {
            port_handles.push(LportHandle(wire::get_u64(payload, 8 + i * 8)?));
        }
        Ok(Self {
            slot_num,
            slot_type,
            port_handles,
        })
    }
}

/// Force this bridge to become root for a VLAN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanMakeRoot {
    pub vlan_id: u16,
}

impl VlanMakeRoot {
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u16(buf, self.vlan_id);
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        Ok(Self {
            vlan_id: wire::get_u16(payload, 0)?,
        })
    }
}

/// Set the bridge identifier for a VLAN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanBridgeId {
    pub vlan_id: u16,
    pub bridge_id: u64,
}

impl VlanBridgeId {
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u16(buf, self.vlan_id);
        wire::put_u64(buf, self.bridge_id);
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        Ok(Self {
            vlan_id: wire::get_u16(payload, 0)?,
            bridge_id: wire::get_u64(payload, 2)?,
        })
    }
}

/// Set a port's STP priority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanPortPri {
    pub lport_handle: LportHandle,
    pub priority: u16,
}

impl VlanPortPri {
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u64(buf, self.lport_handle.0);
        wire::put_u16(buf, self.priority);
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        Ok(Self {
            lport_handle: LportHandle(wire::get_u64(payload, 0)?),
            priority: wire::get_u16(payload, 8)?,
        })
    }
}

/// Set a port's STP path cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanPortCost {
    pub lport_handle: LportHandle,
    pub cost: u32,
}

impl VlanPortCost {
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u64(buf, self.lport_handle.0);
        wire::put_u32(buf, self.cost);
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        Ok(Self {
            lport_handle: LportHandle(wire::get_u64(payload, 0)?),
            cost: wire::get_u32(payload, 8)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_round_trip() {
        let enable = VlanEnable::new(
            SlotId(2),
            1,
            vec![LportHandle(0x10), LportHandle(0x20), LportHandle(0x30)],
        )
        .unwrap();
        let mut buf = Vec::new();
        enable.encode_into(&mut buf);
        assert_eq!(buf.len(), 8 + 3 * 8);

        let decoded = VlanEnable::decode(&buf).unwrap();
        assert_eq!(decoded, enable);
        assert_eq!(decoded.port_handles().len(), 3);
    }

    #[test]
    fn test_enable_empty_port_list() {
        let enable = VlanEnable::new(SlotId(1), 0, vec![]).unwrap();
        let mut buf = Vec::new();
        enable.encode_into(&mut buf);
        assert_eq!(buf.len(), 8);
        assert_eq!(VlanEnable::decode(&buf).unwrap(), enable);
    }

    #[test]
    fn test_enable_port_cap() {
        let handles = vec![LportHandle(0); MAX_ENABLE_PORTS + 1];
        assert!(VlanEnable::new(SlotId(1), 0, handles).is_err());
    }

    #[test]
    fn test_fixed_payloads_round_trip() {
        let mut buf = Vec::new();
        let bridge = VlanBridgeId {
            vlan_id: 42,
            bridge_id: 0x8000_0000_0000_0001,
        };
        bridge.encode_into(&mut buf);
        assert_eq!(buf.len(), 10);
        assert_eq!(VlanBridgeId::decode(&buf).unwrap(), bridge);

        buf.clear();
        let cost = VlanPortCost {
            lport_handle: LportHandle(0x99),
            cost: 20000,
        };
        cost.encode_into(&mut buf);
        assert_eq!(buf.len(), 12);
        assert_eq!(VlanPortCost::decode(&buf).unwrap(), cost);
    }
}
