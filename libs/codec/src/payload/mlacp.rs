//! `drivers/mlacp` payloads
//!
//! One message today: the slot driver forwarding a received LACPDU up to the
//! mLACP master. The PDU bytes are opaque to Nemo; only the carrier bounds
//! are enforced here.

use crate::catalog::PayloadShape;
use crate::error::{CodecError, CodecResult};
use crate::wire;
use nemo_types::{LportHandle, MAX_PDU_DATA};

/// Wire shape of [`MlacpRxPdu`]: handle, length, trailing PDU bytes
pub const RX_PDU_SHAPE: PayloadShape = PayloadShape::Variable {
    base: 12,
    elem_size: 1,
    count_offset: 8,
    max_count: MAX_PDU_DATA,
};

/// Received LACPDU forwarded from a slot driver
///
/// Owns its PDU bytes; the constructor refuses anything over the 124-byte
/// carrier cap, so an in-memory value is always encodable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlacpRxPdu {
    pub lport_handle: LportHandle,
    data: Vec<u8>,
}

impl MlacpRxPdu {
    pub fn new(lport_handle: LportHandle, data: Vec<u8>) -> CodecResult<Self> {
        if data.len() > MAX_PDU_DATA {
            return Err(CodecError::OversizedPayload {
                size: data.len(),
                max: MAX_PDU_DATA,
            });
        }
        Ok(Self { lport_handle, data })
    }

    /// Raw PDU bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        wire::put_u64(buf, self.lport_handle.0);
        wire::put_u32(buf, self.data.len() as u32);
        buf.extend_from_slice(&self.data);
    }

    pub(crate) fn decode(payload: &[u8]) -> CodecResult<Self> {
        let lport_handle = LportHandle(wire::get_u64(payload, 0)?);
        let len = wire::get_u32(payload, 8)? as usize;
        let tail = payload.get(12..12 + len).ok_or(CodecError::TruncatedMessage {
            need: 12 + len,
            got: payload.len(),
        })?;
        let data = wire::copy_bounded(MAX_PDU_DATA, tail)?;
        Ok(Self { lport_handle, data })
    }
}
