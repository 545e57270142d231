//! Fixed-width wire primitives
//!
//! All multi-byte integers on the wire are network order regardless of host
//! endianness. Reads are bounds-checked and fail with `TruncatedMessage`
//! rather than panic; nothing here reads past the caller's slice.

use crate::error::{CodecError, CodecResult};
use byteorder::{ByteOrder, NetworkEndian};

/// Append a u16 in network order
#[inline]
pub fn put_u16(buf: &mut Vec<u8>, v: u16) {
    let mut raw = [0u8; 2];
    NetworkEndian::write_u16(&mut raw, v);
    buf.extend_from_slice(&raw);
}

/// Append a u32 in network order
#[inline]
pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
    let mut raw = [0u8; 4];
    NetworkEndian::write_u32(&mut raw, v);
    buf.extend_from_slice(&raw);
}

/// Append a u64 in network order
#[inline]
pub fn put_u64(buf: &mut Vec<u8>, v: u64) {
    let mut raw = [0u8; 8];
    NetworkEndian::write_u64(&mut raw, v);
    buf.extend_from_slice(&raw);
}

/// Append a u8
#[inline]
pub fn put_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

#[inline]
fn check(bytes: &[u8], offset: usize, width: usize) -> CodecResult<()> {
    let need = offset.checked_add(width).ok_or(CodecError::TruncatedMessage {
        need: usize::MAX,
        got: bytes.len(),
    })?;
    if bytes.len() < need {
        return Err(CodecError::TruncatedMessage {
            need,
            got: bytes.len(),
        });
    }
    Ok(())
}

/// Read a network-order u16 at `offset`
#[inline]
pub fn get_u16(bytes: &[u8], offset: usize) -> CodecResult<u16> {
    check(bytes, offset, 2)?;
    Ok(NetworkEndian::read_u16(&bytes[offset..offset + 2]))
}

/// Read a network-order u32 at `offset`
#[inline]
pub fn get_u32(bytes: &[u8], offset: usize) -> CodecResult<u32> {
    check(bytes, offset, 4)?;
    Ok(NetworkEndian::read_u32(&bytes[offset..offset + 4]))
}

/// Read a network-order u64 at `offset`
#[inline]
pub fn get_u64(bytes: &[u8], offset: usize) -> CodecResult<u64> {
    check(bytes, offset, 8)?;
    Ok(NetworkEndian::read_u64(&bytes[offset..offset + 8]))
}

/// Read a u8 at `offset`
#[inline]
pub fn get_u8(bytes: &[u8], offset: usize) -> CodecResult<u8> {
    check(bytes, offset, 1)?;
    Ok(bytes[offset])
}

/// Bounded copy: owns `src` into a fresh buffer, failing when it would not fit
///
/// The capacity check happens before any byte moves, so a lying length field
/// can never overrun.
pub fn copy_bounded(capacity: usize, src: &[u8]) -> CodecResult<Vec<u8>> {
    if src.len() > capacity {
        return Err(CodecError::Overflow {
            capacity,
            len: src.len(),
        });
    }
    Ok(src.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_round_trip() {
        let mut buf = Vec::new();
        put_u16(&mut buf, 0xBEEF);
        assert_eq!(buf, [0xBE, 0xEF]); // network order on the wire
        assert_eq!(get_u16(&buf, 0).unwrap(), 0xBEEF);
    }

    #[test]
    fn test_u64_round_trip() {
        let mut buf = Vec::new();
        put_u64(&mut buf, 0x0102030405060708);
        assert_eq!(buf[0], 0x01);
        assert_eq!(buf[7], 0x08);
        assert_eq!(get_u64(&buf, 0).unwrap(), 0x0102030405060708);
    }

    #[test]
    fn test_truncated_read() {
        let buf = [0u8; 3];
        let err = get_u32(&buf, 0).unwrap_err();
        assert_eq!(err, CodecError::TruncatedMessage { need: 4, got: 3 });

        // Offset past the end, not just short width
        assert!(get_u16(&buf, 2).is_err());
        assert!(get_u8(&buf, 3).is_err());
    }

    #[test]
    fn test_copy_bounded_rejects_overrun() {
        let src = [0xAAu8; 10];
        assert_eq!(copy_bounded(16, &src).unwrap().len(), 10);
        assert_eq!(
            copy_bounded(8, &src).unwrap_err(),
            CodecError::Overflow {
                capacity: 8,
                len: 10
            }
        );
    }
}
