//! Message catalog - shape registry for every (protocol, message type) pair
//!
//! The catalog is the single source of truth the codec validates against:
//! each registered message declares either a fixed payload size or a
//! variable-length shape (base size, trailing element size, count-field
//! offset), which lets the envelope codec bound-check any payload without
//! per-type hand-written length logic.
//!
//! Lifecycle: protocol modules register at initialization, before any live
//! traffic; after that the catalog is shared read-only behind an `Arc`.
//! Registration failures are contract violations surfaced at startup, never
//! at dispatch time.

use crate::error::{CodecError, CodecResult};
use crate::wire;
use nemo_types::{ProtocolId, VersionTag};
use std::collections::HashMap;

/// Payload shape descriptor for one message type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Payload is always exactly this many bytes
    Fixed(usize),
    /// Fixed base followed by `count` trailing elements
    ///
    /// `count` is a u32 in network order at `count_offset` within the base.
    Variable {
        base: usize,
        elem_size: usize,
        count_offset: usize,
        max_count: usize,
    },
}

impl PayloadShape {
    /// Largest payload this shape admits
    pub fn max_size(&self) -> usize {
        match *self {
            PayloadShape::Fixed(size) => size,
            PayloadShape::Variable {
                base,
                elem_size,
                max_count,
                ..
            } => base + elem_size * max_count,
        }
    }

    /// Registration-time consistency check on the descriptor itself
    fn check_registration(&self) -> CodecResult<()> {
        if let PayloadShape::Variable {
            base,
            elem_size,
            count_offset,
            ..
        } = *self
        {
            if count_offset + 4 > base {
                return Err(CodecError::InvalidShape {
                    reason: "count field does not fit inside base size",
                });
            }
            if elem_size == 0 {
                return Err(CodecError::InvalidShape {
                    reason: "variable shape with zero element size",
                });
            }
        }
        Ok(())
    }

    /// Validate a payload buffer against this shape
    ///
    /// For variable shapes the count field is read only after the base is
    /// known to be present, and is clamped against `max_count` before the
    /// implied size is computed, so a corrupted count can never drive an
    /// out-of-bounds read downstream.
    pub fn validate(&self, payload: &[u8]) -> CodecResult<()> {
        match *self {
            PayloadShape::Fixed(size) => {
                if payload.len() != size {
                    return Err(CodecError::PayloadSizeMismatch {
                        declared: payload.len(),
                        expected: size,
                    });
                }
                Ok(())
            }
            PayloadShape::Variable {
                base,
                elem_size,
                count_offset,
                max_count,
            } => {
                if payload.len() < base {
                    return Err(CodecError::TruncatedMessage {
                        need: base,
                        got: payload.len(),
                    });
                }
                let count = wire::get_u32(payload, count_offset)? as usize;
                if count > max_count {
                    return Err(CodecError::OversizedPayload {
                        size: count,
                        max: max_count,
                    });
                }
                let expected = base + count * elem_size;
                if payload.len() != expected {
                    return Err(CodecError::PayloadSizeMismatch {
                        declared: payload.len(),
                        expected,
                    });
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone)]
struct ProtocolEntry {
    version: VersionTag,
    messages: HashMap<u16, PayloadShape>,
}

/// Registry mapping (protocol, message type) to shape and version
///
/// Write-once at module startup, then read-only. Not a concurrent map by
/// design: Nemo's discipline is readers-after-writers-complete.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    protocols: HashMap<ProtocolId, ProtocolEntry>,
}

impl MessageCatalog {
    /// Empty catalog; protocol modules register into it at startup
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-loaded with the builtin compatibility namespaces
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        crate::payload::register_builtin(&mut catalog)
            .expect("builtin catalog registration is internally consistent");
        catalog
    }

    /// Register a protocol namespace and its version tag
    pub fn register_protocol(
        &mut self,
        protocol: ProtocolId,
        version: VersionTag,
    ) -> CodecResult<()> {
        if self.protocols.contains_key(&protocol) {
            return Err(CodecError::DuplicateProtocol(protocol as u16));
        }
        self.protocols.insert(
            protocol,
            ProtocolEntry {
                version,
                messages: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Register one message type under an already-registered protocol
    pub fn register_message(
        &mut self,
        protocol: ProtocolId,
        message_type: u16,
        shape: PayloadShape,
    ) -> CodecResult<()> {
        shape.check_registration()?;
        let entry = self
            .protocols
            .get_mut(&protocol)
            .ok_or(CodecError::UnknownProtocol(protocol as u16))?;
        if entry.messages.contains_key(&message_type) {
            return Err(CodecError::DuplicateRegistration {
                protocol: protocol as u16,
                message_type,
            });
        }
        entry.messages.insert(message_type, shape);
        Ok(())
    }

    /// Shape for a (protocol, message type) pair, if registered
    pub fn lookup(&self, protocol: ProtocolId, message_type: u16) -> Option<PayloadShape> {
        self.protocols
            .get(&protocol)
            .and_then(|entry| entry.messages.get(&message_type).copied())
    }

    /// Registered version tag for a protocol namespace
    pub fn protocol_version(&self, protocol: ProtocolId) -> Option<VersionTag> {
        self.protocols.get(&protocol).map(|entry| entry.version)
    }

    /// Number of registered message types across all namespaces
    pub fn message_count(&self) -> usize {
        self.protocols.values().map(|e| e.messages.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_shape_validation() {
        let shape = PayloadShape::Fixed(4);
        assert!(shape.validate(&[0; 4]).is_ok());
        assert_eq!(
            shape.validate(&[0; 3]).unwrap_err(),
            CodecError::PayloadSizeMismatch {
                declared: 3,
                expected: 4
            }
        );
    }

    #[test]
    fn test_variable_shape_validation() {
        // base 8 with a u32 count at offset 4, 8-byte elements
        let shape = PayloadShape::Variable {
            base: 8,
            elem_size: 8,
            count_offset: 4,
            max_count: 4,
        };

        let mut payload = vec![0u8; 8];
        payload[4..8].copy_from_slice(&2u32.to_be_bytes());
        payload.extend_from_slice(&[0u8; 16]);
        assert!(shape.validate(&payload).is_ok());

        // Count claims 3 but only 2 elements follow
        payload[4..8].copy_from_slice(&3u32.to_be_bytes());
        assert_eq!(
            shape.validate(&payload).unwrap_err(),
            CodecError::PayloadSizeMismatch {
                declared: 24,
                expected: 32
            }
        );
    }

    #[test]
    fn test_variable_shape_clamps_count() {
        let shape = PayloadShape::Variable {
            base: 8,
            elem_size: 8,
            count_offset: 4,
            max_count: 4,
        };
        // Hostile count: huge value that would overflow naive size math
        let mut payload = vec![0u8; 8];
        payload[4..8].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            shape.validate(&payload).unwrap_err(),
            CodecError::OversizedPayload { .. }
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut catalog = MessageCatalog::new();
        catalog
            .register_protocol(ProtocolId::StpPeers, VersionTag::new(1, 0))
            .unwrap();
        catalog
            .register_message(ProtocolId::StpPeers, 1, PayloadShape::Fixed(4))
            .unwrap();

        assert_eq!(
            catalog
                .register_message(ProtocolId::StpPeers, 1, PayloadShape::Fixed(4))
                .unwrap_err(),
            CodecError::DuplicateRegistration {
                protocol: 2,
                message_type: 1
            }
        );
        assert_eq!(
            catalog
                .register_protocol(ProtocolId::StpPeers, VersionTag::new(1, 0))
                .unwrap_err(),
            CodecError::DuplicateProtocol(2)
        );
    }

    #[test]
    fn test_inconsistent_shape_rejected_at_registration() {
        let mut catalog = MessageCatalog::new();
        catalog
            .register_protocol(ProtocolId::StpVlan, VersionTag::new(1, 0))
            .unwrap();

        // Count field hangs past the declared base
        let bad = PayloadShape::Variable {
            base: 4,
            elem_size: 8,
            count_offset: 2,
            max_count: 16,
        };
        assert!(matches!(
            catalog
                .register_message(ProtocolId::StpVlan, 1, bad)
                .unwrap_err(),
            CodecError::InvalidShape { .. }
        ));
    }

    #[test]
    fn test_builtin_catalog_is_complete() {
        let catalog = MessageCatalog::builtin();
        assert_eq!(catalog.message_count(), 11);
        assert!(catalog.lookup(ProtocolId::DriversMlacp, 1).is_some());
        assert!(catalog.lookup(ProtocolId::StpPeers, 5).is_some());
        assert!(catalog.lookup(ProtocolId::StpVlan, 5).is_some());
        assert!(catalog.lookup(ProtocolId::StpVlan, 6).is_none());
    }
}
