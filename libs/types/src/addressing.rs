//! Chassis addressing vocabulary
//!
//! Messages name their target either by physical chassis location (slot/port)
//! or by a 64-bit opaque logical port handle that stays stable across
//! topology changes (line card swaps, port renumbering). Handle values are
//! never reused while any module still holds a live reference to the entity
//! they name.

/// Physical slot number of a line card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct SlotId(pub u16);

/// Physical port number within a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct PortNum(pub u16);

/// CPU number identifying a master or helper task instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CpuNum(pub u16);

/// Topology-stable opaque identifier for a logical port
///
/// Independent of physical slot/port numbering; spanning-tree port handles
/// are the same 64-bit space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct LportHandle(pub u64);

impl std::fmt::Display for LportHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot{}", self.0)
    }
}

impl std::fmt::Display for PortNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "port{}", self.0)
    }
}

/// Logical address carried in a payload, as presented to the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointAddr {
    /// Topology-stable handle
    Handle(LportHandle),
    /// Physical chassis location
    SlotPort(SlotId, PortNum),
}

impl From<LportHandle> for EndpointAddr {
    fn from(handle: LportHandle) -> Self {
        EndpointAddr::Handle(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_display() {
        let handle = LportHandle(0x10);
        assert_eq!(handle.to_string(), "0x0000000000000010");
    }

    #[test]
    fn test_endpoint_addr_from_handle() {
        let addr: EndpointAddr = LportHandle(0x20).into();
        assert_eq!(addr, EndpointAddr::Handle(LportHandle(0x20)));
    }
}
