//! Endpoint resolution
//!
//! Port-addressed messages carry an opaque logical port handle; the resolver
//! maps that handle (or a slot/port pair) to the endpoint context a handler
//! needs. Entries track port lifecycle: registered when a port comes up,
//! removed when it goes away. A miss means the port disappeared while a
//! message was in flight, which is normal during reconfiguration.

use dashmap::DashMap;
use nemo_types::{CpuNum, EndpointAddr, LportHandle, PortNum, SlotId};
use std::sync::Arc;
use tracing::debug;

/// Everything a handler needs to know about a resolved endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointContext {
    pub handle: LportHandle,
    pub slot: SlotId,
    pub port: PortNum,
    pub cpu: CpuNum,
    /// Whether the port is owned by this control processor
    pub local: bool,
}

/// Maps endpoint addresses to contexts
///
/// Both indexes point at the same shared context; registration and removal
/// keep them consistent.
#[derive(Default)]
pub struct EndpointResolver {
    by_handle: DashMap<LportHandle, Arc<EndpointContext>>,
    by_slot_port: DashMap<(SlotId, PortNum), Arc<EndpointContext>>,
}

impl EndpointResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint, replacing any previous entry for the same
    /// handle or slot/port
    pub fn register(&self, ctx: EndpointContext) {
        let ctx = Arc::new(ctx);
        debug!(handle = %ctx.handle, slot = %ctx.slot, port = %ctx.port, "endpoint registered");
        if let Some(prev) = self.by_handle.insert(ctx.handle, Arc::clone(&ctx)) {
            if (prev.slot, prev.port) != (ctx.slot, ctx.port) {
                self.by_slot_port.remove(&(prev.slot, prev.port));
            }
        }
        self.by_slot_port.insert((ctx.slot, ctx.port), ctx);
    }

    /// Remove an endpoint by handle; idempotent
    pub fn deregister(&self, handle: LportHandle) {
        if let Some((_, ctx)) = self.by_handle.remove(&handle) {
            self.by_slot_port.remove(&(ctx.slot, ctx.port));
            debug!(handle = %handle, "endpoint removed");
        }
    }

    /// Resolve an address to its context, if the endpoint is known
    pub fn resolve(&self, addr: &EndpointAddr) -> Option<Arc<EndpointContext>> {
        match addr {
            EndpointAddr::Handle(handle) => self.by_handle.get(handle).map(|e| Arc::clone(&e)),
            EndpointAddr::SlotPort(slot, port) => self
                .by_slot_port
                .get(&(*slot, *port))
                .map(|e| Arc::clone(&e)),
        }
    }

    pub fn endpoint_count(&self) -> usize {
        self.by_handle.len()
    }
}
