//! Handler registry and dispatch
//!
//! Handlers bind to a (protocol, message type) pair. Dispatch is synchronous
//! in the session's read loop; a handler that panics on bad input would take
//! the session down, so handlers report failure through their `Result` and
//! the router contains it.

use crate::resolver::EndpointContext;
use crate::{DispatchError, Result};
use dashmap::DashMap;
use nemo_codec::Envelope;
use nemo_types::ProtocolId;
use std::sync::Arc;
use tracing::{debug, error};

/// Receives decoded messages for one (protocol, message type) pair
///
/// `ctx` is present exactly when the message addresses a port endpoint and
/// the resolver knew it. Returning `Err` counts as a handler failure; it
/// never stops the session.
pub trait MessageHandler: Send + Sync {
    fn on_message(&self, ctx: Option<&EndpointContext>, envelope: &Envelope) -> anyhow::Result<()>;
}

/// What happened to one inbound envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    NoHandler,
    HandlerFailed,
}

/// Routes decoded envelopes to their registered handlers
///
/// Registration happens at task startup; dispatch runs concurrently from
/// session read loops afterward.
#[derive(Default)]
pub struct DispatchRouter {
    handlers: DashMap<(u16, u16), Arc<dyn MessageHandler>>,
}

impl DispatchRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler; fails if the pair is already bound
    pub fn register(
        &self,
        protocol: ProtocolId,
        message_type: u16,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<()> {
        let key = (protocol as u16, message_type);
        match self.handlers.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(DispatchError::HandlerAlreadyRegistered {
                    protocol: key.0,
                    message_type,
                })
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(handler);
                debug!(
                    protocol = protocol.name(),
                    message_type, "handler registered"
                );
                Ok(())
            }
        }
    }

    /// Unbind a handler; idempotent
    pub fn deregister(&self, protocol: ProtocolId, message_type: u16) {
        self.handlers.remove(&(protocol as u16, message_type));
    }

    /// Unbind every handler for one protocol
    pub fn deregister_protocol(&self, protocol: ProtocolId) {
        self.handlers.retain(|(p, _), _| *p != protocol as u16);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Deliver one envelope to its handler, containing handler failure
    pub fn dispatch(
        &self,
        ctx: Option<&EndpointContext>,
        envelope: &Envelope,
    ) -> DispatchOutcome {
        let key = (envelope.header.protocol as u16, envelope.header.message_type);
        let handler = match self.handlers.get(&key) {
            Some(h) => Arc::clone(&h),
            None => return DispatchOutcome::NoHandler,
        };

        match handler.on_message(ctx, envelope) {
            Ok(()) => DispatchOutcome::Delivered,
            Err(e) => {
                error!(
                    protocol = envelope.header.protocol.name(),
                    message_type = envelope.header.message_type,
                    error = %e,
                    "handler failed"
                );
                DispatchOutcome::HandlerFailed
            }
        }
    }
}
