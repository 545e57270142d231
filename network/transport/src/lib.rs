//! Frame-oriented transport adapters
//!
//! A [`Transport`] moves whole frames between two peers; it knows nothing
//! about what the frames contain. Adapters exist for Unix domain sockets and
//! TCP (length-prefixed streams) and for in-process channels (used by tests
//! and co-located tasks).
//!
//! All adapters share the same contract:
//! - `send` delivers one complete frame or fails; concurrent senders are
//!   serialized inside the adapter so frames never interleave
//! - `receive` blocks until a complete frame arrives, and returns
//!   [`TransportError::Disconnected`] exactly when the peer is gone for good
//! - the disconnect hook, if set, fires at most once, when the adapter first
//!   observes the disconnect

pub mod channel;
pub mod error;
pub mod framing;
pub mod tcp;
pub mod unix;

pub use channel::ChannelTransport;
pub use error::{Result, TransportError};
pub use tcp::TcpTransport;
pub use unix::UnixTransport;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

/// Largest frame any adapter will send or accept
///
/// Comfortably above the largest envelope the codec layer produces; a prefix
/// claiming more than this is corruption, not a message.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Callback invoked once when a transport observes peer disconnect
pub type DisconnectHook = Box<dyn FnOnce() + Send + 'static>;

/// Bidirectional frame transport between two peers
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one complete frame
    async fn send(&self, frame: &[u8]) -> Result<()>;

    /// Receive the next complete frame
    async fn receive(&self) -> Result<Bytes>;

    /// Register the disconnect callback, replacing any previous one
    fn set_disconnect_hook(&self, hook: DisconnectHook);

    /// Short label for logging ("unix:/run/nemo/stp.sock", "chan", ...)
    fn peer_label(&self) -> String;
}

/// One-shot disconnect hook holder shared by the adapters
pub(crate) struct HookSlot {
    hook: Mutex<Option<DisconnectHook>>,
    fired: Mutex<bool>,
}

impl HookSlot {
    pub(crate) fn new() -> Self {
        Self {
            hook: Mutex::new(None),
            fired: Mutex::new(false),
        }
    }

    pub(crate) fn set(&self, hook: DisconnectHook) {
        *self.hook.lock() = Some(hook);
    }

    /// Fire the hook if present and not already fired
    pub(crate) fn fire(&self) {
        let mut fired = self.fired.lock();
        if *fired {
            return;
        }
        *fired = true;
        if let Some(hook) = self.hook.lock().take() {
            hook();
        }
    }
}
