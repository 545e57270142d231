//! In-process channel transport
//!
//! Connects two tasks in the same process through a pair of bounded mpsc
//! queues. Frames pass through unchanged; no length prefix is needed because
//! the channel already preserves message boundaries.

use crate::{DisconnectHook, HookSlot, Result, Transport, TransportError, MAX_FRAME_SIZE};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{mpsc, Mutex};

const CHANNEL_DEPTH: usize = 64;

/// One side of an in-process transport pair
pub struct ChannelTransport {
    tx: mpsc::Sender<Bytes>,
    rx: Mutex<mpsc::Receiver<Bytes>>,
    label: &'static str,
    hook: HookSlot,
}

impl ChannelTransport {
    /// Create a connected pair; frames sent on one side arrive on the other
    pub fn pair() -> (ChannelTransport, ChannelTransport) {
        let (a_tx, b_rx) = mpsc::channel(CHANNEL_DEPTH);
        let (b_tx, a_rx) = mpsc::channel(CHANNEL_DEPTH);
        (
            ChannelTransport {
                tx: a_tx,
                rx: Mutex::new(a_rx),
                label: "chan:a",
                hook: HookSlot::new(),
            },
            ChannelTransport {
                tx: b_tx,
                rx: Mutex::new(b_rx),
                label: "chan:b",
                hook: HookSlot::new(),
            },
        )
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, frame: &[u8]) -> Result<()> {
        if frame.len() > MAX_FRAME_SIZE {
            return Err(TransportError::FrameTooLarge {
                size: frame.len(),
                max: MAX_FRAME_SIZE,
            });
        }
        self.tx
            .send(Bytes::copy_from_slice(frame))
            .await
            .map_err(|_| TransportError::Disconnected)
    }

    async fn receive(&self) -> Result<Bytes> {
        let mut rx = self.rx.lock().await;
        match rx.recv().await {
            Some(frame) => Ok(frame),
            None => {
                self.hook.fire();
                Err(TransportError::Disconnected)
            }
        }
    }

    fn set_disconnect_hook(&self, hook: DisconnectHook) {
        self.hook.set(hook);
    }

    fn peer_label(&self) -> String {
        self.label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_pair_round_trip() {
        let (a, b) = ChannelTransport::pair();
        a.send(b"over here").await.unwrap();
        assert_eq!(&b.receive().await.unwrap()[..], b"over here");
        b.send(b"and back").await.unwrap();
        assert_eq!(&a.receive().await.unwrap()[..], b"and back");
    }

    #[tokio::test]
    async fn test_drop_signals_disconnect_once() {
        let (a, b) = ChannelTransport::pair();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        b.set_disconnect_hook(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        drop(a);
        assert!(matches!(
            b.receive().await.unwrap_err(),
            TransportError::Disconnected
        ));
        assert!(b.receive().await.is_err());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
