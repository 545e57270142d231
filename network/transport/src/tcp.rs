//! TCP transport
//!
//! Carries frames between control processors on different slots over the
//! internal management network. Same length-prefixed framing as the Unix
//! adapter.

use crate::framing::{read_frame, write_frame};
use crate::{DisconnectHook, HookSlot, Result, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use std::net::SocketAddr;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Listener side of a TCP transport
pub struct TcpAcceptor {
    listener: TcpListener,
}

impl TcpAcceptor {
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| TransportError::connection("failed to bind tcp listener", Some(e)))?;
        info!(addr = %addr, "tcp listening");
        Ok(Self { listener })
    }

    pub async fn accept(&self) -> Result<TcpTransport> {
        let (stream, peer) = self.listener.accept().await?;
        debug!(peer = %peer, "accepted tcp connection");
        Ok(TcpTransport::from_stream(stream, peer))
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

/// One established TCP connection
pub struct TcpTransport {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    label: String,
    hook: HookSlot,
}

impl TcpTransport {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| TransportError::connection("failed to connect tcp", Some(e)))?;
        stream.set_nodelay(true)?;
        debug!(peer = %addr, "connected tcp");
        Ok(Self::from_stream(stream, addr))
    }

    fn from_stream(stream: TcpStream, peer: SocketAddr) -> Self {
        let _ = stream.set_nodelay(true);
        let (reader, writer) = stream.into_split();
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            label: format!("tcp:{}", peer),
            hook: HookSlot::new(),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, frame: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock().await;
        write_frame(&mut *writer, frame).await
    }

    async fn receive(&self) -> Result<Bytes> {
        let mut reader = self.reader.lock().await;
        match read_frame(&mut *reader).await {
            Ok(frame) => Ok(frame),
            Err(e) => {
                if e.is_disconnect() {
                    self.hook.fire();
                }
                Err(e)
            }
        }
    }

    fn set_disconnect_hook(&self, hook: DisconnectHook) {
        self.hook.set(hook);
    }

    fn peer_label(&self) -> String {
        self.label.clone()
    }
}
