//! Unix domain socket transport
//!
//! Local IPC between tasks on the same control processor. Frames are
//! length-prefixed on the stream; see [`crate::framing`].

use crate::framing::{read_frame, write_frame};
use crate::{DisconnectHook, HookSlot, Result, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Listener side of a Unix socket transport
pub struct UnixAcceptor {
    listener: UnixListener,
    path: PathBuf,
}

impl UnixAcceptor {
    /// Bind the socket, replacing a stale file from a previous run
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| {
                TransportError::connection("failed to remove stale socket", Some(e))
            })?;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TransportError::connection("failed to create socket directory", Some(e))
            })?;
        }

        let listener = UnixListener::bind(&path)
            .map_err(|e| TransportError::connection("failed to bind unix socket", Some(e)))?;
        info!(path = %path.display(), "unix socket listening");
        Ok(Self { listener, path })
    }

    /// Accept the next peer connection
    pub async fn accept(&self) -> Result<UnixTransport> {
        let (stream, _) = self.listener.accept().await?;
        debug!(path = %self.path.display(), "accepted unix connection");
        Ok(UnixTransport::from_stream(stream, &self.path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UnixAcceptor {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// One established Unix socket connection
pub struct UnixTransport {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    label: String,
    hook: HookSlot,
}

impl UnixTransport {
    /// Connect to a listening peer
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let stream = UnixStream::connect(path.as_ref())
            .await
            .map_err(|e| TransportError::connection("failed to connect unix socket", Some(e)))?;
        debug!(path = %path.as_ref().display(), "connected unix socket");
        Ok(Self::from_stream(stream, path.as_ref()))
    }

    fn from_stream(stream: UnixStream, path: &Path) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            label: format!("unix:{}", path.display()),
            hook: HookSlot::new(),
        }
    }
}

#[async_trait]
impl Transport for UnixTransport {
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
