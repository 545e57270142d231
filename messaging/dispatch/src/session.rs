//! Session: one transport's read loop
//!
//! A session owns one transport and drives receive -> decode -> resolve ->
//! dispatch until the peer disconnects. Malformed frames, unknown types,
//! address misses, and handler failures are all counted and dropped; only
//! transport disconnect (or a non-recoverable transport error) ends the loop.

use crate::resolver::EndpointResolver;
use crate::router::{DispatchOutcome, DispatchRouter};
use crate::Result;
use nemo_codec::{decode_envelope, encode_message, CodecError, Message, MessageCatalog};
use nemo_transport::Transport;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Counters for one session's traffic
///
/// Relaxed ordering throughout; these are monitoring counters, not
/// synchronization.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    pub frames_received: AtomicU64,
    pub messages_delivered: AtomicU64,
    pub messages_sent: AtomicU64,
    pub decode_failures: AtomicU64,
    pub no_handler_drops: AtomicU64,
    pub handler_failures: AtomicU64,
    pub address_misses: AtomicU64,
}

impl SessionMetrics {
    fn log(&self, name: &str) {
        info!(
            session = name,
            received = self.frames_received.load(Ordering::Relaxed),
            delivered = self.messages_delivered.load(Ordering::Relaxed),
            sent = self.messages_sent.load(Ordering::Relaxed),
            decode_failures = self.decode_failures.load(Ordering::Relaxed),
            no_handler = self.no_handler_drops.load(Ordering::Relaxed),
            handler_failures = self.handler_failures.load(Ordering::Relaxed),
            address_misses = self.address_misses.load(Ordering::Relaxed),
            "session metrics"
        );
    }
}

/// One peer connection's dispatch loop and send path
pub struct Session {
    name: String,
    transport: Arc<dyn Transport>,
    catalog: Arc<MessageCatalog>,
    router: Arc<DispatchRouter>,
    resolver: Arc<EndpointResolver>,
    metrics: Arc<SessionMetrics>,
    metrics_interval: Duration,
}

impl Session {
    pub fn new(
        name: impl Into<String>,
        transport: Arc<dyn Transport>,
        catalog: Arc<MessageCatalog>,
        router: Arc<DispatchRouter>,
        resolver: Arc<EndpointResolver>,
    ) -> Self {
        Self {
            name: name.into(),
            transport,
            catalog,
            router,
            resolver,
            metrics: Arc::new(SessionMetrics::default()),
            metrics_interval: Duration::from_secs(10),
        }
    }

    pub fn with_metrics_interval(mut self, interval: Duration) -> Self {
        self.metrics_interval = interval;
        self
    }

    pub fn metrics(&self) -> Arc<SessionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Encode and send one message to the peer
    pub async fn send(&self, message: &Message) -> Result<()> {
        let frame = encode_message(&self.catalog, message)?;
        self.transport.send(&frame).await?;
        self.metrics.messages_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Run the read loop until the peer disconnects
    ///
    /// Returns `Ok(())` on clean disconnect; transport errors other than
    /// disconnect propagate.
    pub async fn run(&self) -> Result<()> {
        info!(
            session = %self.name,
            peer = %self.transport.peer_label(),
            "session loop starting"
        );
        let mut last_report = Instant::now();

        loop {
            let frame = match self.transport.receive().await {
                Ok(frame) => frame,
                Err(e) if e.is_disconnect() => {
                    info!(session = %self.name, "peer disconnected");
                    self.metrics.log(&self.name);
                    return Ok(());
                }
                Err(e) => {
                    error!(session = %self.name, error = %e, "transport failure");
                    return Err(e.into());
                }
            };
            self.metrics.frames_received.fetch_add(1, Ordering::Relaxed);

            self.process_frame(&frame);

            if last_report.elapsed() >= self.metrics_interval {
                self.metrics.log(&self.name);
                last_report = Instant::now();
            }
        }
    }

    /// Decode, resolve, and dispatch one frame; never fails the loop
    fn process_frame(&self, frame: &[u8]) {
        let envelope = match decode_envelope(&self.catalog, frame) {
            Ok(envelope) => envelope,
            Err(e) => {
                self.metrics.decode_failures.fetch_add(1, Ordering::Relaxed);
                match e {
                    CodecError::UnknownMessageType { protocol, message_type } => {
                        // Peers may run newer minor versions with message
                        // types we have not learned yet
                        debug!(
                            session = %self.name,
                            protocol, message_type, "ignoring unknown message type"
                        );
                    }
                    _ => {
                        warn!(session = %self.name, error = %e, "dropping undecodable frame");
                    }
                }
                return;
            }
        };

        let ctx = match envelope.message.endpoint() {
            Some(addr) => match self.resolver.resolve(&addr) {
                Some(ctx) => Some(ctx),
                None => {
                    self.metrics.address_misses.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        session = %self.name,
                        addr = ?addr,
                        protocol = envelope.header.protocol.name(),
                        message_type = envelope.header.message_type,
                        "dropping message for unknown endpoint"
                    );
                    return;
                }
            },
            None => None,
        };

        match self.router.dispatch(ctx.as_deref(), &envelope) {
            DispatchOutcome::Delivered => {
                self.metrics
                    .messages_delivered
                    .fetch_add(1, Ordering::Relaxed);
            }
            DispatchOutcome::NoHandler => {
                self.metrics
                    .no_handler_drops
                    .fetch_add(1, Ordering::Relaxed);
                warn!(
                    session = %self.name,
                    protocol = envelope.header.protocol.name(),
                    message_type = envelope.header.message_type,
                    "no handler registered, dropping"
                );
            }
            DispatchOutcome::HandlerFailed => {
                self.metrics
                    .handler_failures
                    .fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
