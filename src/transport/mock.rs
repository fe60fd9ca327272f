//! Scripted transport for tests.
//!
//! `MockTransport` plays the console server side: tests push inbound
//! payloads and observe outbound sends through the paired [`MockRemote`].

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::protocol::Payload;
use crate::transport::{Transport, TransportStream};

// ============================================================================
// MockTransport
// ============================================================================

pub(crate) struct MockTransport {
    inbound: Option<mpsc::UnboundedReceiver<Payload>>,
    sent_tx: mpsc::UnboundedSender<String>,
    connected: bool,
    fail_connect: bool,
    closed: Arc<AtomicBool>,
}

/// Test-side handle: the remote console server.
pub(crate) struct MockRemote {
    inbound_tx: Option<mpsc::UnboundedSender<Payload>>,
    sent_rx: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
}

impl MockTransport {
    /// Creates a transport/remote pair.
    pub(crate) fn channel() -> (Self, MockRemote) {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));

        let transport = Self {
            inbound: Some(inbound_rx),
            sent_tx,
            connected: false,
            fail_connect: false,
            closed: Arc::clone(&closed),
        };
        let remote = MockRemote {
            inbound_tx: Some(inbound_tx),
            sent_rx,
            closed,
        };
        (transport, remote)
    }

    /// Makes the next `connect` fail with a connection error.
    pub(crate) fn failing() -> (Self, MockRemote) {
        let (mut transport, remote) = Self::channel();
        transport.fail_connect = true;
        (transport, remote)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self) -> Result<TransportStream> {
        if self.fail_connect {
            return Err(Error::connection("simulated refusal"));
        }
        if self.connected {
            return Err(Error::connection("socket already created"));
        }
        self.connected = true;
        let rx = self
            .inbound
            .take()
            .ok_or_else(|| Error::connection("socket already created"))?;
        Ok(TransportStream::new(rx))
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        if !self.connected {
            return Err(Error::ConnectionClosed);
        }
        self.sent_tx
            .send(text.to_string())
            .map_err(|_| Error::ConnectionClosed)
    }

    fn is_closed(&self) -> bool {
        !self.connected || self.closed.load(Ordering::SeqCst)
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl MockRemote {
    /// Pushes an inbound text payload.
    pub(crate) fn push_text(&self, text: &str) {
        self.push(Payload::from(text));
    }

    /// Pushes an inbound payload.
    pub(crate) fn push(&self, payload: Payload) {
        self.inbound_tx
            .as_ref()
            .expect("remote already disconnected")
            .send(payload)
            .expect("transport stream dropped");
    }

    /// Receives the next outbound send, if the loop has processed one.
    pub(crate) async fn next_sent(&mut self) -> Option<String> {
        self.sent_rx.recv().await
    }

    /// Returns an outbound send without waiting.
    pub(crate) fn try_next_sent(&mut self) -> Option<String> {
        self.sent_rx.try_recv().ok()
    }

    /// Simulates the remote end closing the socket.
    pub(crate) fn disconnect(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        self.inbound_tx = None;
    }
}
