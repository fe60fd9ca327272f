//! TCP socket transport.
//!
//! Dials the configured console address, splits the stream, and runs a
//! reader task that forwards inbound chunks as [`Payload`]s. Text mode (the
//! default) decodes chunks as lossy UTF-8; binary mode forwards raw bytes and
//! leaves normalization to the connection layer.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::config::ConsoleConfig;
use crate::error::{Error, Result};
use crate::protocol::Payload;
use crate::transport::{Transport, TransportStream};

// ============================================================================
// Constants
// ============================================================================

/// Read buffer size for the inbound task.
const READ_BUFFER_SIZE: usize = 4096;

// ============================================================================
// TcpTransport
// ============================================================================

/// TCP transport to a console server.
///
/// Construction validates the configuration eagerly; the socket itself is
/// created on [`Transport::connect`]. One socket per instance: a second
/// connect is rejected.
#[derive(Debug)]
pub struct TcpTransport {
    config: ConsoleConfig,
    text_mode: bool,
    writer: Option<OwnedWriteHalf>,
    closed: Arc<AtomicBool>,
}

impl TcpTransport {
    /// Creates a transport for the given console address, in text mode.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the host is empty or the port is zero.
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            text_mode: true,
            writer: None,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Sets text mode. When disabled, inbound chunks are delivered as
    /// [`Payload::Binary`].
    #[must_use]
    pub fn text_mode(mut self, enabled: bool) -> Self {
        self.text_mode = enabled;
        self
    }

    /// Reader task: forwards inbound chunks until EOF or error.
    async fn run_reader(
        mut reader: OwnedReadHalf,
        tx: mpsc::UnboundedSender<Payload>,
        text_mode: bool,
        closed: Arc<AtomicBool>,
    ) {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => {
                    debug!("Socket closed by remote");
                    break;
                }
                Ok(n) => {
                    let payload = if text_mode {
                        Payload::Text(String::from_utf8_lossy(&buf[..n]).into_owned())
                    } else {
                        Payload::Binary(buf[..n].to_vec())
                    };
                    trace!(bytes = n, "Payload received");
                    if tx.send(payload).is_err() {
                        debug!("Inbound receiver dropped");
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Socket read error");
                    break;
                }
            }
        }
        closed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<TransportStream> {
        if self.writer.is_some() {
            return Err(Error::connection("socket already created"));
        }

        let addr = self.config.addr();
        debug!(%addr, "Dialing console server");

        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| Error::connection(format!("{addr}: {e}")))?;

        let (reader, writer) = stream.into_split();
        self.writer = Some(writer);
        self.closed.store(false, Ordering::SeqCst);

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run_reader(
            reader,
            tx,
            self.text_mode,
            Arc::clone(&self.closed),
        ));

        debug!(%addr, "Connected");
        Ok(TransportStream::new(rx))
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::ConnectionClosed)?;
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await?;
        trace!(len = text.len(), "Payload sent");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.writer.is_none() || self.closed.load(Ordering::SeqCst)
    }

    async fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.shutdown().await;
            debug!("Socket shut down");
        }
        self.closed.store(true, Ordering::SeqCst);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn local_server() -> (TcpListener, ConsoleConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, ConsoleConfig::new("127.0.0.1", port))
    }

    #[test]
    fn test_invalid_config_rejected_eagerly() {
        let err = TcpTransport::new(ConsoleConfig::new("", 1234)).unwrap_err();
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_closed_before_connect() {
        let transport = TcpTransport::new(ConsoleConfig::new("localhost", 1234)).unwrap();
        assert!(transport.is_closed());
    }

    #[tokio::test]
    async fn test_send_before_connect_errors() {
        let mut transport = TcpTransport::new(ConsoleConfig::new("localhost", 1234)).unwrap();
        let err = transport.send("globals").await.unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_double_connect_rejected() {
        let (listener, config) = local_server().await;
        let mut transport = TcpTransport::new(config).unwrap();

        let accept = tokio::spawn(async move { listener.accept().await.unwrap() });
        let _stream = transport.connect().await.unwrap();
        let _ = accept.await.unwrap();

        let err = transport.connect().await.unwrap_err();
        assert!(err.is_connection_error());
    }

    #[tokio::test]
    async fn test_send_reaches_server() {
        let (listener, config) = local_server().await;
        let mut transport = TcpTransport::new(config).unwrap();

        let accept = tokio::spawn(async move { listener.accept().await.unwrap() });
        let _stream = transport.connect().await.unwrap();
        let (mut server_side, _) = accept.await.unwrap();

        transport.send("run print(1)").await.unwrap();
        transport.close().await;

        let mut received = String::new();
        server_side.read_to_string(&mut received).await.unwrap();
        assert_eq!(received, "run print(1)");
    }

    #[tokio::test]
    async fn test_remote_close_ends_stream() {
        let (listener, config) = local_server().await;
        let mut transport = TcpTransport::new(config).unwrap();

        let accept = tokio::spawn(async move { listener.accept().await.unwrap() });
        let mut stream = transport.connect().await.unwrap();
        let (server_side, _) = accept.await.unwrap();

        drop(server_side);
        assert!(stream.recv().await.is_none());
        assert!(transport.is_closed());
    }

    #[tokio::test]
    async fn test_text_mode_payloads() {
        let (listener, config) = local_server().await;
        let mut transport = TcpTransport::new(config).unwrap();

        let accept = tokio::spawn(async move { listener.accept().await.unwrap() });
        let mut stream = transport.connect().await.unwrap();
        let (mut server_side, _) = accept.await.unwrap();

        server_side.write_all(b"_Gx=1").await.unwrap();
        server_side.flush().await.unwrap();

        let payload = stream.recv().await.unwrap();
        assert_eq!(payload, Payload::Text("_Gx=1".into()));
    }
}
