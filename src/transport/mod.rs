//! Transport boundary.
//!
//! The connection consumes the transport as an opaque capability: something
//! that can dial, send a string, deliver inbound payloads, and close. The
//! [`Transport`] trait is the seam; [`TcpTransport`] is the shipped TCP
//! implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                        ┌─────────────────┐
//! │ Connection       │   Transport::send      │ Console server  │
//! │  (event loop)    │───────────────────────►│  (Lua host)     │
//! │                  │   TransportStream      │                 │
//! │                  │◄───────────────────────│                 │
//! └──────────────────┘      host:port         └─────────────────┘
//! ```
//!
//! `connect` hands back a [`TransportStream`], the inbound half, so the event
//! loop can `select!` over inbound payloads and API commands without holding
//! a borrow on the transport itself.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `tcp` | TCP socket transport |

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::protocol::Payload;

// ============================================================================
// Submodules
// ============================================================================

/// TCP socket transport.
pub mod tcp;

#[cfg(test)]
pub(crate) mod mock;

// ============================================================================
// Re-exports
// ============================================================================

pub use tcp::TcpTransport;

// ============================================================================
// Transport Trait
// ============================================================================

/// Connection-oriented text/byte stream to a console server.
///
/// One transport instance backs exactly one [`Connection`](crate::Connection)
/// and owns at most one socket for its lifetime: a second `connect` on the
/// same instance is rejected, not silently ignored.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Establishes the underlying socket and returns the inbound half.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`](crate::Error::Connection) if the socket cannot
    ///   be established, or if one already exists for this instance.
    async fn connect(&mut self) -> Result<TransportStream>;

    /// Transmits `text` verbatim.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`](crate::Error::ConnectionClosed) if no
    ///   socket exists.
    /// - [`Error::Io`](crate::Error::Io) on write failure.
    async fn send(&mut self, text: &str) -> Result<()>;

    /// Queries closed/open state without side effects.
    fn is_closed(&self) -> bool;

    /// Terminates the connection. Idempotent.
    async fn close(&mut self);
}

// ============================================================================
// TransportStream
// ============================================================================

/// Inbound half of a connected transport.
///
/// Yields one [`Payload`] per inbound message; `None` signals close.
#[derive(Debug)]
pub struct TransportStream {
    rx: mpsc::UnboundedReceiver<Payload>,
}

impl TransportStream {
    /// Wraps a payload channel as a stream.
    #[must_use]
    pub fn new(rx: mpsc::UnboundedReceiver<Payload>) -> Self {
        Self { rx }
    }

    /// Receives the next inbound payload.
    ///
    /// Returns `None` once the transport has closed.
    pub async fn recv(&mut self) -> Option<Payload> {
        self.rx.recv().await
    }
}
