//! Async client for Lua-scriptable remote console servers.
//!
//! This library speaks the line-oriented text protocol exposed by
//! Lua-scriptable console servers over TCP: send textual commands
//! (`run <code>`, `print <variable>`, `globals`), receive asynchronous
//! console output, and correlate the `globals` request with its reply.
//!
//! # Architecture
//!
//! The wire protocol is an unframed broadcast stream with no request ids,
//! lengths, or terminators. The only reply that can be correlated is the
//! globals dump, recognized purely by its leading `_G` bytes; the
//! [`Connection`] turns that content sniff into an explicit single-slot
//! request: [`Connection::get_globals`] returns a cancellable
//! [`GlobalsRequest`] future resolved by the next matching payload.
//!
//! Key design principles:
//!
//! - Each [`Connection`] owns: one [`Transport`] + one event-loop task
//! - Callbacks, never blocking waits: `on_connect`/`on_data`/`on_close`
//! - [`Signal`] fan-out with stable [`SubscriptionId`] handles
//! - Typed state everywhere: [`Payload`], [`GlobalsState`], [`LuaValue`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lua_console::{Connection, ConsoleConfig, LuaValue, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Any `Fn(&str) -> Result<LuaValue>` works as the dump decoder.
//!     let decoder = Arc::new(|dump: &str| -> Result<LuaValue> { Ok(LuaValue::from(dump)) });
//!
//!     let connection = Connection::new(ConsoleConfig::new("localhost", 1234), decoder)?;
//!     connection.on_data(|text| println!("console: {text}"));
//!     connection.connect();
//!
//!     connection.run_lua("print('hello')");
//!     let globals = connection.get_globals().await?;
//!     println!("globals: {globals:?}");
//!
//!     connection.disconnect();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Console endpoint configuration |
//! | [`console`] | [`Connection`] and the globals correlation protocol |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | Wire commands, payloads, decoded values |
//! | [`signal`] | Synchronous pub/sub primitive |
//! | [`transport`] | Transport boundary and TCP implementation |
//!
//! # Non-goals
//!
//! This layer does not frame messages, does not key concurrent requests,
//! does not time out a pending request, and does not retry or reconnect.
//! All resilience is pushed to the caller.

// ============================================================================
// Modules
// ============================================================================

/// Console endpoint configuration.
pub mod config;

/// Console connection layer.
///
/// Command vocabulary, event loop, and the globals correlation protocol.
pub mod console;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Wire protocol types.
///
/// Outbound commands, tagged inbound payloads, and the decoded value model.
pub mod protocol;

/// Synchronous pub/sub primitive.
///
/// Ordered fan-out with stable subscription handles.
pub mod signal;

/// Transport boundary.
///
/// The [`Transport`] trait and the shipped [`TcpTransport`].
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration
pub use config::ConsoleConfig;

// Console types
pub use console::{Connection, GlobalsRequest, GlobalsState};

// Error types
pub use error::{Error, Result};

// Protocol types
pub use protocol::{Command, GlobalsDecoder, LuaKind, LuaValue, Payload};

// Signal types
pub use signal::{Signal, SubscriptionId};

// Transport types
pub use transport::{TcpTransport, Transport, TransportStream};
