//! Console connection layer.
//!
//! Owns one transport, exposes the console's command vocabulary, and runs
//! the globals correlation protocol.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Connection, command vocabulary, event loop |
//! | `globals` | Globals state and the pending-request future |

// ============================================================================
// Submodules
// ============================================================================

/// Connection, command vocabulary, event loop.
pub mod connection;

/// Globals state and the pending-request future.
pub mod globals;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::Connection;
pub use globals::{GlobalsRequest, GlobalsState};
