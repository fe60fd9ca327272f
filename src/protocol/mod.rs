//! Console wire protocol types.
//!
//! The protocol is line-oriented plain text with no message ids, lengths, or
//! terminators at this layer; record boundaries are the transport's concern.
//!
//! # Protocol Overview
//!
//! | Direction | Form | Purpose |
//! |-----------|------|---------|
//! | Outbound | `run <code>` | execute Lua source on the server |
//! | Outbound | `print <variable>` | print one global to the console |
//! | Outbound | `globals` | request a dump of all globals |
//! | Inbound | `_G…` | serialized global-table dump |
//! | Inbound | anything else | opaque console output |
//!
//! A server reply is recognized purely by its leading bytes: payloads
//! starting with [`GLOBALS_DUMP_PREFIX`] are globals dumps, everything else
//! is forwarded verbatim to the caller's data handlers.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Outbound command vocabulary |
//! | `payload` | Tagged inbound payload (text or binary) |
//! | `value` | Decoded Lua value model and decoder boundary |

// ============================================================================
// Submodules
// ============================================================================

/// Outbound command vocabulary.
pub mod command;

/// Tagged inbound payload.
pub mod payload;

/// Decoded Lua value model and decoder boundary.
pub mod value;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::Command;
pub use payload::Payload;
pub use value::{GlobalsDecoder, LuaKind, LuaValue};

// ============================================================================
// Globals Dump Recognition
// ============================================================================

/// Leading bytes that identify a globals dump.
///
/// This prefix is the sole framing/identification mechanism in the protocol.
pub const GLOBALS_DUMP_PREFIX: &str = "_G";

/// Returns `true` if `text` is a serialized global-table dump.
#[inline]
#[must_use]
pub fn is_globals_dump(text: &str) -> bool {
    text.starts_with(GLOBALS_DUMP_PREFIX)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_globals_dump_detection() {
        assert!(is_globals_dump("_G={}"));
        assert!(is_globals_dump("_G"));
        assert!(!is_globals_dump("hello"));
        assert!(!is_globals_dump(""));
        assert!(!is_globals_dump("G_"));
    }
}
