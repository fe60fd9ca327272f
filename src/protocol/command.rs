//! Outbound command vocabulary.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// Command
// ============================================================================

/// All outbound console commands.
///
/// [`Command::encode`] produces the exact wire form; there is no quoting or
/// escaping, the payload is embedded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Execute Lua source on the server (`run <code>`).
    Run(String),
    /// Print one global variable to the console (`print <variable>`).
    Print(String),
    /// Request a dump of all globals (`globals`).
    Globals,
    /// Arbitrary text sent verbatim.
    Raw(String),
}

impl Command {
    /// Encodes the command into its wire form.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Run(code) => write!(f, "run {code}"),
            Self::Print(variable) => write!(f, "print {variable}"),
            Self::Globals => f.write_str("globals"),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
