//! Decoded Lua value model and the decoder boundary.
//!
//! Deserializing the globals dump text is an external concern: this crate
//! only defines the [`GlobalsDecoder`] seam and the closed [`LuaValue`] set
//! a decoder produces. Any `Fn(&str) -> Result<LuaValue>` closure implements
//! the trait.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::error::Result;

// ============================================================================
// LuaValue
// ============================================================================

/// The kind of a [`LuaValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuaKind {
    /// `nil`.
    Nil,
    /// Boolean.
    Boolean,
    /// Number (Lua numbers are floating point).
    Number,
    /// String.
    String,
    /// Table.
    Table,
}

/// A decoded Lua value.
///
/// A globals dump decodes to a [`LuaValue::Table`] mapping variable names to
/// values.
#[derive(Debug, Clone, PartialEq)]
pub enum LuaValue {
    /// `nil`.
    Nil,
    /// Boolean value.
    Boolean(bool),
    /// Numeric value.
    Number(f64),
    /// String value.
    String(String),
    /// Table keyed by identifier.
    Table(BTreeMap<String, LuaValue>),
}

impl LuaValue {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> LuaKind {
        match self {
            Self::Nil => LuaKind::Nil,
            Self::Boolean(_) => LuaKind::Boolean,
            Self::Number(_) => LuaKind::Number,
            Self::String(_) => LuaKind::String,
            Self::Table(_) => LuaKind::Table,
        }
    }

    /// Returns `true` if the value is `nil`.
    #[inline]
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the boolean value, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric value, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string value, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the table, if any.
    #[must_use]
    pub fn as_table(&self) -> Option<&BTreeMap<String, LuaValue>> {
        match self {
            Self::Table(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` in a table value.
    ///
    /// Returns `None` for non-table values or missing keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LuaValue> {
        self.as_table().and_then(|map| map.get(key))
    }
}

impl From<bool> for LuaValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for LuaValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for LuaValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

// ============================================================================
// GlobalsDecoder
// ============================================================================

/// External deserializer for globals dump text.
///
/// The console server emits globals as serialized Lua table text prefixed
/// with `_G`; how that text maps to a [`LuaValue`] is up to the decoder the
/// caller injects at [`Connection`](crate::Connection) construction.
pub trait GlobalsDecoder: Send + Sync {
    /// Decodes one dump into a native value.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`](crate::Error::Decode) (or any other error) if the
    /// dump text is malformed. The error becomes the result of the pending
    /// globals request.
    fn decode(&self, dump: &str) -> Result<LuaValue>;
}

impl<F> GlobalsDecoder for F
where
    F: Fn(&str) -> Result<LuaValue> + Send + Sync,
{
    fn decode(&self, dump: &str) -> Result<LuaValue> {
        self(dump)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(LuaValue::Nil.kind(), LuaKind::Nil);
        assert_eq!(LuaValue::from(true).kind(), LuaKind::Boolean);
        assert_eq!(LuaValue::from(4.0).kind(), LuaKind::Number);
        assert_eq!(LuaValue::from("x").kind(), LuaKind::String);
        assert_eq!(LuaValue::Table(BTreeMap::new()).kind(), LuaKind::Table);
    }

    #[test]
    fn test_accessors() {
        assert!(LuaValue::Nil.is_nil());
        assert_eq!(LuaValue::from(true).as_bool(), Some(true));
        assert_eq!(LuaValue::from(1.5).as_number(), Some(1.5));
        assert_eq!(LuaValue::from("hp").as_str(), Some("hp"));
        assert_eq!(LuaValue::from("hp").as_bool(), None);
    }

    #[test]
    fn test_table_lookup() {
        let mut map = BTreeMap::new();
        map.insert("score".to_string(), LuaValue::from(10.0));
        let table = LuaValue::Table(map);

        assert_eq!(table.get("score").and_then(LuaValue::as_number), Some(10.0));
        assert!(table.get("missing").is_none());
        assert!(LuaValue::Nil.get("score").is_none());
    }

    #[test]
    fn test_closure_decoder() {
        let decoder = |dump: &str| -> Result<LuaValue> { Ok(LuaValue::from(dump)) };
        let value = decoder.decode("_Gx=1").unwrap();
        assert_eq!(value.as_str(), Some("_Gx=1"));
    }
}
