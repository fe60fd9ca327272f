//! Tagged inbound payload.

// ============================================================================
// Payload
// ============================================================================

/// One inbound message from the transport.
///
/// Transports in text mode deliver [`Payload::Text`]; binary-mode transports
/// deliver raw chunks. The connection normalizes everything to text before
/// dispatch, matching the console's text-only vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Decoded text message.
    Text(String),
    /// Raw byte sequence.
    Binary(Vec<u8>),
}

impl Payload {
    /// Normalizes the payload to text.
    ///
    /// Binary payloads are decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Returns the payload length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    /// Returns `true` if the payload is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_passthrough() {
        let payload = Payload::from("_G={}");
        assert_eq!(payload.into_text(), "_G={}");
    }

    #[test]
    fn test_binary_normalized_to_text() {
        let payload = Payload::Binary(b"_Gx=1".to_vec());
        assert_eq!(payload.into_text(), "_Gx=1");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let payload = Payload::Binary(vec![0x5f, 0x47, 0xff]);
        let text = payload.into_text();
        assert!(text.starts_with("_G"));
        assert!(text.contains('\u{fffd}'));
    }

    #[test]
    fn test_len() {
        assert_eq!(Payload::from("abc").len(), 3);
        assert_eq!(Payload::Binary(vec![1, 2]).len(), 2);
        assert!(Payload::from("").is_empty());
    }
}
