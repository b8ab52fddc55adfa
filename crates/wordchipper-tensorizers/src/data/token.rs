//! # Tokens and Span Labels

use serde::{Deserialize, Serialize};

/// Offset used by synthetic tokens which have no source span.
pub const NO_SPAN: i64 = -1;

/// A token produced by a [`crate::tokenizers::Tokenizer`].
///
/// ``start`` and ``end`` are half-open character offsets into the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// The token text.
    pub value: String,

    /// Start character offset (inclusive).
    pub start: i64,

    /// End character offset (exclusive).
    pub end: i64,
}

impl Token {
    /// Create a new token.
    pub fn new<S: Into<String>>(
        value: S,
        start: i64,
        end: i64,
    ) -> Self {
        Self {
            value: value.into(),
            start,
            end,
        }
    }

    /// Create a synthetic token with no source span.
    pub fn synthetic<S: Into<String>>(value: S) -> Self {
        Self::new(value, NO_SPAN, NO_SPAN)
    }

    /// Is this a synthetic token?
    pub fn is_synthetic(&self) -> bool {
        self.start == NO_SPAN && self.end == NO_SPAN
    }
}

/// A labeled character interval over raw text.
///
/// Span labels are supplied externally and need not line up with token boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanLabel {
    /// The label text.
    pub label: String,

    /// Start character offset (inclusive).
    pub start: i64,

    /// End character offset (exclusive).
    pub end: i64,
}

impl SpanLabel {
    /// Create a new span label.
    pub fn new<S: Into<String>>(
        label: S,
        start: i64,
        end: i64,
    ) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_token() {
        let tok = Token::synthetic("__EOS__");
        assert!(tok.is_synthetic());
        assert_eq!(tok.start, NO_SPAN);

        assert!(!Token::new("a", 0, 1).is_synthetic());
    }

    #[test]
    fn test_span_label_json() {
        let span: SpanLabel =
            serde_json::from_str(r#"{"label": "song_name", "start": 9, "end": 13}"#).unwrap();
        assert_eq!(span, SpanLabel::new("song_name", 9, 13));
    }
}
