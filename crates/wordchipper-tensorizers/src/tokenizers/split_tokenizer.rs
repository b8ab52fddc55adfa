//! # Split Tokenizer

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{data::Token, errors::TZResult, tokenizers::Tokenizer};

/// Default separator pattern: runs of whitespace.
pub const DEFAULT_SPLIT_PATTERN: &str = r"\s+";

/// Options for [`SplitTokenizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    /// Regex matching the separators between tokens.
    pub split_regex: String,

    /// Lower-case token values.
    pub lowercase: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            split_regex: DEFAULT_SPLIT_PATTERN.to_string(),
            lowercase: true,
        }
    }
}

impl TokenizerOptions {
    /// Set the separator regex.
    pub fn with_split_regex<S: Into<String>>(
        self,
        split_regex: S,
    ) -> Self {
        Self {
            split_regex: split_regex.into(),
            ..self
        }
    }

    /// Set whether to lower-case token values.
    pub fn with_lowercase(
        self,
        lowercase: bool,
    ) -> Self {
        Self { lowercase, ..self }
    }

    /// Build a [`SplitTokenizer`] from these options.
    ///
    /// ## Returns
    /// The tokenizer, or a regex compilation error.
    pub fn init(self) -> TZResult<SplitTokenizer> {
        SplitTokenizer::new(self)
    }
}

/// Splits text on a separator regex, yielding the non-empty pieces between.
///
/// Token offsets are character (not byte) offsets; values are optionally
/// lower-cased after the offsets are taken from the source text.
#[derive(Debug, Clone)]
pub struct SplitTokenizer {
    options: TokenizerOptions,
    split_re: Regex,
}

impl Default for SplitTokenizer {
    fn default() -> Self {
        TokenizerOptions::default()
            .init()
            .expect("default split pattern compiles")
    }
}

impl SplitTokenizer {
    /// Create a new tokenizer.
    ///
    /// ## Arguments
    /// * `options` - the tokenizer options.
    pub fn new(options: TokenizerOptions) -> TZResult<Self> {
        let split_re = Regex::new(&options.split_regex)?;
        Ok(Self { options, split_re })
    }

    /// The tokenizer options.
    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    fn push_piece(
        &self,
        piece: &str,
        char_pos: &mut i64,
        tokens: &mut Vec<Token>,
    ) {
        let len = piece.chars().count() as i64;
        if len > 0 {
            let value = if self.options.lowercase {
                piece.to_lowercase()
            } else {
                piece.to_string()
            };
            tokens.push(Token::new(value, *char_pos, *char_pos + len));
        }
        *char_pos += len;
    }
}

impl Tokenizer for SplitTokenizer {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text)))]
    fn tokenize(
        &self,
        text: &str,
    ) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut char_pos: i64 = 0;
        let mut last = 0;

        for sep in self.split_re.find_iter(text) {
            self.push_piece(&text[last..sep.start()], &mut char_pos, &mut tokens);
            char_pos += sep.as_str().chars().count() as i64;
            last = sep.end();
        }
        self.push_piece(&text[last..], &mut char_pos, &mut tokens);

        tokens
    }
}
