//! # Character Token Tensorizer

use core::borrow::Borrow;
use std::sync::Arc;

use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::{
    data::{ColumnSchema, Row, Token},
    errors::TZResult,
    padding::{pad_and_stack, pad_and_stack_nested},
    tensorizers::{CorpusInitializer, Tensorizer, TokenTensorizer, TokenTensorizerOptions},
    tokenizers::TokenizerHandle,
    types::IndexType,
};

/// Default maximum characters kept per token.
pub const DEFAULT_MAX_CHAR_LENGTH: usize = 20;

/// Options for [`CharacterTokenTensorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterTokenTensorizerOptions {
    /// Column, tokenizer, boundary, and truncation options.
    #[serde(flatten)]
    pub token: TokenTensorizerOptions,

    /// Maximum characters kept per token.
    pub max_char_length: usize,
}

impl Default for CharacterTokenTensorizerOptions {
    fn default() -> Self {
        Self {
            token: TokenTensorizerOptions::default(),
            max_char_length: DEFAULT_MAX_CHAR_LENGTH,
        }
    }
}

impl From<TokenTensorizerOptions> for CharacterTokenTensorizerOptions {
    fn from(token: TokenTensorizerOptions) -> Self {
        Self {
            token,
            ..Default::default()
        }
    }
}

impl CharacterTokenTensorizerOptions {
    /// Set the maximum characters kept per token.
    pub fn with_max_char_length(
        self,
        max_char_length: usize,
    ) -> Self {
        Self {
            max_char_length,
            ..self
        }
    }

    /// Build a [`CharacterTokenTensorizer`] with the configured tokenizer.
    pub fn init(self) -> TZResult<CharacterTokenTensorizer> {
        let tokenizer = Arc::new(self.token.tokenizer.clone().init()?);
        Ok(CharacterTokenTensorizer::new(self, tokenizer))
    }
}

/// Per-token character codes of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharRow {
    /// Per token, its (truncated) character code points.
    pub chars: Vec<Vec<IndexType>>,

    /// Per token, its character count.
    pub lengths: Vec<IndexType>,
}

/// A batch of per-token character codes, padded in both dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct CharTensors {
    /// ``(batch, max_tokens, max_chars)`` code points; padding is 0.
    pub chars: Array3<IndexType>,

    /// ``(batch, max_tokens)`` character counts; padding tokens have length 0.
    pub lengths: Array2<IndexType>,
}

/// Converts each token to its character code points.
///
/// Tokenization, truncation, and boundary tokens follow [`TokenTensorizer`],
/// but no vocabulary is built: characters are numbered by code point.
#[derive(Debug, Clone)]
pub struct CharacterTokenTensorizer {
    tokens: TokenTensorizer,
    max_char_length: usize,
}

impl CharacterTokenTensorizer {
    /// Create a new tensorizer.
    ///
    /// ## Arguments
    /// * `options` - the tensorizer options; `options.token.tokenizer` is ignored.
    /// * `tokenizer` - the tokenizer to use.
    pub fn new(
        options: CharacterTokenTensorizerOptions,
        tokenizer: TokenizerHandle,
    ) -> Self {
        Self {
            tokens: TokenTensorizer::new(options.token, tokenizer),
            max_char_length: options.max_char_length,
        }
    }

    /// The token options.
    pub fn options(&self) -> &TokenTensorizerOptions {
        self.tokens.options()
    }

    /// Maximum characters kept per token.
    pub fn max_char_length(&self) -> usize {
        self.max_char_length
    }

    fn numberize_token(
        &self,
        token: &Token,
    ) -> Vec<IndexType> {
        token
            .value
            .chars()
            .take(self.max_char_length)
            .map(|c| u32::from(c) as IndexType)
            .collect()
    }
}

impl CorpusInitializer for CharacterTokenTensorizer {
    type State = ();
}

impl Tensorizer for CharacterTokenTensorizer {
    type Numberized = CharRow;
    type Tensors = CharTensors;

    fn column_schema(&self) -> ColumnSchema {
        self.tokens.column_schema()
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        let text = row.text(&self.tokens.options().column)?;
        let chars: Vec<Vec<IndexType>> = self
            .tokens
            .tokenize_bounded(text)
            .iter()
            .map(|t| self.numberize_token(t))
            .collect();
        let lengths = chars.iter().map(|c| c.len() as IndexType).collect();
        Ok(CharRow { chars, lengths })
    }

    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        let chars: Vec<&[Vec<IndexType>]> = batch.iter().map(|r| r.borrow().chars.as_slice()).collect();
        let lengths: Vec<&[IndexType]> = batch.iter().map(|r| r.borrow().lengths.as_slice()).collect();
        Ok(CharTensors {
            chars: pad_and_stack_nested(&chars, 0),
            lengths: pad_and_stack(&lengths, 0),
        })
    }

    fn sort_key(
        &self,
        row: &Self::Numberized,
    ) -> Option<usize> {
        Some(row.chars.len())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_numberize() {
        let tensorizer = CharacterTokenTensorizerOptions::default()
            .with_max_char_length(3)
            .init()
            .unwrap();
        assert!(tensorizer.start().is_none());

        let out = tensorizer
            .numberize(&Row::new().with("text", "Hello ab"))
            .unwrap();
        assert_eq!(out.chars, vec![vec![104, 101, 108], vec![97, 98]]);
        assert_eq!(out.lengths, vec![3, 2]);
        assert_eq!(tensorizer.sort_key(&out), Some(2));
    }

    #[test]
    fn test_boundaries_and_truncation() {
        let options = TokenTensorizerOptions::default()
            .with_max_seq_len(Some(1))
            .with_eos_token(true);
        let tensorizer = CharacterTokenTensorizerOptions::from(options)
            .with_max_char_length(2)
            .init()
            .unwrap();

        let out = tensorizer
            .numberize(&Row::new().with("text", "xyz abc"))
            .unwrap();
        // "xyz" truncated to 2 chars, then the EOS symbol truncated to "__".
        assert_eq!(out.chars, vec![vec![120, 121], vec![95, 95]]);
    }

    #[test]
    fn test_tensorize_both_dims() {
        let tensorizer = CharacterTokenTensorizerOptions::default().init().unwrap();
        let rows = vec![
            tensorizer
                .numberize(&Row::new().with("text", "a bcde fg"))
                .unwrap(),
            tensorizer.numberize(&Row::new().with("text", "h")).unwrap(),
        ];

        let tensors = tensorizer.tensorize(&rows).unwrap();
        assert_eq!(tensors.chars.dim(), (2, 3, 4));
        assert_eq!(tensors.lengths, array![[1, 4, 2], [1, 0, 0]]);
        assert_eq!(
            tensors.chars,
            array![
                [[97, 0, 0, 0], [98, 99, 100, 101], [102, 103, 0, 0]],
                [[104, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            ]
        );
    }
}
