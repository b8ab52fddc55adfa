//! # Token Tensorizer

use core::borrow::Borrow;
use std::sync::Arc;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{
    data::{ColumnSchema, ColumnSpec, Row, Token},
    errors::{TZResult, TensorizerError},
    padding::{pad_and_stack, stack},
    tensorizers::{CorpusInitializer, Tensorizer},
    tokenizers::{TokenizerHandle, TokenizerOptions},
    types::IndexType,
    vocab::{SpecialToken, VocabBuilder, Vocabulary},
};

/// Options for [`TokenTensorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenTensorizerOptions {
    /// The text column.
    pub column: String,

    /// The tokenizer configuration.
    pub tokenizer: TokenizerOptions,

    /// Prepend a start boundary token.
    pub add_bos_token: bool,

    /// Append an EOS boundary token.
    pub add_eos_token: bool,

    /// Use EOS as the start boundary token.
    pub use_eos_token_for_bos: bool,

    /// Maximum number of source tokens kept, before boundary tokens.
    ///
    /// `None` is unbounded.
    pub max_seq_len: Option<usize>,
}

impl Default for TokenTensorizerOptions {
    fn default() -> Self {
        Self {
            column: "text".to_string(),
            tokenizer: TokenizerOptions::default(),
            add_bos_token: false,
            add_eos_token: false,
            use_eos_token_for_bos: false,
            max_seq_len: None,
        }
    }
}

impl TokenTensorizerOptions {
    /// Set the text column.
    pub fn with_column<S: Into<String>>(
        self,
        column: S,
    ) -> Self {
        Self {
            column: column.into(),
            ..self
        }
    }

    /// Set the tokenizer configuration.
    pub fn with_tokenizer(
        self,
        tokenizer: TokenizerOptions,
    ) -> Self {
        Self { tokenizer, ..self }
    }

    /// Set whether to prepend a start boundary token.
    pub fn with_bos_token(
        self,
        add_bos_token: bool,
    ) -> Self {
        Self {
            add_bos_token,
            ..self
        }
    }

    /// Set whether to append an EOS boundary token.
    pub fn with_eos_token(
        self,
        add_eos_token: bool,
    ) -> Self {
        Self {
            add_eos_token,
            ..self
        }
    }

    /// Set whether EOS is reused as the start boundary token.
    pub fn with_eos_token_for_bos(
        self,
        use_eos_token_for_bos: bool,
    ) -> Self {
        Self {
            use_eos_token_for_bos,
            ..self
        }
    }

    /// Set the maximum number of source tokens.
    pub fn with_max_seq_len(
        self,
        max_seq_len: Option<usize>,
    ) -> Self {
        Self {
            max_seq_len,
            ..self
        }
    }

    /// The symbol used as the start boundary token.
    pub fn bos_symbol(&self) -> SpecialToken {
        if self.use_eos_token_for_bos {
            SpecialToken::Eos
        } else {
            SpecialToken::Bos
        }
    }

    /// Build a [`TokenTensorizer`] with the configured tokenizer.
    pub fn init(self) -> TZResult<TokenTensorizer> {
        let tokenizer = Arc::new(self.tokenizer.clone().init()?);
        Ok(TokenTensorizer::new(self, tokenizer))
    }
}

/// A numberized id sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRow {
    /// The ids.
    pub ids: Vec<IndexType>,

    /// The sequence length; always ``ids.len()``.
    pub len: usize,
}

impl From<Vec<IndexType>> for SequenceRow {
    fn from(ids: Vec<IndexType>) -> Self {
        let len = ids.len();
        Self { ids, len }
    }
}

/// A padded batch of id sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceTensors {
    /// ``(batch, max_len)`` ids, right-padded.
    pub ids: Array2<IndexType>,

    /// ``(batch,)`` sequence lengths.
    pub lengths: Array1<IndexType>,
}

impl SequenceTensors {
    /// Pad and stack [`SequenceRow`]s.
    ///
    /// ## Arguments
    /// * `batch` - the rows.
    /// * `pad` - the id written past the end of each row.
    pub fn from_rows<B>(
        batch: &[B],
        pad: IndexType,
    ) -> Self
    where
        B: Borrow<SequenceRow>,
    {
        let ids: Vec<&[IndexType]> = batch.iter().map(|r| r.borrow().ids.as_slice()).collect();
        let lengths: Vec<IndexType> = batch
            .iter()
            .map(|r| r.borrow().len as IndexType)
            .collect();
        Self {
            ids: pad_and_stack(&ids, pad),
            lengths: stack(&lengths),
        }
    }
}

/// Looked up tokens with their source offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLookup {
    /// Vocabulary ids.
    pub ids: Vec<usize>,

    /// Start offsets; ``-1`` for boundary tokens.
    pub starts: Vec<i64>,

    /// End offsets; ``-1`` for boundary tokens.
    pub ends: Vec<i64>,
}

/// Converts text to vocabulary ids.
///
/// The vocabulary is built from the tokenized training corpus, unless one is
/// supplied up front with [`TokenTensorizer::with_vocab`].
#[derive(Debug, Clone)]
pub struct TokenTensorizer {
    options: TokenTensorizerOptions,
    tokenizer: TokenizerHandle,
    vocab: Option<Arc<Vocabulary>>,
}

impl TokenTensorizer {
    /// Create a new tensorizer.
    ///
    /// ## Arguments
    /// * `options` - the tensorizer options; `options.tokenizer` is ignored.
    /// * `tokenizer` - the tokenizer to use.
    pub fn new(
        options: TokenTensorizerOptions,
        tokenizer: TokenizerHandle,
    ) -> Self {
        Self {
            options,
            tokenizer,
            vocab: None,
        }
    }

    /// Use a pre-built vocabulary; the corpus pass is skipped.
    pub fn with_vocab(
        self,
        vocab: Arc<Vocabulary>,
    ) -> Self {
        Self {
            vocab: Some(vocab),
            ..self
        }
    }

    /// The options.
    pub fn options(&self) -> &TokenTensorizerOptions {
        &self.options
    }

    /// The tokenizer.
    pub fn tokenizer(&self) -> &TokenizerHandle {
        &self.tokenizer
    }

    /// The vocabulary, once built.
    pub fn vocab(&self) -> Option<&Arc<Vocabulary>> {
        self.vocab.as_ref()
    }

    fn frozen_vocab(&self) -> TZResult<&Vocabulary> {
        self.vocab
            .as_deref()
            .ok_or(TensorizerError::Uninitialized {
                tensorizer: "TokenTensorizer",
            })
    }

    /// A [`VocabBuilder`] reserving every special symbol this tensorizer emits.
    pub fn vocab_builder(&self) -> VocabBuilder {
        let opts = &self.options;
        let bos = opts.add_bos_token && opts.bos_symbol() == SpecialToken::Bos;
        let eos = opts.add_eos_token || (opts.add_bos_token && opts.bos_symbol() == SpecialToken::Eos);
        VocabBuilder::new().with_bos(bos).with_eos(eos)
    }

    /// Tokenize, truncate to ``max_seq_len``, and add the configured boundary tokens.
    pub fn tokenize_bounded(
        &self,
        text: &str,
    ) -> Vec<Token> {
        let opts = &self.options;
        let mut tokens = self.tokenizer.tokenize(text);
        if let Some(max_seq_len) = opts.max_seq_len {
            tokens.truncate(max_seq_len);
        }
        if opts.add_bos_token {
            tokens.insert(0, Token::synthetic(opts.bos_symbol().as_str()));
        }
        if opts.add_eos_token {
            tokens.push(Token::synthetic(SpecialToken::Eos.as_str()));
        }
        tokens
    }

    /// Tokenize and look up text.
    ///
    /// Unknown tokens map to the UNK index.
    pub fn lookup_tokens(
        &self,
        text: &str,
    ) -> TZResult<TokenLookup> {
        let vocab = self.frozen_vocab()?;
        let tokens = self.tokenize_bounded(text);

        let ids = vocab.lookup_all(tokens.iter().map(|t| t.value.as_str()))?;
        let (starts, ends) = tokens.iter().map(|t| (t.start, t.end)).unzip();
        Ok(TokenLookup { ids, starts, ends })
    }

    /// Map ids back to their symbols.
    pub fn reverse_lookup(
        &self,
        ids: &[IndexType],
    ) -> TZResult<Vec<String>> {
        let vocab = self.frozen_vocab()?;
        ids.iter()
            .map(|&id| {
                usize::try_from(id)
                    .ok()
                    .and_then(|idx| vocab.symbol(idx))
                    .map(str::to_string)
                    .ok_or_else(|| TensorizerError::UnknownSymbol {
                        symbol: id.to_string(),
                    })
            })
            .collect()
    }

    /// The PAD id.
    pub fn pad_idx(&self) -> TZResult<IndexType> {
        let vocab = self.frozen_vocab()?;
        vocab
            .pad_idx()
            .map(|idx| idx as IndexType)
            .ok_or_else(|| TensorizerError::InvalidConfig("vocabulary has no PAD symbol".to_string()))
    }
}

impl CorpusInitializer for TokenTensorizer {
    type State = VocabBuilder;

    fn start(&self) -> Option<Self::State> {
        if self.vocab.is_some() {
            return None;
        }
        Some(self.vocab_builder())
    }

    fn accept(
        &self,
        state: &mut Self::State,
        row: &Row,
    ) -> TZResult<()> {
        let text = row.text(&self.options.column)?;
        state.add_all(self.tokenizer.tokenize(text).iter().map(|t| &t.value));
        Ok(())
    }

    fn finish(
        &mut self,
        state: Self::State,
    ) -> TZResult<()> {
        let vocab = state.make_vocab();
        log::debug!(
            "TokenTensorizer[{}]: vocabulary of {} symbols",
            self.options.column,
            vocab.len()
        );
        self.vocab = Some(Arc::new(vocab));
        Ok(())
    }
}

impl Tensorizer for TokenTensorizer {
    type Numberized = SequenceRow;
    type Tensors = SequenceTensors;

    fn column_schema(&self) -> ColumnSchema {
        vec![ColumnSpec::text(&self.options.column)]
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, row)))]
    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        let lookup = self.lookup_tokens(row.text(&self.options.column)?)?;
        Ok(lookup
            .ids
            .into_iter()
            .map(|id| id as IndexType)
            .collect::<Vec<_>>()
            .into())
    }

    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        Ok(SequenceTensors::from_rows(batch, self.pad_idx()?))
    }

    fn sort_key(
        &self,
        row: &Self::Numberized,
    ) -> Option<usize> {
        Some(row.len)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::tensorizers::testing::{initialize_one, text_rows};

    fn build(options: TokenTensorizerOptions) -> TokenTensorizer {
        let mut tensorizer = options.init().unwrap();
        initialize_one(
            &mut tensorizer,
            &text_rows("text", &["the cat sat", "the dog ran home"]),
        );
        tensorizer
    }

    #[test]
    fn test_vocab_built_from_corpus() {
        let tensorizer = build(TokenTensorizerOptions::default());
        let vocab = tensorizer.vocab().unwrap();

        assert_eq!(
            vocab.symbols(),
            &["__UNKNOWN__", "__PAD__", "the", "cat", "sat", "dog", "ran", "home"]
        );
    }

    #[test]
    fn test_numberize() {
        let tensorizer = build(TokenTensorizerOptions::default());

        let row = Row::new().with("text", "The cat flew");
        let out = tensorizer.numberize(&row).unwrap();
        assert_eq!(out.ids, vec![2, 3, 0]);
        assert_eq!(out.len, 3);
        assert_eq!(tensorizer.sort_key(&out), Some(3));

        // Idempotent.
        assert_eq!(tensorizer.numberize(&row).unwrap(), out);

        assert_eq!(
            tensorizer.reverse_lookup(&out.ids).unwrap(),
            vec!["the", "cat", "__UNKNOWN__"]
        );
    }

    #[test]
    fn test_boundary_tokens() {
        let tensorizer = build(
            TokenTensorizerOptions::default()
                .with_bos_token(true)
                .with_eos_token(true)
                .with_max_seq_len(Some(2)),
        );
        let vocab = tensorizer.vocab().unwrap().clone();
        let bos = vocab.bos_idx().unwrap() as IndexType;
        let eos = vocab.eos_idx().unwrap() as IndexType;

        let out = tensorizer
            .numberize(&Row::new().with("text", "the dog ran"))
            .unwrap();
        assert_eq!(out.len, 4);
        assert_eq!(out.ids.first(), Some(&bos));
        assert_eq!(out.ids.last(), Some(&eos));

        let lookup = tensorizer.lookup_tokens("the dog ran").unwrap();
        assert_eq!(lookup.starts, vec![-1, 0, 4, -1]);
        assert_eq!(lookup.ends, vec![-1, 3, 7, -1]);
    }

    #[test]
    fn test_eos_for_bos() {
        let tensorizer = build(
            TokenTensorizerOptions::default()
                .with_bos_token(true)
                .with_eos_token_for_bos(true),
        );
        let vocab = tensorizer.vocab().unwrap().clone();
        assert_eq!(vocab.bos_idx(), None);

        let out = tensorizer
            .numberize(&Row::new().with("text", "cat"))
            .unwrap();
        assert_eq!(out.ids[0], vocab.eos_idx().unwrap() as IndexType);
        assert_eq!(out.len, 2);
    }

    #[test]
    fn test_tensorize_pads() {
        let tensorizer = build(TokenTensorizerOptions::default());
        let rows: Vec<SequenceRow> = vec![vec![2, 3].into(), vec![2, 3, 4, 5, 6].into(), vec![7, 6, 5].into()];

        let tensors = tensorizer.tensorize(&rows).unwrap();
        assert_eq!(
            tensors.ids,
            array![[2, 3, 1, 1, 1], [2, 3, 4, 5, 6], [7, 6, 5, 1, 1]]
        );
        assert_eq!(tensors.lengths, array![2, 5, 3]);
    }

    #[test]
    fn test_pre_built_vocab() {
        let vocab = Arc::new(Vocabulary::from_symbols(["__UNKNOWN__", "__PAD__", "x"]));
        let mut tensorizer = TokenTensorizerOptions::default()
            .init()
            .unwrap()
            .with_vocab(vocab.clone());
        assert!(tensorizer.start().is_none());

        initialize_one(&mut tensorizer, &text_rows("text", &["y z"]));
        assert!(Arc::ptr_eq(tensorizer.vocab().unwrap(), &vocab));
    }

    #[test]
    fn test_errors() {
        let tensorizer = TokenTensorizerOptions::default().init().unwrap();
        assert!(matches!(
            tensorizer.numberize(&Row::new().with("text", "a")),
            Err(TensorizerError::Uninitialized { .. })
        ));

        let tensorizer = build(TokenTensorizerOptions::default());
        assert!(matches!(
            tensorizer.numberize(&Row::new().with("other", "a")),
            Err(TensorizerError::MissingColumn { .. })
        ));
    }
}
