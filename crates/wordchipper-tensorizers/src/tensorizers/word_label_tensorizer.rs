//! # Word Label Tensorizer
//!
//! Projects character-span annotations onto tokens.

use core::borrow::Borrow;
use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    data::{ColumnSchema, ColumnSpec, ColumnType, Row, SpanLabel, Token},
    errors::{TZResult, TensorizerError},
    padding::pad_and_stack,
    tensorizers::{CorpusInitializer, Tensorizer},
    tokenizers::{TokenizerHandle, TokenizerOptions},
    types::IndexType,
    vocab::{VocabBuilder, Vocabulary},
};

/// The label of tokens outside every span; always label index 0.
pub const NO_LABEL: &str = "NO_LABEL";

/// Label every token with the span it overlaps.
///
/// Tokens and spans are walked in tandem, both ordered by position:
/// * a span ending before the token starts is skipped;
/// * otherwise the token gets the span's label if it ends after the span
///   starts, and `no_label` if not.
///
/// Comparisons are strict, so a token that only touches a span boundary gets
/// `no_label`. Tokens left when the spans run out get `no_label`.
///
/// ## Arguments
/// * `tokens` - the tokens, ordered by position.
/// * `spans` - the span labels, ordered by position.
/// * `no_label` - the label for uncovered tokens.
///
/// ## Returns
/// One label per token.
pub fn align_span_labels<'a>(
    tokens: &[Token],
    spans: &'a [SpanLabel],
    no_label: &'a str,
) -> Vec<&'a str> {
    let mut labels = Vec::with_capacity(tokens.len());
    let mut spans = spans.iter().peekable();

    for token in tokens {
        while spans.next_if(|span| token.start > span.end).is_some() {}
        let Some(&span) = spans.peek() else {
            break;
        };
        labels.push(if token.end > span.start {
            span.label.as_str()
        } else {
            no_label
        });
    }

    labels.resize(tokens.len(), no_label);
    labels
}

/// Options for [`WordLabelTensorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordLabelTensorizerOptions {
    /// The span label column.
    pub slot_column: String,

    /// The text column.
    pub text_column: String,

    /// The tokenizer configuration.
    pub tokenizer: TokenizerOptions,

    /// Map unseen labels to UNK instead of failing.
    pub allow_unknown: bool,
}

impl Default for WordLabelTensorizerOptions {
    fn default() -> Self {
        Self {
            slot_column: "slots".to_string(),
            text_column: "text".to_string(),
            tokenizer: TokenizerOptions::default(),
            allow_unknown: false,
        }
    }
}

impl WordLabelTensorizerOptions {
    /// Set the span label column.
    pub fn with_slot_column<S: Into<String>>(
        self,
        slot_column: S,
    ) -> Self {
        Self {
            slot_column: slot_column.into(),
            ..self
        }
    }

    /// Set the text column.
    pub fn with_text_column<S: Into<String>>(
        self,
        text_column: S,
    ) -> Self {
        Self {
            text_column: text_column.into(),
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

    /// Set the unknown-label policy.
    pub fn with_allow_unknown(
        self,
        allow_unknown: bool,
    ) -> Self {
        Self {
            allow_unknown,
            ..self
        }
    }

    /// Build a [`WordLabelTensorizer`] with the configured tokenizer.
    pub fn init(self) -> TZResult<WordLabelTensorizer> {
        let tokenizer = Arc::new(self.tokenizer.clone().init()?);
        Ok(WordLabelTensorizer::new(self, tokenizer))
    }
}

/// Converts span annotations to one label id per token.
///
/// The label vocabulary always has [`NO_LABEL`] at index 0.
#[derive(Debug, Clone)]
pub struct WordLabelTensorizer {
    options: WordLabelTensorizerOptions,
    tokenizer: TokenizerHandle,
    labels: Option<Arc<Vocabulary>>,
}

impl WordLabelTensorizer {
    /// Create a new tensorizer.
    ///
    /// ## Arguments
    /// * `options` - the tensorizer options; `options.tokenizer` is ignored.
    /// * `tokenizer` - the tokenizer to use.
    pub fn new(
        options: WordLabelTensorizerOptions,
        tokenizer: TokenizerHandle,
    ) -> Self {
        Self {
            options,
            tokenizer,
            labels: None,
        }
    }

    /// Use a pre-built label vocabulary; the corpus pass is skipped.
    pub fn with_vocab(
        self,
        labels: Arc<Vocabulary>,
    ) -> Self {
        Self {
            labels: Some(labels),
            ..self
        }
    }

    /// The options.
    pub fn options(&self) -> &WordLabelTensorizerOptions {
        &self.options
    }

    /// The label vocabulary, once built.
    pub fn labels(&self) -> Option<&Arc<Vocabulary>> {
        self.labels.as_ref()
    }

    /// A [`VocabBuilder`] seeded with [`NO_LABEL`], with no PAD slot.
    pub fn vocab_builder(&self) -> VocabBuilder {
        let mut builder = VocabBuilder::new()
            .with_pad(false)
            .with_unk(self.options.allow_unknown);
        builder.reserve(NO_LABEL);
        builder
    }

    /// Tokenize the text column and align the span column onto it.
    pub fn align<'a>(
        &self,
        row: &'a Row,
    ) -> TZResult<Vec<&'a str>> {
        let tokens = self
            .tokenizer
            .tokenize(row.text(&self.options.text_column)?);
        let spans = row.slots(&self.options.slot_column)?;
        Ok(align_span_labels(&tokens, spans, NO_LABEL))
    }

    fn no_label_idx(&self) -> TZResult<IndexType> {
        self.labels
            .as_deref()
            .and_then(|labels| labels.get_index(NO_LABEL))
            .map(|idx| idx as IndexType)
            .ok_or(TensorizerError::Uninitialized {
                tensorizer: "WordLabelTensorizer",
            })
    }
}

impl CorpusInitializer for WordLabelTensorizer {
    type State = VocabBuilder;

    fn start(&self) -> Option<Self::State> {
        if self.labels.is_some() {
            return None;
        }
        Some(self.vocab_builder())
    }

    fn accept(
        &self,
        state: &mut Self::State,
        row: &Row,
    ) -> TZResult<()> {
        let spans = row.slots(&self.options.slot_column)?;
        state.add_all(spans.iter().map(|span| &span.label));
        Ok(())
    }

    fn finish(
        &mut self,
        state: Self::State,
    ) -> TZResult<()> {
        let labels = state.make_vocab();
        log::debug!(
            "WordLabelTensorizer[{}]: {} labels",
            self.options.slot_column,
            labels.len()
        );
        self.labels = Some(Arc::new(labels));
        Ok(())
    }
}

impl Tensorizer for WordLabelTensorizer {
    type Numberized = Vec<IndexType>;
    type Tensors = Array2<IndexType>;

    fn column_schema(&self) -> ColumnSchema {
        vec![
            ColumnSpec::text(&self.options.text_column),
            ColumnSpec::new(&self.options.slot_column, ColumnType::Slots),
        ]
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        let labels = self
            .labels
            .as_deref()
            .ok_or(TensorizerError::Uninitialized {
                tensorizer: "WordLabelTensorizer",
            })?;

        self.align(row)?
            .into_iter()
            .map(|label| {
                labels
                    .lookup(label)
                    .fold(self.options.allow_unknown, label)
                    .map(|idx| idx as IndexType)
            })
            .collect()
    }

    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        let rows: Vec<&[IndexType]> = batch.iter().map(|r| r.borrow().as_slice()).collect();
        Ok(pad_and_stack(&rows, self.no_label_idx()?))
    }

    fn sort_key(
        &self,
        row: &Self::Numberized,
    ) -> Option<usize> {
        Some(row.len())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::tensorizers::testing::initialize_one;
    use crate::tokenizers::default_tokenizer;

    fn slot_row(
        text: &str,
        spans: Vec<SpanLabel>,
    ) -> Row {
        Row::new().with("text", text).with("slots", spans)
    }

    #[test]
    fn test_align_play_the_song() {
        let tokens = default_tokenizer().tokenize("play the song");
        let spans = vec![SpanLabel::new("song_name", 9, 13)];
        assert_eq!(
            align_span_labels(&tokens, &spans, "no_label"),
            vec!["no_label", "no_label", "song_name"]
        );
    }

    #[test]
    fn test_align_touching_boundaries() {
        // "ab cd ef" -> [0,2) [3,5) [6,8)
        let tokens = default_tokenizer().tokenize("ab cd ef");

        // A span ending exactly where a token starts is not skipped.
        let spans = vec![SpanLabel::new("x", 0, 3)];
        assert_eq!(align_span_labels(&tokens, &spans, "O"), vec!["x", "x", "O"]);

        // A token ending exactly where a span starts is not labeled.
        let spans = vec![SpanLabel::new("y", 2, 5)];
        assert_eq!(align_span_labels(&tokens, &spans, "O"), vec!["O", "y", "O"]);
    }

    #[test]
    fn test_align_multiple_spans() {
        let tokens = default_tokenizer().tokenize("wake me at 7 am tomorrow");
        let spans = vec![
            SpanLabel::new("time", 11, 15),
            SpanLabel::new("date", 16, 24),
        ];
        assert_eq!(
            align_span_labels(&tokens, &spans, "O"),
            vec!["O", "O", "O", "time", "time", "date"]
        );
        assert_eq!(
            align_span_labels(&tokens, &[], "O"),
            vec!["O"; 6]
        );
    }

    #[test]
    fn test_numberize() {
        let rows = vec![
            slot_row("play the song", vec![SpanLabel::new("song_name", 9, 13)]),
            slot_row("call mom", vec![SpanLabel::new("contact", 5, 8)]),
        ];
        let mut tensorizer = WordLabelTensorizerOptions::default().init().unwrap();
        initialize_one(&mut tensorizer, &rows);

        let labels = tensorizer.labels().unwrap().clone();
        assert_eq!(labels.symbols(), &[NO_LABEL, "song_name", "contact"]);

        assert_eq!(tensorizer.numberize(&rows[0]).unwrap(), vec![0, 0, 1]);
        assert_eq!(tensorizer.numberize(&rows[1]).unwrap(), vec![0, 2]);

        let unseen = slot_row("go", vec![SpanLabel::new("verb", 0, 2)]);
        assert!(matches!(
            tensorizer.numberize(&unseen),
            Err(TensorizerError::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn test_allow_unknown() {
        let rows = vec![slot_row("hi", vec![SpanLabel::new("greeting", 0, 2)])];
        let mut tensorizer = WordLabelTensorizerOptions::default()
            .with_allow_unknown(true)
            .init()
            .unwrap();
        initialize_one(&mut tensorizer, &rows);

        let labels = tensorizer.labels().unwrap().clone();
        assert_eq!(labels.get_index(NO_LABEL), Some(0));
        let unk = labels.unk_idx().unwrap() as IndexType;

        let unseen = slot_row("go", vec![SpanLabel::new("verb", 0, 2)]);
        assert_eq!(tensorizer.numberize(&unseen).unwrap(), vec![unk]);
    }

    #[test]
    fn test_tensorize_pads_with_no_label() {
        let rows = vec![slot_row("a b", vec![SpanLabel::new("x", 0, 1)])];
        let mut tensorizer = WordLabelTensorizerOptions::default().init().unwrap();
        initialize_one(&mut tensorizer, &rows);

        let batch: Vec<Vec<IndexType>> = vec![vec![1, 0, 1], vec![1]];
        assert_eq!(
            tensorizer.tensorize(&batch).unwrap(),
            array![[1, 0, 1], [1, 0, 0]]
        );
    }
}
