//! # Categorical Label Tensorizer

use core::borrow::Borrow;
use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    data::{ColumnSchema, ColumnSpec, Row},
    errors::{TZResult, TensorizerError},
    padding::pad_and_stack,
    tensorizers::{CorpusInitializer, Tensorizer},
    types::IndexType,
    vocab::{VocabBuilder, Vocabulary},
};

/// Separator between labels in a label column.
pub const LABEL_DELIMITER: char = ',';

/// Options for [`LabelTensorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelTensorizerOptions {
    /// The label column.
    pub column: String,

    /// Map unseen labels to UNK instead of failing.
    pub allow_unknown: bool,
}

impl Default for LabelTensorizerOptions {
    fn default() -> Self {
        Self {
            column: "label".to_string(),
            allow_unknown: false,
        }
    }
}

impl LabelTensorizerOptions {
    /// Set the label column.
    pub fn with_column<S: Into<String>>(
        self,
        column: S,
    ) -> Self {
        Self {
            column: column.into(),
            ..self
        }
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

    /// Build a [`LabelTensorizer`].
    pub fn init(self) -> LabelTensorizer {
        LabelTensorizer::new(self)
    }
}

fn split_labels(text: &str) -> impl Iterator<Item = &str> {
    text.split(LABEL_DELIMITER)
}

/// Converts a delimited label column to label ids.
#[derive(Debug, Clone)]
pub struct LabelTensorizer {
    options: LabelTensorizerOptions,
    labels: Option<Arc<Vocabulary>>,
}

impl LabelTensorizer {
    /// Create a new tensorizer.
    pub fn new(options: LabelTensorizerOptions) -> Self {
        Self {
            options,
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
    pub fn options(&self) -> &LabelTensorizerOptions {
        &self.options
    }

    /// The label vocabulary, once built.
    pub fn labels(&self) -> Option<&Arc<Vocabulary>> {
        self.labels.as_ref()
    }

    /// A [`VocabBuilder`] with no PAD slot, and UNK only under `allow_unknown`.
    pub fn vocab_builder(&self) -> VocabBuilder {
        VocabBuilder::new()
            .with_pad(false)
            .with_unk(self.options.allow_unknown)
    }
}

impl CorpusInitializer for LabelTensorizer {
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
        state.add_all(split_labels(row.text(&self.options.column)?));
        Ok(())
    }

    fn finish(
        &mut self,
        state: Self::State,
    ) -> TZResult<()> {
        let labels = state.make_vocab();
        log::debug!(
            "LabelTensorizer[{}]: {} labels",
            self.options.column,
            labels.len()
        );
        self.labels = Some(Arc::new(labels));
        Ok(())
    }
}

impl Tensorizer for LabelTensorizer {
    type Numberized = Vec<IndexType>;
    type Tensors = Array2<IndexType>;

    fn column_schema(&self) -> ColumnSchema {
        vec![ColumnSpec::text(&self.options.column)]
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        let labels = self
            .labels
            .as_deref()
            .ok_or(TensorizerError::Uninitialized {
                tensorizer: "LabelTensorizer",
            })?;

        split_labels(row.text(&self.options.column)?)
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
        Ok(pad_and_stack(&rows, 0))
    }
}
