//! # Field Tensorizer
//!
//! The closed set of tensorizer variants, dispatched statically.

use core::borrow::Borrow;

use ndarray::{Array1, Array2};

use crate::{
    data::{ColumnSchema, Row},
    errors::{TZResult, TensorizerError},
    tensorizers::{
        ByteTensorizer, CharRow, CharTensors, CharacterTokenTensorizer, CorpusInitializer,
        FloatListTensorizer, JoinStringTensorizer, LabelTensorizer, MetricTensorizer,
        NtokensTensorizer, NumericLabelTensorizer, RawJsonTensorizer, RawStringTensorizer,
        SequenceRow, SequenceTensors, Tensorizer, TokenTensorizer, WordLabelTensorizer,
    },
    types::{FloatType, IndexType},
    vocab::VocabBuilder,
};

/// The per-row output of a [`FieldTensorizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutput {
    /// ``(ids, length)``; from token and byte tensorizers.
    Sequence(SequenceRow),

    /// Per-token code points and lengths.
    Chars(CharRow),

    /// Label ids.
    Ids(Vec<IndexType>),

    /// A scalar label.
    Scalar(FloatType),

    /// A float list.
    Floats(Vec<FloatType>),

    /// A pass-through string.
    Text(String),

    /// A decoded JSON value.
    Json(serde_json::Value),

    /// Metric tensorizers produce nothing per row.
    Empty,
}

impl RowOutput {
    /// The variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            RowOutput::Sequence(_) => "Sequence",
            RowOutput::Chars(_) => "Chars",
            RowOutput::Ids(_) => "Ids",
            RowOutput::Scalar(_) => "Scalar",
            RowOutput::Floats(_) => "Floats",
            RowOutput::Text(_) => "Text",
            RowOutput::Json(_) => "Json",
            RowOutput::Empty => "Empty",
        }
    }

    /// The integer scalar at tuple position `index`.
    ///
    /// A sequence row is the tuple ``(ids, length)``, so position 1 is its length.
    ///
    /// ## Returns
    /// `None` if that position does not hold an integer scalar.
    pub fn scalar(
        &self,
        index: usize,
    ) -> Option<IndexType> {
        match (self, index) {
            (RowOutput::Sequence(row), 1) => Some(row.len as IndexType),
            _ => None,
        }
    }
}

/// The batch output of a [`FieldTensorizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum BatchTensors {
    /// Padded ids and lengths.
    Sequence(SequenceTensors),

    /// Padded per-token code points and lengths.
    Chars(CharTensors),

    /// Padded label ids.
    Ids(Array2<IndexType>),

    /// Stacked scalar labels.
    Scalars(Array1<FloatType>),

    /// Padded float lists.
    Floats(Array2<FloatType>),

    /// Pass-through strings.
    Text(Vec<String>),

    /// Pass-through JSON values.
    Json(Vec<serde_json::Value>),

    /// A batch-level count.
    Count(IndexType),

    /// Metric tensorizers produce nothing per batch.
    Empty,
}

/// A tensorizer of any supported kind.
#[derive(Debug, Clone)]
pub enum FieldTensorizer {
    /// See [`TokenTensorizer`].
    Token(TokenTensorizer),

    /// See [`ByteTensorizer`].
    Byte(ByteTensorizer),

    /// See [`CharacterTokenTensorizer`].
    CharacterToken(CharacterTokenTensorizer),

    /// See [`LabelTensorizer`].
    Label(LabelTensorizer),

    /// See [`NumericLabelTensorizer`].
    NumericLabel(NumericLabelTensorizer),

    /// See [`FloatListTensorizer`].
    FloatList(FloatListTensorizer),

    /// See [`WordLabelTensorizer`].
    WordLabel(WordLabelTensorizer),

    /// See [`RawStringTensorizer`].
    RawString(RawStringTensorizer),

    /// See [`JoinStringTensorizer`].
    JoinString(JoinStringTensorizer),

    /// See [`RawJsonTensorizer`].
    RawJson(RawJsonTensorizer),

    /// See [`MetricTensorizer`].
    Metric(MetricTensorizer),

    /// See [`NtokensTensorizer`].
    Ntokens(NtokensTensorizer),
}

impl FieldTensorizer {
    /// The variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldTensorizer::Token(_) => "TokenTensorizer",
            FieldTensorizer::Byte(_) => "ByteTensorizer",
            FieldTensorizer::CharacterToken(_) => "CharacterTokenTensorizer",
            FieldTensorizer::Label(_) => "LabelTensorizer",
            FieldTensorizer::NumericLabel(_) => "NumericLabelTensorizer",
            FieldTensorizer::FloatList(_) => "FloatListTensorizer",
            FieldTensorizer::WordLabel(_) => "WordLabelTensorizer",
            FieldTensorizer::RawString(_) => "RawStringTensorizer",
            FieldTensorizer::JoinString(_) => "JoinStringTensorizer",
            FieldTensorizer::RawJson(_) => "RawJsonTensorizer",
            FieldTensorizer::Metric(_) => "MetricTensorizer",
            FieldTensorizer::Ntokens(_) => "NtokensTensorizer",
        }
    }
}

macro_rules! impl_from_tensorizer {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for FieldTensorizer {
                fn from(tensorizer: $ty) -> Self {
                    FieldTensorizer::$variant(tensorizer)
                }
            }
        )*
    };
}

impl_from_tensorizer!(
    Token(TokenTensorizer),
    Byte(ByteTensorizer),
    CharacterToken(CharacterTokenTensorizer),
    Label(LabelTensorizer),
    NumericLabel(NumericLabelTensorizer),
    FloatList(FloatListTensorizer),
    WordLabel(WordLabelTensorizer),
    RawString(RawStringTensorizer),
    JoinString(JoinStringTensorizer),
    RawJson(RawJsonTensorizer),
    Metric(MetricTensorizer),
    Ntokens(NtokensTensorizer),
);

/// Unwrap every row output of a batch as one [`RowOutput`] variant.
fn rows_of<'a, B, T, F>(
    tensorizer: &'static str,
    batch: &'a [B],
    select: F,
) -> TZResult<Vec<&'a T>>
where
    B: Borrow<RowOutput>,
    F: Fn(&'a RowOutput) -> Option<&'a T>,
{
    batch
        .iter()
        .map(|row| {
            let row = row.borrow();
            select(row).ok_or(TensorizerError::OutputKind {
                tensorizer,
                found: row.kind(),
            })
        })
        .collect()
}

/// Only the vocabulary-building variants take part in the corpus pass.
impl CorpusInitializer for FieldTensorizer {
    type State = VocabBuilder;

    fn start(&self) -> Option<Self::State> {
        match self {
            FieldTensorizer::Token(t) => t.start(),
            FieldTensorizer::Label(t) => t.start(),
            FieldTensorizer::WordLabel(t) => t.start(),
            _ => None,
        }
    }

    fn accept(
        &self,
        state: &mut Self::State,
        row: &Row,
    ) -> TZResult<()> {
        match self {
            FieldTensorizer::Token(t) => t.accept(state, row),
            FieldTensorizer::Label(t) => t.accept(state, row),
            FieldTensorizer::WordLabel(t) => t.accept(state, row),
            _ => Ok(()),
        }
    }

    fn finish(
        &mut self,
        state: Self::State,
    ) -> TZResult<()> {
        match self {
            FieldTensorizer::Token(t) => t.finish(state),
            FieldTensorizer::Label(t) => t.finish(state),
            FieldTensorizer::WordLabel(t) => t.finish(state),
            _ => Ok(()),
        }
    }
}

impl Tensorizer for FieldTensorizer {
    type Numberized = RowOutput;
    type Tensors = BatchTensors;

    fn column_schema(&self) -> ColumnSchema {
        match self {
            FieldTensorizer::Token(t) => t.column_schema(),
            FieldTensorizer::Byte(t) => t.column_schema(),
            FieldTensorizer::CharacterToken(t) => t.column_schema(),
            FieldTensorizer::Label(t) => t.column_schema(),
            FieldTensorizer::NumericLabel(t) => t.column_schema(),
            FieldTensorizer::FloatList(t) => t.column_schema(),
            FieldTensorizer::WordLabel(t) => t.column_schema(),
            FieldTensorizer::RawString(t) => t.column_schema(),
            FieldTensorizer::JoinString(t) => t.column_schema(),
            FieldTensorizer::RawJson(t) => t.column_schema(),
            FieldTensorizer::Metric(t) => t.column_schema(),
            FieldTensorizer::Ntokens(t) => t.column_schema(),
        }
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        Ok(match self {
            FieldTensorizer::Token(t) => RowOutput::Sequence(t.numberize(row)?),
            FieldTensorizer::Byte(t) => RowOutput::Sequence(t.numberize(row)?),
            FieldTensorizer::CharacterToken(t) => RowOutput::Chars(t.numberize(row)?),
            FieldTensorizer::Label(t) => RowOutput::Ids(t.numberize(row)?),
            FieldTensorizer::NumericLabel(t) => RowOutput::Scalar(t.numberize(row)?),
            FieldTensorizer::FloatList(t) => RowOutput::Floats(t.numberize(row)?),
            FieldTensorizer::WordLabel(t) => RowOutput::Ids(t.numberize(row)?),
            FieldTensorizer::RawString(t) => RowOutput::Text(t.numberize(row)?),
            FieldTensorizer::JoinString(t) => RowOutput::Text(t.numberize(row)?),
            FieldTensorizer::RawJson(t) => RowOutput::Json(t.numberize(row)?),
            FieldTensorizer::Metric(t) => {
                t.numberize(row)?;
                RowOutput::Empty
            }
            FieldTensorizer::Ntokens(t) => {
                t.numberize(row)?;
                RowOutput::Empty
            }
        })
    }

    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        let kind = self.kind();
        let sequences = || {
            rows_of(kind, batch, |r| match r {
                RowOutput::Sequence(v) => Some(v),
                _ => None,
            })
        };
        let ids = || {
            rows_of(kind, batch, |r| match r {
                RowOutput::Ids(v) => Some(v),
                _ => None,
            })
        };
        let text = || {
            rows_of(kind, batch, |r| match r {
                RowOutput::Text(v) => Some(v),
                _ => None,
            })
        };
        let empty = || {
            rows_of(kind, batch, |r| match r {
                RowOutput::Empty => Some(&()),
                _ => None,
            })
        };

        Ok(match self {
            FieldTensorizer::Token(t) => BatchTensors::Sequence(t.tensorize(&sequences()?)?),
            FieldTensorizer::Byte(t) => BatchTensors::Sequence(t.tensorize(&sequences()?)?),
            FieldTensorizer::CharacterToken(t) => {
                let rows = rows_of(kind, batch, |r| match r {
                    RowOutput::Chars(v) => Some(v),
                    _ => None,
                })?;
                BatchTensors::Chars(t.tensorize(&rows)?)
            }
            FieldTensorizer::Label(t) => BatchTensors::Ids(t.tensorize(&ids()?)?),
            FieldTensorizer::WordLabel(t) => BatchTensors::Ids(t.tensorize(&ids()?)?),
            FieldTensorizer::NumericLabel(t) => {
                let rows = rows_of(kind, batch, |r| match r {
                    RowOutput::Scalar(v) => Some(v),
                    _ => None,
                })?;
                BatchTensors::Scalars(t.tensorize(&rows)?)
            }
            FieldTensorizer::FloatList(t) => {
                let rows = rows_of(kind, batch, |r| match r {
                    RowOutput::Floats(v) => Some(v),
                    _ => None,
                })?;
                BatchTensors::Floats(t.tensorize(&rows)?)
            }
            FieldTensorizer::RawString(t) => BatchTensors::Text(t.tensorize(&text()?)?),
            FieldTensorizer::JoinString(t) => BatchTensors::Text(t.tensorize(&text()?)?),
            FieldTensorizer::RawJson(t) => {
                let rows = rows_of(kind, batch, |r| match r {
                    RowOutput::Json(v) => Some(v),
                    _ => None,
                })?;
                BatchTensors::Json(t.tensorize(&rows)?)
            }
            FieldTensorizer::Metric(t) => {
                t.tensorize(&empty()?)?;
                BatchTensors::Empty
            }
            FieldTensorizer::Ntokens(t) => BatchTensors::Count(t.tensorize(&empty()?)?),
        })
    }

    fn sort_key(
        &self,
        row: &Self::Numberized,
    ) -> Option<usize> {
        match (self, row) {
            (FieldTensorizer::Token(t), RowOutput::Sequence(r)) => t.sort_key(r),
            (FieldTensorizer::Byte(t), RowOutput::Sequence(r)) => t.sort_key(r),
            (FieldTensorizer::CharacterToken(t), RowOutput::Chars(r)) => t.sort_key(r),
            (FieldTensorizer::WordLabel(t), RowOutput::Ids(r)) => t.sort_key(r),
            _ => None,
        }
    }
}
