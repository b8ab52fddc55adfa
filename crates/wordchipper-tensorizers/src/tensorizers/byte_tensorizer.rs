//! # Byte Tensorizer

use core::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::{
    data::{ColumnSchema, ColumnSpec, Row},
    errors::TZResult,
    tensorizers::{CorpusInitializer, SequenceRow, SequenceTensors, Tensorizer},
    types::IndexType,
};

/// Options for [`ByteTensorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ByteTensorizerOptions {
    /// The text column.
    pub column: String,

    /// Lower-case text before encoding.
    pub lower: bool,

    /// Maximum number of bytes kept; `None` is unbounded.
    pub max_seq_len: Option<usize>,
}

impl Default for ByteTensorizerOptions {
    fn default() -> Self {
        Self {
            column: "text".to_string(),
            lower: true,
            max_seq_len: None,
        }
    }
}

impl ByteTensorizerOptions {
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

    /// Set whether to lower-case text.
    pub fn with_lower(
        self,
        lower: bool,
    ) -> Self {
        Self { lower, ..self }
    }

    /// Set the maximum number of bytes.
    pub fn with_max_seq_len(
        self,
        max_seq_len: Option<usize>,
    ) -> Self {
        Self {
            max_seq_len,
            ..self
        }
    }

    /// Build a [`ByteTensorizer`].
    pub fn init(self) -> ByteTensorizer {
        ByteTensorizer::new(self)
    }
}

/// Converts text to its UTF-8 bytes.
///
/// There is no vocabulary; byte values are the ids.
#[derive(Debug, Clone)]
pub struct ByteTensorizer {
    options: ByteTensorizerOptions,
}

impl ByteTensorizer {
    /// The id of unknown bytes.
    pub const UNK_BYTE: IndexType = 0;

    /// The padding id.
    pub const PAD_BYTE: IndexType = 0;

    /// The number of distinct byte ids.
    pub const NUM: usize = 256;

    /// Create a new tensorizer.
    pub fn new(options: ByteTensorizerOptions) -> Self {
        Self { options }
    }

    /// The options.
    pub fn options(&self) -> &ByteTensorizerOptions {
        &self.options
    }
}

impl CorpusInitializer for ByteTensorizer {
    type State = ();
}

impl Tensorizer for ByteTensorizer {
    type Numberized = SequenceRow;
    type Tensors = SequenceTensors;

    fn column_schema(&self) -> ColumnSchema {
        vec![ColumnSpec::text(&self.options.column)]
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        let text = row.text(&self.options.column)?;
        let text = if self.options.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let limit = self.options.max_seq_len.unwrap_or(usize::MAX);
        Ok(text
            .bytes()
            .take(limit)
            .map(IndexType::from)
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
        Ok(SequenceTensors::from_rows(batch, Self::PAD_BYTE))
    }

    fn sort_key(
        &self,
        row: &Self::Numberized,
    ) -> Option<usize> {
        Some(row.len)
    }
}
