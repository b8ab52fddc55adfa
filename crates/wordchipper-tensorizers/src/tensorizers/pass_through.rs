//! # Pass-Through Tensorizers
//!
//! Carry raw column values into the batch unchanged, mostly for metric
//! reporting. Tensorizing is the identity.

use core::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::{
    data::{ColumnSchema, ColumnSpec, Row},
    errors::TZResult,
    tensorizers::{CorpusInitializer, Tensorizer},
};

/// Default separator for [`JoinStringTensorizer`].
pub const DEFAULT_JOIN_DELIMITER: &str = " | ";

fn identity<T: Clone, B: Borrow<T>>(batch: &[B]) -> Vec<T> {
    batch.iter().map(|v| v.borrow().clone()).collect()
}

/// Options for [`RawStringTensorizer`] and [`RawJsonTensorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumnOptions {
    /// The pass-through column.
    pub column: String,
}

impl RawColumnOptions {
    /// Options for the given column.
    pub fn new<S: Into<String>>(column: S) -> Self {
        Self {
            column: column.into(),
        }
    }
}

/// Passes a text column through.
#[derive(Debug, Clone)]
pub struct RawStringTensorizer {
    options: RawColumnOptions,
}

impl RawStringTensorizer {
    /// Create a new tensorizer.
    pub fn new(options: RawColumnOptions) -> Self {
        Self { options }
    }
}

impl CorpusInitializer for RawStringTensorizer {
    type State = ();
}

impl Tensorizer for RawStringTensorizer {
    type Numberized = String;
    type Tensors = Vec<String>;

    fn column_schema(&self) -> ColumnSchema {
        vec![ColumnSpec::text(&self.options.column)]
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        Ok(row.text(&self.options.column)?.to_string())
    }

    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        Ok(identity(batch))
    }
}

/// Decodes a JSON text column.
#[derive(Debug, Clone)]
pub struct RawJsonTensorizer {
    options: RawColumnOptions,
}

impl RawJsonTensorizer {
    /// Create a new tensorizer.
    pub fn new(options: RawColumnOptions) -> Self {
        Self { options }
    }
}

impl CorpusInitializer for RawJsonTensorizer {
    type State = ();
}

impl Tensorizer for RawJsonTensorizer {
    type Numberized = serde_json::Value;
    type Tensors = Vec<serde_json::Value>;

    fn column_schema(&self) -> ColumnSchema {
        vec![ColumnSpec::text(&self.options.column)]
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        Ok(serde_json::from_str(row.text(&self.options.column)?)?)
    }

    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        Ok(identity(batch))
    }
}

/// Options for [`JoinStringTensorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStringOptions {
    /// The joined columns, in order.
    pub columns: Vec<String>,

    /// The separator.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String {
    DEFAULT_JOIN_DELIMITER.to_string()
}

impl JoinStringOptions {
    /// Options joining the given columns with [`DEFAULT_JOIN_DELIMITER`].
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            delimiter: default_delimiter(),
        }
    }

    /// Set the separator.
    pub fn with_delimiter<S: Into<String>>(
        self,
        delimiter: S,
    ) -> Self {
        Self {
            delimiter: delimiter.into(),
            ..self
        }
    }
}

/// Joins several text columns into one string.
#[derive(Debug, Clone)]
pub struct JoinStringTensorizer {
    options: JoinStringOptions,
}

impl JoinStringTensorizer {
    /// Create a new tensorizer.
    pub fn new(options: JoinStringOptions) -> Self {
        Self { options }
    }
}

impl CorpusInitializer for JoinStringTensorizer {
    type State = ();
}

impl Tensorizer for JoinStringTensorizer {
    type Numberized = String;
    type Tensors = Vec<String>;

    fn column_schema(&self) -> ColumnSchema {
        self.options.columns.iter().map(ColumnSpec::text).collect()
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        let parts = self
            .options
            .columns
            .iter()
            .map(|column| row.text(column))
            .collect::<TZResult<Vec<_>>>()?;
        Ok(parts.join(&self.options.delimiter))
    }

    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        Ok(identity(batch))
    }
}
