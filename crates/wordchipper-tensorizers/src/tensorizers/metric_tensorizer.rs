//! # Metric Tensorizers
//!
//! Metric tensorizers read no columns of their own; they are computed at
//! batch time from the numberized outputs of sibling fields.

use core::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::{
    data::{ColumnSchema, Row},
    errors::{TZResult, TensorizerError},
    tensorizers::{CorpusInitializer, Tensorizer},
    types::IndexType,
};

/// Options for [`MetricTensorizer`] and [`NtokensTensorizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTensorizerOptions {
    /// Sibling field names.
    pub names: Vec<String>,

    /// Per sibling, the position read from each of its numberized rows.
    pub indexes: Vec<usize>,
}

impl MetricTensorizerOptions {
    /// Options reading `(name, index)` pairs.
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let (names, indexes) = pairs.into_iter().map(|(n, i)| (n.into(), i)).unzip();
        Self { names, indexes }
    }

    fn validate(&self) -> TZResult<()> {
        if self.names.len() != self.indexes.len() {
            return Err(TensorizerError::InvalidConfig(format!(
                "metric tensorizer has {} names but {} indexes",
                self.names.len(),
                self.indexes.len()
            )));
        }
        Ok(())
    }

    /// The `(name, index)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, usize)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.indexes.iter().copied())
    }
}

/// The base metric tensorizer.
///
/// Numberizing yields nothing; tensorizing is unsupported.
#[derive(Debug, Clone)]
pub struct MetricTensorizer {
    options: MetricTensorizerOptions,
}

impl MetricTensorizer {
    /// Create a new tensorizer.
    ///
    /// ## Returns
    /// [`TensorizerError::InvalidConfig`] if names and indexes differ in length.
    pub fn new(options: MetricTensorizerOptions) -> TZResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options.
    pub fn options(&self) -> &MetricTensorizerOptions {
        &self.options
    }
}

impl CorpusInitializer for MetricTensorizer {
    type State = ();
}

impl Tensorizer for MetricTensorizer {
    type Numberized = ();
    type Tensors = ();

    fn column_schema(&self) -> ColumnSchema {
        Vec::new()
    }

    fn numberize(
        &self,
        _row: &Row,
    ) -> TZResult<Self::Numberized> {
        Ok(())
    }

    fn tensorize<B>(
        &self,
        _batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        Err(TensorizerError::UnsupportedOperation(
            "MetricTensorizer cannot tensorize".to_string(),
        ))
    }
}

/// Counts the tokens of a batch from sibling sequence lengths.
#[derive(Debug, Clone)]
pub struct NtokensTensorizer {
    options: MetricTensorizerOptions,
}

impl NtokensTensorizer {
    /// Create a new tensorizer.
    ///
    /// ## Returns
    /// [`TensorizerError::InvalidConfig`] if names and indexes differ in length.
    pub fn new(options: MetricTensorizerOptions) -> TZResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options.
    pub fn options(&self) -> &MetricTensorizerOptions {
        &self.options
    }

    /// Sum the configured scalars of every sibling row in a batch.
    ///
    /// ## Arguments
    /// * `scalars` - given a sibling `(name, index)`, yields element `index`
    ///   of every numberized row of that sibling in the batch.
    ///
    /// ## Returns
    /// The total, or the first error raised by `scalars`.
    pub fn count<F>(
        &self,
        mut scalars: F,
    ) -> TZResult<IndexType>
    where
        F: FnMut(&str, usize) -> TZResult<Vec<IndexType>>,
    {
        let mut total = 0;
        for (name, index) in self.options.pairs() {
            total += scalars(name, index)?.iter().sum::<IndexType>();
        }
        Ok(total)
    }
}

impl CorpusInitializer for NtokensTensorizer {
    type State = ();
}

impl Tensorizer for NtokensTensorizer {
    type Numberized = ();
    type Tensors = IndexType;

    fn column_schema(&self) -> ColumnSchema {
        Vec::new()
    }

    fn numberize(
        &self,
        _row: &Row,
    ) -> TZResult<Self::Numberized> {
        Ok(())
    }

    fn tensorize<B>(
        &self,
        _batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        Err(TensorizerError::UnsupportedOperation(
            "NtokensTensorizer reads sibling batches; use NtokensTensorizer::count".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_unsupported() {
        let tensorizer = MetricTensorizer::new(MetricTensorizerOptions::default()).unwrap();
        assert!(tensorizer.column_schema().is_empty());
        assert!(tensorizer.numberize(&Row::new()).is_ok());
        assert!(matches!(
            tensorizer.tensorize(&[(), ()]),
            Err(TensorizerError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_mismatched_options() {
        let options = MetricTensorizerOptions {
            names: vec!["tokens".to_string()],
            indexes: vec![],
        };
        assert!(matches!(
            NtokensTensorizer::new(options),
            Err(TensorizerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_count() {
        let tensorizer =
            NtokensTensorizer::new(MetricTensorizerOptions::new([("tokens", 1), ("chars", 1)]))
                .unwrap();

        let count = tensorizer
            .count(|name, index| {
                assert_eq!(index, 1);
                Ok(match name {
                    "tokens" => vec![2, 5, 3],
                    _ => vec![4],
                })
            })
            .unwrap();
        assert_eq!(count, 14);

        let err = tensorizer.count(|name, _| {
            Err(TensorizerError::UnknownField {
                name: name.to_string(),
            })
        });
        assert!(matches!(err, Err(TensorizerError::UnknownField { name }) if name == "tokens"));
    }
}
