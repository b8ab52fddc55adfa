//! # Float List Tensorizer
//!
//! Parses loosely formatted numeric lists such as ``"[ 1, 2.  ,3]"`` or
//! ``"[1 2 3]"``. The text is normalized into JSON before parsing:
//!
//! 1. whitespace after ``[`` is removed;
//! 2. whitespace before ``]`` is removed;
//! 3. a bare trailing point (``2.``) becomes ``2.0``;
//! 4. every separator run (whitespace with at most one comma) becomes ``,``.

use core::borrow::Borrow;

use ndarray::Array2;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    data::{ColumnSchema, ColumnSpec, Row},
    errors::{TZResult, TensorizerError},
    padding::pad_and_stack,
    tensorizers::{CorpusInitializer, Tensorizer},
    types::FloatType,
};

/// Options for [`FloatListTensorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatListTensorizerOptions {
    /// The list column.
    pub column: String,

    /// Require every list to have exactly `dim` elements.
    #[serde(default)]
    pub error_check: bool,

    /// The expected list length.
    #[serde(default)]
    pub dim: Option<usize>,
}

impl FloatListTensorizerOptions {
    /// Options for the given column, with no length check.
    pub fn new<S: Into<String>>(column: S) -> Self {
        Self {
            column: column.into(),
            error_check: false,
            dim: None,
        }
    }

    /// Require every list to have exactly `dim` elements.
    pub fn with_dim(
        self,
        dim: usize,
    ) -> Self {
        Self {
            error_check: true,
            dim: Some(dim),
            ..self
        }
    }

    /// Build a [`FloatListTensorizer`].
    ///
    /// ## Returns
    /// [`TensorizerError::InvalidConfig`] if `error_check` is set without `dim`.
    pub fn init(self) -> TZResult<FloatListTensorizer> {
        FloatListTensorizer::new(self)
    }
}

/// Rewrites loose list text into JSON.
#[derive(Debug, Clone)]
pub struct FloatListNormalizer {
    open: Regex,
    close: Regex,
    bare_point: Regex,
    separator: Regex,
}

impl FloatListNormalizer {
    /// Compile the normalization rules.
    pub fn new() -> TZResult<Self> {
        Ok(Self {
            open: Regex::new(r"\[\s+")?,
            close: Regex::new(r"\s+\]")?,
            bare_point: Regex::new(r"([0-9])\.([^0-9]|$)")?,
            separator: Regex::new(r"\s*,\s*|\s+")?,
        })
    }

    /// Normalize list text.
    pub fn normalize(
        &self,
        text: &str,
    ) -> String {
        let text = self.open.replace_all(text.trim(), "[");
        let text = self.close.replace_all(&text, "]");
        let text = self.bare_point.replace_all(&text, "${1}.0${2}");
        self.separator.replace_all(&text, ",").into_owned()
    }
}

/// Parses a textual list of numbers.
#[derive(Debug, Clone)]
pub struct FloatListTensorizer {
    options: FloatListTensorizerOptions,
    normalizer: FloatListNormalizer,
}

impl FloatListTensorizer {
    /// Create a new tensorizer.
    pub fn new(options: FloatListTensorizerOptions) -> TZResult<Self> {
        if options.error_check && options.dim.is_none() {
            return Err(TensorizerError::InvalidConfig(format!(
                "float list column {:?}: error_check requires dim",
                options.column
            )));
        }
        Ok(Self {
            options,
            normalizer: FloatListNormalizer::new()?,
        })
    }

    /// The options.
    pub fn options(&self) -> &FloatListTensorizerOptions {
        &self.options
    }

    /// Parse list text.
    ///
    /// ## Returns
    /// The parsed values; or
    /// * [`TensorizerError::MalformedFloatList`] if the normalized text is not JSON,
    /// * [`TensorizerError::NotAFloatList`] if it is not a flat list of numbers,
    /// * [`TensorizerError::DimensionMismatch`] on a failed length check.
    pub fn parse(
        &self,
        text: &str,
    ) -> TZResult<Vec<FloatType>> {
        let normalized = self.normalizer.normalize(text);
        let value: serde_json::Value =
            serde_json::from_str(&normalized).map_err(|source| {
                TensorizerError::MalformedFloatList {
                    raw: text.to_string(),
                    normalized: normalized.clone(),
                    source,
                }
            })?;

        let not_a_list = || TensorizerError::NotAFloatList {
            value: value.to_string(),
        };
        let values = value
            .as_array()
            .ok_or_else(not_a_list)?
            .iter()
            .map(|v| v.as_f64().map(|f| f as FloatType).ok_or_else(not_a_list))
            .collect::<TZResult<Vec<_>>>()?;

        if self.options.error_check
            && let Some(dim) = self.options.dim
            && values.len() != dim
        {
            return Err(TensorizerError::DimensionMismatch {
                expected: dim,
                actual: values.len(),
                value: values,
            });
        }
        Ok(values)
    }
}

impl CorpusInitializer for FloatListTensorizer {
    type State = ();
}

impl Tensorizer for FloatListTensorizer {
    type Numberized = Vec<FloatType>;
    type Tensors = Array2<FloatType>;

    fn column_schema(&self) -> ColumnSchema {
        vec![ColumnSpec::text(&self.options.column)]
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        self.parse(row.text(&self.options.column)?)
    }

    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        let rows: Vec<&[FloatType]> = batch.iter().map(|r| r.borrow().as_slice()).collect();
        Ok(pad_and_stack(&rows, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_normalize() {
        let normalizer = FloatListNormalizer::new().unwrap();
        assert_eq!(normalizer.normalize("[ 1, 2.  ,3]"), "[1,2.0,3]");
        assert_eq!(normalizer.normalize(" [1 2   3.] "), "[1,2,3.0]");
        assert_eq!(normalizer.normalize("[0.5,-1e3]"), "[0.5,-1e3]");
        assert_eq!(normalizer.normalize("[]"), "[]");
    }

    #[test]
    fn test_parse() {
        let tensorizer = FloatListTensorizerOptions::new("dense").init().unwrap();
        assert_eq!(
            tensorizer.parse("[ 1, 2.  ,3]").unwrap(),
            vec![1.0, 2.0, 3.0]
        );
        assert_eq!(
            tensorizer
                .numberize(&Row::new().with("dense", "[0.5 -2]"))
                .unwrap(),
            vec![0.5, -2.0]
        );
    }

    #[test]
    fn test_parse_errors() {
        let tensorizer = FloatListTensorizerOptions::new("dense").init().unwrap();

        match tensorizer.parse("[1, x]") {
            Err(TensorizerError::MalformedFloatList { raw, normalized, .. }) => {
                assert_eq!(raw, "[1, x]");
                assert_eq!(normalized, "[1,x]");
            }
            other => panic!("unexpected: {other:?}"),
        }

        assert!(matches!(
            tensorizer.parse("[1, [2]]"),
            Err(TensorizerError::NotAFloatList { .. })
        ));
        assert!(matches!(
            tensorizer.parse("3"),
            Err(TensorizerError::NotAFloatList { .. })
        ));
    }

    #[test]
    fn test_dimension_check() {
        let tensorizer = FloatListTensorizerOptions::new("dense")
            .with_dim(3)
            .init()
            .unwrap();
        assert!(tensorizer.parse("[1 2 3]").is_ok());
        assert!(matches!(
            tensorizer.parse("[1 2]"),
            Err(TensorizerError::DimensionMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));

        let options = FloatListTensorizerOptions {
            error_check: true,
            ..FloatListTensorizerOptions::new("dense")
        };
        assert!(matches!(
            options.init(),
            Err(TensorizerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_tensorize() {
        let tensorizer = FloatListTensorizerOptions::new("dense").init().unwrap();
        let rows: Vec<Vec<FloatType>> = vec![vec![1.0], vec![2.0, 3.0]];
        assert_eq!(
            tensorizer.tensorize(&rows).unwrap(),
            array![[1.0, 0.0], [2.0, 3.0]]
        );
    }
}
