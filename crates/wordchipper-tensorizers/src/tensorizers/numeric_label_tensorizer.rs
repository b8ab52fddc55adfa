//! # Numeric Label Tensorizer

use core::{borrow::Borrow, cmp::Ordering};

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{
    data::{ColumnSchema, ColumnSpec, ColumnType, Row},
    errors::{TZResult, TensorizerError},
    padding::stack,
    tensorizers::{CorpusInitializer, Tensorizer},
    types::FloatType,
};

/// Options for [`NumericLabelTensorizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericLabelTensorizerOptions {
    /// The label column.
    pub column: String,

    /// Map ``[lo, hi]`` onto ``[0, 1]``.
    pub rescale_range: Option<[FloatType; 2]>,
}

impl Default for NumericLabelTensorizerOptions {
    fn default() -> Self {
        Self {
            column: "label".to_string(),
            rescale_range: None,
        }
    }
}

impl NumericLabelTensorizerOptions {
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

    /// Set the rescale range.
    pub fn with_rescale_range(
        self,
        rescale_range: Option<[FloatType; 2]>,
    ) -> Self {
        Self {
            rescale_range,
            ..self
        }
    }

    /// Build a [`NumericLabelTensorizer`].
    ///
    /// ## Returns
    /// [`TensorizerError::InvalidConfig`] unless ``lo < hi``.
    pub fn init(self) -> TZResult<NumericLabelTensorizer> {
        NumericLabelTensorizer::new(self)
    }
}

/// Parses a scalar label, optionally rescaled onto ``[0, 1]``.
///
/// Rescaled values outside ``[0, 1]`` are errors, never clamped.
#[derive(Debug, Clone)]
pub struct NumericLabelTensorizer {
    options: NumericLabelTensorizerOptions,
}

impl NumericLabelTensorizer {
    /// Create a new tensorizer.
    pub fn new(options: NumericLabelTensorizerOptions) -> TZResult<Self> {
        if let Some([lo, hi]) = options.rescale_range
            && lo.partial_cmp(&hi) != Some(Ordering::Less)
        {
            return Err(TensorizerError::InvalidConfig(format!(
                "rescale_range [{lo}, {hi}]: lo must be less than hi"
            )));
        }
        Ok(Self { options })
    }

    /// The options.
    pub fn options(&self) -> &NumericLabelTensorizerOptions {
        &self.options
    }

    /// Apply the configured rescaling to a raw label.
    pub fn rescale(
        &self,
        raw: FloatType,
    ) -> TZResult<FloatType> {
        let Some([lo, hi]) = self.options.rescale_range else {
            return Ok(raw);
        };

        let rescaled = (raw - lo) / (hi - lo);
        if !(0.0..=1.0).contains(&rescaled) {
            return Err(TensorizerError::RangeViolation {
                raw,
                rescaled,
                lo,
                hi,
            });
        }
        Ok(rescaled)
    }
}

impl CorpusInitializer for NumericLabelTensorizer {
    type State = ();
}

impl Tensorizer for NumericLabelTensorizer {
    type Numberized = FloatType;
    type Tensors = Array1<FloatType>;

    fn column_schema(&self) -> ColumnSchema {
        vec![ColumnSpec::new(&self.options.column, ColumnType::Number)]
    }

    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized> {
        self.rescale(row.number(&self.options.column)?)
    }

    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>,
    {
        let values: Vec<FloatType> = batch.iter().map(|v| *v.borrow()).collect();
        Ok(stack(&values))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn label(text: &str) -> Row {
        Row::new().with("label", text)
    }

    #[test]
    fn test_plain() {
        let tensorizer = NumericLabelTensorizerOptions::default().init().unwrap();
        assert_eq!(tensorizer.numberize(&label(" -2.5 ")).unwrap(), -2.5);
        assert!(matches!(
            tensorizer.numberize(&label("abc")),
            Err(TensorizerError::NumberParse { .. })
        ));
    }

    #[test]
    fn test_rescale() {
        let tensorizer = NumericLabelTensorizerOptions::default()
            .with_rescale_range(Some([0.0, 10.0]))
            .init()
            .unwrap();

        assert_eq!(tensorizer.numberize(&label("0")).unwrap(), 0.0);
        assert_eq!(tensorizer.numberize(&label("5")).unwrap(), 0.5);
        assert_eq!(tensorizer.numberize(&label("10")).unwrap(), 1.0);

        for bad in ["-1", "11"] {
            assert!(matches!(
                tensorizer.numberize(&label(bad)),
                Err(TensorizerError::RangeViolation { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_range() {
        for range in [[1.0, 1.0], [2.0, 1.0]] {
            assert!(matches!(
                NumericLabelTensorizerOptions::default()
                    .with_rescale_range(Some(range))
                    .init(),
                Err(TensorizerError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_tensorize() {
        let tensorizer = NumericLabelTensorizerOptions::default().init().unwrap();
        let rows: Vec<FloatType> = vec![0.25, 1.0, -3.0];
        assert_eq!(
            tensorizer.tensorize(&rows).unwrap(),
            array![0.25, 1.0, -3.0]
        );
    }
}
