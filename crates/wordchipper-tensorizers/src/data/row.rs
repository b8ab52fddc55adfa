//! # Rows and Column Schemas

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    data::SpanLabel,
    errors::{TZResult, TensorizerError},
    types::FloatType,
};

/// The kind of value a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// A text value.
    Text,

    /// A numeric value.
    Number,

    /// A list of [`SpanLabel`]s.
    Slots,
}

/// One ``(column_name, expected_type)`` entry of a column schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSpec {
    /// The column name.
    pub name: String,

    /// The expected value type.
    pub column_type: ColumnType,
}

impl ColumnSpec {
    /// Create a new column spec.
    pub fn new<S: Into<String>>(
        name: S,
        column_type: ColumnType,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// A text column.
    pub fn text<S: Into<String>>(name: S) -> Self {
        Self::new(name, ColumnType::Text)
    }
}

/// Ordered column declarations of a tensorizer.
///
/// The schema documents the input contract; it is not enforced up front.
pub type ColumnSchema = Vec<ColumnSpec>;

/// A raw column value.
///
/// Deserializes untagged: a JSON string is [`RawValue::Text`], a JSON number is
/// [`RawValue::Number`], and a JSON array of span objects is [`RawValue::Slots`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Text.
    Text(String),

    /// A number.
    Number(f64),

    /// Span labels.
    Slots(Vec<SpanLabel>),
}

impl RawValue {
    /// The [`ColumnType`] of this value.
    pub fn column_type(&self) -> ColumnType {
        match self {
            RawValue::Text(_) => ColumnType::Text,
            RawValue::Number(_) => ColumnType::Number,
            RawValue::Slots(_) => ColumnType::Slots,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<Vec<SpanLabel>> for RawValue {
    fn from(value: Vec<SpanLabel>) -> Self {
        RawValue::Slots(value)
    }
}

/// A data source row: column name to raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: BTreeMap<String, RawValue>,
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value.
    pub fn insert<S, V>(
        &mut self,
        column: S,
        value: V,
    ) where
        S: Into<String>,
        V: Into<RawValue>,
    {
        self.columns.insert(column.into(), value.into());
    }

    /// Set a column value.
    ///
    /// ## Returns
    /// The updated `Row`.
    pub fn with<S, V>(
        mut self,
        column: S,
        value: V,
    ) -> Self
    where
        S: Into<String>,
        V: Into<RawValue>,
    {
        self.insert(column, value);
        self
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Does the row have no columns?
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column value.
    ///
    /// ## Returns
    /// The value, or [`TensorizerError::MissingColumn`].
    pub fn get(
        &self,
        column: &str,
    ) -> TZResult<&RawValue> {
        self.columns
            .get(column)
            .ok_or_else(|| TensorizerError::MissingColumn {
                column: column.to_string(),
            })
    }

    /// Get a text column.
    pub fn text(
        &self,
        column: &str,
    ) -> TZResult<&str> {
        match self.get(column)? {
            RawValue::Text(text) => Ok(text),
            other => Err(type_error(column, ColumnType::Text, other)),
        }
    }

    /// Get a span label column.
    pub fn slots(
        &self,
        column: &str,
    ) -> TZResult<&[SpanLabel]> {
        match self.get(column)? {
            RawValue::Slots(slots) => Ok(slots),
            other => Err(type_error(column, ColumnType::Slots, other)),
        }
    }

    /// Get a numeric column.
    ///
    /// Text values are parsed after trimming whitespace.
    pub fn number(
        &self,
        column: &str,
    ) -> TZResult<FloatType> {
        match self.get(column)? {
            RawValue::Number(n) => Ok(*n as FloatType),
            RawValue::Text(text) => {
                text.trim()
                    .parse::<FloatType>()
                    .map_err(|_| TensorizerError::NumberParse {
                        column: column.to_string(),
                        text: text.clone(),
                    })
            }
            other => Err(type_error(column, ColumnType::Number, other)),
        }
    }
}

fn type_error(
    column: &str,
    expected: ColumnType,
    found: &RawValue,
) -> TensorizerError {
    TensorizerError::ColumnType {
        column: column.to_string(),
        expected,
        found: found.column_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accessors() {
        let row = Row::new()
            .with("text", "play the song")
            .with("slots", vec![SpanLabel::new("song_name", 9, 13)])
            .with("score", "2.5");

        assert_eq!(row.len(), 3);
        assert_eq!(row.text("text").unwrap(), "play the song");
        assert_eq!(row.slots("slots").unwrap().len(), 1);
        assert_eq!(row.number("score").unwrap(), 2.5);
    }

    #[test]
    fn test_row_errors() {
        let row = Row::new().with("text", "abc");

        assert!(matches!(
            row.text("missing"),
            Err(TensorizerError::MissingColumn { column }) if column == "missing"
        ));
        assert!(matches!(
            row.slots("text"),
            Err(TensorizerError::ColumnType {
                expected: ColumnType::Slots,
                found: ColumnType::Text,
                ..
            })
        ));
        assert!(matches!(
            row.number("text"),
            Err(TensorizerError::NumberParse { .. })
        ));
    }

    #[test]
    fn test_row_json() {
        let row: Row = serde_json::from_str(
            r#"{
                "text": "play the song",
                "label": 3,
                "slots": [{"label": "song_name", "start": 9, "end": 13}]
            }"#,
        )
        .unwrap();

        assert_eq!(row.text("text").unwrap(), "play the song");
        assert_eq!(row.number("label").unwrap(), 3.0);
        assert_eq!(
            row.slots("slots").unwrap(),
            &[SpanLabel::new("song_name", 9, 13)]
        );
    }
}
