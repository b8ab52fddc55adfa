//! # Error Types

use crate::data::ColumnType;

/// Errors from tensorizer operations.
#[derive(Debug, thiserror::Error)]
pub enum TensorizerError {
    /// A declared column is absent from the row.
    #[error("missing column: {column:?}")]
    MissingColumn {
        /// The column name.
        column: String,
    },

    /// A column holds a value of the wrong kind.
    #[error("column {column:?} expected {expected:?}, found {found:?}")]
    ColumnType {
        /// The column name.
        column: String,

        /// The declared column type.
        expected: ColumnType,

        /// The type actually present in the row.
        found: ColumnType,
    },

    /// A symbol is missing from a frozen vocabulary which has no UNK slot.
    #[error("unknown symbol: {symbol:?}")]
    UnknownSymbol {
        /// The offending symbol.
        symbol: String,
    },

    /// A float list could not be parsed after normalization.
    #[error("unable to parse float list: {raw:?}, normalized: {normalized:?}")]
    MalformedFloatList {
        /// The original column text.
        raw: String,

        /// The text after normalization.
        normalized: String,

        /// The JSON parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A parsed value is not a flat list of numbers.
    #[error("{value} is not a valid float list")]
    NotAFloatList {
        /// The parsed JSON value.
        value: String,
    },

    /// A float list has the wrong number of elements.
    #[error("expected dimension: {expected}, got: {actual}, value: {value:?}")]
    DimensionMismatch {
        /// The configured dimension.
        expected: usize,

        /// The parsed dimension.
        actual: usize,

        /// The parsed list.
        value: Vec<f32>,
    },

    /// A rescaled numeric label fell outside ``[0, 1]``.
    #[error("label {raw} rescaled to {rescaled}, outside [0, 1] for range [{lo}, {hi}]")]
    RangeViolation {
        /// The raw parsed label.
        raw: f32,

        /// The rescaled label.
        rescaled: f32,

        /// Range low bound.
        lo: f32,

        /// Range high bound.
        hi: f32,
    },

    /// A numeric column could not be parsed.
    #[error("column {column:?}: cannot parse {text:?} as a number")]
    NumberParse {
        /// The column name.
        column: String,

        /// The column text.
        text: String,
    },

    /// The operation is intentionally undefined for this tensorizer.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A tensorizer was used before its corpus pass completed.
    #[error("{tensorizer} used before initialization")]
    Uninitialized {
        /// The tensorizer kind.
        tensorizer: &'static str,
    },

    /// Tensorizer configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A referenced field does not exist in the pipeline.
    #[error("unknown field: {name:?}")]
    UnknownField {
        /// The field name.
        name: String,
    },

    /// A field name was registered twice.
    #[error("duplicate field: {name:?}")]
    DuplicateField {
        /// The field name.
        name: String,
    },

    /// A numberized row has no integer scalar at the requested position.
    #[error("field {name:?} has no scalar at index {index}")]
    NotScalar {
        /// The field name.
        name: String,

        /// The tuple index.
        index: usize,
    },

    /// A batch holds a per-row output produced by a different tensorizer kind.
    #[error("{tensorizer} cannot tensorize a {found} row output")]
    OutputKind {
        /// The tensorizer kind.
        tensorizer: &'static str,

        /// The kind of row output found.
        found: &'static str,
    },

    /// JSON decoding failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Regex compilation failure.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// Result type for tensorizer operations.
pub type TZResult<T> = core::result::Result<T, TensorizerError>;
