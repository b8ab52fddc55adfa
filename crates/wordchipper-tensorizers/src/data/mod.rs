//! # Data Model
//!
//! * [`Row`] - a data source row, column name to [`RawValue`].
//! * [`Token`] - a tokenizer output with a half-open character span.
//! * [`SpanLabel`] - a labeled character interval to align onto tokens.
//! * [`ColumnSchema`] - the columns a tensorizer reads.

mod row;
mod token;

#[doc(inline)]
pub use row::{ColumnSchema, ColumnSpec, ColumnType, RawValue, Row};
#[doc(inline)]
pub use token::{NO_SPAN, SpanLabel, Token};
