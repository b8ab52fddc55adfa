//! # Test Utilities

use crate::{
    data::Row,
    initialization::{Initialize, InitializationStats, initialize_tensorizers},
};

/// Build single-column text rows.
pub fn text_rows(
    column: &str,
    texts: &[&str],
) -> Vec<Row> {
    texts
        .iter()
        .map(|text| Row::new().with(column, *text))
        .collect()
}

/// Run the corpus pass for one tensorizer.
///
/// ## Panics
/// Panics if initialization fails.
pub fn initialize_one<I: Initialize>(
    target: &mut I,
    rows: &[Row],
) -> InitializationStats {
    let targets: Vec<&mut dyn Initialize> = vec![target];
    initialize_tensorizers(targets, rows).expect("initialization failed")
}
