//! # Pipeline
//!
//! [`TensorizerPipeline`] applies a set of named [`FieldTensorizer`]s to the
//! same rows: one shared corpus pass, per-row numberization, and per-field
//! batch tensorization.

pub mod field;
pub mod tensorizer_pipeline;

#[doc(inline)]
pub use field::{BatchTensors, FieldTensorizer, RowOutput};
#[doc(inline)]
pub use tensorizer_pipeline::{NumberizedRow, TensorBatch, TensorizerPipeline};
