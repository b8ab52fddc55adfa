//! # `wordchipper-tensorizers` Field Tensorizers
//!
//! Tensorizers turn data source rows into model-ready batches, one logical
//! field at a time:
//! 1. a single shared pass over the training corpus builds every vocabulary
//!    ([`initialization`]);
//! 2. `numberize` converts one row into a ragged per-row output;
//! 3. `tensorize` pads and stacks a batch of per-row outputs into
//!    rectangular ``ndarray`` arrays.
//!
//! See:
//! * [`tensorizers`] for the field encoders.
//! * [`pipeline`] to run a named set of field encoders together.
//! * [`config`] for serializable pipeline configuration.
//! * [`vocab`] for vocabularies and reserved symbols.
//!
//! ```rust
//! use wordchipper_tensorizers::{
//!     data::{Row, SpanLabel},
//!     pipeline::{BatchTensors, TensorizerPipeline},
//!     tensorizers::{TokenTensorizerOptions, WordLabelTensorizerOptions},
//! };
//!
//! let rows = vec![
//!     Row::new()
//!         .with("text", "play the song")
//!         .with("slots", vec![SpanLabel::new("song_name", 9, 13)]),
//!     Row::new()
//!         .with("text", "call mom")
//!         .with("slots", vec![SpanLabel::new("contact", 5, 8)]),
//! ];
//!
//! let mut pipeline = TensorizerPipeline::new();
//! pipeline.add("tokens", TokenTensorizerOptions::default().init()?)?;
//! pipeline.add("slots", WordLabelTensorizerOptions::default().init()?)?;
//! pipeline.initialize(&rows)?;
//!
//! let batch = pipeline.tensorize(&pipeline.numberize_batch(&rows)?)?;
//! match batch.get("slots") {
//!     Some(BatchTensors::Ids(ids)) => assert_eq!(ids.row(0).to_vec(), vec![0, 0, 1]),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! # Ok::<(), wordchipper_tensorizers::errors::TensorizerError>(())
//! ```
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

pub mod config;
pub mod data;
pub mod errors;
pub mod initialization;
pub mod padding;
pub mod pipeline;
pub mod tensorizers;
pub mod tokenizers;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{TZResult, TensorizerError};
#[doc(inline)]
pub use initialization::initialize_tensorizers;
#[doc(inline)]
pub use pipeline::TensorizerPipeline;
#[doc(inline)]
pub use tensorizers::{CorpusInitializer, Tensorizer};
