//! # Tensorizers
//!
//! A tensorizer encodes one logical input field. Every variant implements:
//! * [`Tensorizer`] - column schema, per-row `numberize`, per-batch `tensorize`,
//!   and an optional length sort key;
//! * [`CorpusInitializer`] - the optional corpus pass which builds its
//!   vocabulary (see [`crate::initialization`]).
//!
//! ## Sequence Tensorizers
//! * [`TokenTensorizer`] - tokens to vocabulary ids.
//! * [`ByteTensorizer`] - text to UTF-8 bytes.
//! * [`CharacterTokenTensorizer`] - tokens to per-token code points.
//!
//! ## Label Tensorizers
//! * [`LabelTensorizer`] - delimited categorical labels.
//! * [`NumericLabelTensorizer`] - scalar labels, optionally rescaled.
//! * [`FloatListTensorizer`] - textual lists of floats.
//! * [`WordLabelTensorizer`] - span annotations aligned onto tokens.
//!
//! ## Pass-Through and Metric Tensorizers
//! * [`RawStringTensorizer`], [`JoinStringTensorizer`], [`RawJsonTensorizer`].
//! * [`MetricTensorizer`], [`NtokensTensorizer`].

pub mod byte_tensorizer;
pub mod char_tensorizer;
pub mod float_list_tensorizer;
pub mod label_tensorizer;
pub mod metric_tensorizer;
pub mod numeric_label_tensorizer;
pub mod pass_through;
pub mod tensorizer;
pub mod token_tensorizer;
pub mod word_label_tensorizer;

#[cfg(test)]
pub(crate) mod testing;

#[doc(inline)]
pub use byte_tensorizer::{ByteTensorizer, ByteTensorizerOptions};
#[doc(inline)]
pub use char_tensorizer::{
    CharRow, CharTensors, CharacterTokenTensorizer, CharacterTokenTensorizerOptions,
};
#[doc(inline)]
pub use float_list_tensorizer::{FloatListTensorizer, FloatListTensorizerOptions};
#[doc(inline)]
pub use label_tensorizer::{LabelTensorizer, LabelTensorizerOptions};
#[doc(inline)]
pub use metric_tensorizer::{MetricTensorizer, MetricTensorizerOptions, NtokensTensorizer};
#[doc(inline)]
pub use numeric_label_tensorizer::{NumericLabelTensorizer, NumericLabelTensorizerOptions};
#[doc(inline)]
pub use pass_through::{
    JoinStringOptions, JoinStringTensorizer, RawColumnOptions, RawJsonTensorizer,
    RawStringTensorizer,
};
#[doc(inline)]
pub use tensorizer::{CorpusInitializer, Tensorizer};
#[doc(inline)]
pub use token_tensorizer::{
    SequenceRow, SequenceTensors, TokenLookup, TokenTensorizer, TokenTensorizerOptions,
};
#[doc(inline)]
pub use word_label_tensorizer::{
    NO_LABEL, WordLabelTensorizer, WordLabelTensorizerOptions, align_span_labels,
};
