//! # Vocabulary
//!
//! * [`VocabBuilder`] - accumulates symbols in encounter order during a corpus pass.
//! * [`Vocabulary`] - the frozen symbol <-> index map.
//! * [`Lookup`] - the explicit result of a vocabulary lookup;
//!   tensorizers decide whether [`Lookup::Unknown`] is an error.
//! * [`SpecialToken`] - the reserved PAD/UNK/BOS/EOS symbols.

mod special_tokens;
mod vocab_builder;
mod vocabulary;

#[doc(inline)]
pub use special_tokens::SpecialToken;
#[doc(inline)]
pub use vocab_builder::VocabBuilder;
#[doc(inline)]
pub use vocabulary::{Lookup, Vocabulary};
