//! # Tokenizers
//!
//! Tensorizers consume tokenizers as a black box through the [`Tokenizer`] trait.
//! [`SplitTokenizer`] is the default regex separator tokenizer.

mod split_tokenizer;

use core::fmt::Debug;
use std::sync::Arc;

#[doc(inline)]
pub use split_tokenizer::{DEFAULT_SPLIT_PATTERN, SplitTokenizer, TokenizerOptions};

use crate::data::Token;

/// Common Tokenizer Handle Type
pub type TokenizerHandle = Arc<dyn Tokenizer>;

/// Splits raw text into ordered tokens.
///
/// Implementations must be deterministic and side-effect free.
pub trait Tokenizer: Debug + Send + Sync {
    /// Tokenize text.
    ///
    /// ## Arguments
    /// * `text` - the raw text.
    ///
    /// ## Returns
    /// The tokens, ordered by position, with character offsets into `text`.
    fn tokenize(
        &self,
        text: &str,
    ) -> Vec<Token>;
}

/// The default tokenizer handle.
pub fn default_tokenizer() -> TokenizerHandle {
    Arc::new(SplitTokenizer::default())
}
