//! # Reserved Vocabulary Symbols

use core::fmt::{Display, Formatter};

/// Reserved symbols a [`crate::vocab::VocabBuilder`] may place ahead of corpus symbols.
///
/// Variants are listed in reservation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialToken {
    /// Unknown symbol.
    Unk,

    /// Padding.
    Pad,

    /// Beginning of sequence.
    Bos,

    /// End of sequence.
    Eos,
}

impl SpecialToken {
    /// All special tokens, in reservation order.
    pub const ALL: [SpecialToken; 4] = [
        SpecialToken::Unk,
        SpecialToken::Pad,
        SpecialToken::Bos,
        SpecialToken::Eos,
    ];

    /// The symbol text.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SpecialToken::Unk => "__UNKNOWN__",
            SpecialToken::Pad => "__PAD__",
            SpecialToken::Bos => "__BEGIN_OF_SENTENCE__",
            SpecialToken::Eos => "__END_OF_SENTENCE__",
        }
    }
}

impl Display for SpecialToken {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for SpecialToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
