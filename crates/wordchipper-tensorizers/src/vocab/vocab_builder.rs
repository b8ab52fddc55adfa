//! # Vocabulary Builder

use crate::{
    types::TZHashSet,
    vocab::{SpecialToken, Vocabulary},
};

/// Accumulates symbols during a corpus pass, then freezes into a [`Vocabulary`].
///
/// Index layout of the frozen vocabulary:
/// 1. symbols passed to [`VocabBuilder::reserve`], in call order;
/// 2. enabled [`SpecialToken`]s, in [`SpecialToken::ALL`] order;
/// 3. corpus symbols, in first-encounter order.
#[derive(Debug, Clone)]
pub struct VocabBuilder {
    /// Reserve an UNK slot.
    pub use_unk: bool,

    /// Reserve a PAD slot.
    pub use_pad: bool,

    /// Reserve a BOS slot.
    pub use_bos: bool,

    /// Reserve an EOS slot.
    pub use_eos: bool,

    reserved: Vec<String>,
    symbols: Vec<String>,
    seen: TZHashSet<String>,
}

impl Default for VocabBuilder {
    fn default() -> Self {
        Self {
            use_unk: true,
            use_pad: true,
            use_bos: false,
            use_eos: false,
            reserved: Vec::new(),
            symbols: Vec::new(),
            seen: TZHashSet::default(),
        }
    }
}

impl VocabBuilder {
    /// Create a builder reserving UNK and PAD.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to reserve an UNK slot.
    pub fn with_unk(
        self,
        use_unk: bool,
    ) -> Self {
        Self { use_unk, ..self }
    }

    /// Set whether to reserve a PAD slot.
    pub fn with_pad(
        self,
        use_pad: bool,
    ) -> Self {
        Self { use_pad, ..self }
    }

    /// Set whether to reserve a BOS slot.
    pub fn with_bos(
        self,
        use_bos: bool,
    ) -> Self {
        Self { use_bos, ..self }
    }

    /// Set whether to reserve an EOS slot.
    pub fn with_eos(
        self,
        use_eos: bool,
    ) -> Self {
        Self { use_eos, ..self }
    }

    /// Reserve a leading symbol, placed ahead of the special tokens.
    ///
    /// ## Arguments
    /// * `symbol` - the symbol to reserve.
    pub fn reserve<S: Into<String>>(
        &mut self,
        symbol: S,
    ) {
        let symbol = symbol.into();
        if !self.reserved.contains(&symbol) {
            self.reserved.push(symbol);
        }
    }

    /// Number of distinct corpus symbols seen so far.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Has no corpus symbol been seen?
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Add a corpus symbol.
    pub fn add<S: AsRef<str>>(
        &mut self,
        symbol: S,
    ) {
        let symbol = symbol.as_ref();
        if !self.seen.contains(symbol) {
            self.seen.insert(symbol.to_string());
            self.symbols.push(symbol.to_string());
        }
    }

    /// Add every corpus symbol.
    pub fn add_all<I>(
        &mut self,
        symbols: I,
    ) where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for symbol in symbols {
            self.add(symbol);
        }
    }

    /// The special tokens this builder will reserve.
    pub fn specials(&self) -> Vec<SpecialToken> {
        SpecialToken::ALL
            .into_iter()
            .filter(|s| match s {
                SpecialToken::Unk => self.use_unk,
                SpecialToken::Pad => self.use_pad,
                SpecialToken::Bos => self.use_bos,
                SpecialToken::Eos => self.use_eos,
            })
            .collect()
    }

    /// Freeze into a [`Vocabulary`].
    pub fn make_vocab(self) -> Vocabulary {
        let specials = self
            .specials()
            .into_iter()
            .map(|s| s.as_str().to_string());

        Vocabulary::from_symbols(
            self.reserved
                .into_iter()
                .chain(specials)
                .chain(self.symbols),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let mut builder = VocabBuilder::new();
        builder.add_all(["the", "cat", "the", "sat"]);
        assert_eq!(builder.len(), 3);

        let vocab = builder.make_vocab();
        assert_eq!(
            vocab.symbols(),
            &["__UNKNOWN__", "__PAD__", "the", "cat", "sat"]
        );
        assert_eq!(vocab.unk_idx(), Some(0));
        assert_eq!(vocab.pad_idx(), Some(1));
        assert_eq!(vocab.bos_idx(), None);
    }

    #[test]
    fn test_reserved_first() {
        let mut builder = VocabBuilder::new().with_pad(false).with_eos(true);
        builder.reserve("NoLabel");
        builder.add_all(["b", "a", "NoLabel"]);

        let vocab = builder.make_vocab();
        assert_eq!(
            vocab.symbols(),
            &["NoLabel", "__UNKNOWN__", "__END_OF_SENTENCE__", "b", "a"]
        );
    }

    #[test]
    fn test_no_specials() {
        let mut builder = VocabBuilder::new().with_pad(false).with_unk(false);
        assert!(builder.is_empty());
        builder.add("x");

        let vocab = builder.make_vocab();
        assert_eq!(vocab.symbols(), &["x"]);
        assert_eq!(vocab.unk_idx(), None);
    }
}
