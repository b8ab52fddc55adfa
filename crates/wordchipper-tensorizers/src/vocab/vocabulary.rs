//! # Frozen Vocabulary

use serde::{Deserialize, Serialize};

use crate::{
    errors::{TZResult, TensorizerError},
    types::{TZHashMap, hash_map_with_capacity},
    vocab::SpecialToken,
};

/// The outcome of looking a symbol up in a [`Vocabulary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The symbol is in the vocabulary.
    Found(usize),

    /// The symbol is unknown; this is the UNK index.
    Substituted(usize),

    /// The symbol is unknown and the vocabulary has no UNK slot.
    Unknown,
}

impl Lookup {
    /// The resolved index, if any.
    pub fn index(self) -> Option<usize> {
        match self {
            Lookup::Found(idx) | Lookup::Substituted(idx) => Some(idx),
            Lookup::Unknown => None,
        }
    }

    /// Fold into an index, failing on [`Lookup::Unknown`].
    ///
    /// ## Arguments
    /// * `symbol` - the looked up symbol, reported on failure.
    pub fn resolve(
        self,
        symbol: &str,
    ) -> TZResult<usize> {
        self.index().ok_or_else(|| TensorizerError::UnknownSymbol {
            symbol: symbol.to_string(),
        })
    }

    /// Fold into an index under an unknown-symbol policy.
    ///
    /// ## Arguments
    /// * `allow_unknown` - accept [`Lookup::Substituted`]; otherwise it fails
    ///   like [`Lookup::Unknown`].
    /// * `symbol` - the looked up symbol, reported on failure.
    pub fn fold(
        self,
        allow_unknown: bool,
        symbol: &str,
    ) -> TZResult<usize> {
        match self {
            Lookup::Substituted(_) if !allow_unknown => Lookup::Unknown.resolve(symbol),
            other => other.resolve(symbol),
        }
    }
}

/// Immutable symbol <-> index bijection.
///
/// Reserved slots are ordinary symbols (see [`SpecialToken`]);
/// their accessors return `None` when the slot was not reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    symbols: Vec<String>,
    index: TZHashMap<String, usize>,
}

impl From<Vec<String>> for Vocabulary {
    fn from(symbols: Vec<String>) -> Self {
        Self::from_symbols(symbols)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.symbols
    }
}

impl Vocabulary {
    /// Build a vocabulary from an ordered symbol list.
    ///
    /// Duplicate symbols keep their first index.
    ///
    /// ## Arguments
    /// * `symbols` - the symbols, in index order.
    ///
    /// ## Returns
    /// A new `Vocabulary` instance.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let iter = symbols.into_iter();
        let mut index: TZHashMap<String, usize> = hash_map_with_capacity(iter.size_hint().0);
        let mut list = Vec::with_capacity(iter.size_hint().0);
        for symbol in iter {
            let symbol = symbol.into();
            if index.contains_key(&symbol) {
                continue;
            }
            index.insert(symbol.clone(), list.len());
            list.push(symbol);
        }
        Self {
            symbols: list,
            index,
        }
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Is the vocabulary empty?
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols, in index order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Exact index of a symbol, with no UNK substitution.
    pub fn get_index(
        &self,
        symbol: &str,
    ) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    /// Reverse lookup of an index.
    pub fn symbol(
        &self,
        idx: usize,
    ) -> Option<&str> {
        self.symbols.get(idx).map(String::as_str)
    }

    /// Index of a reserved symbol, if reserved.
    pub fn special_idx(
        &self,
        special: SpecialToken,
    ) -> Option<usize> {
        self.get_index(special.as_str())
    }

    /// The PAD index, if reserved.
    pub fn pad_idx(&self) -> Option<usize> {
        self.special_idx(SpecialToken::Pad)
    }

    /// The UNK index, if reserved.
    pub fn unk_idx(&self) -> Option<usize> {
        self.special_idx(SpecialToken::Unk)
    }

    /// The BOS index, if reserved.
    pub fn bos_idx(&self) -> Option<usize> {
        self.special_idx(SpecialToken::Bos)
    }

    /// The EOS index, if reserved.
    pub fn eos_idx(&self) -> Option<usize> {
        self.special_idx(SpecialToken::Eos)
    }

    /// Look up a symbol.
    ///
    /// ## Returns
    /// * [`Lookup::Found`] if present,
    /// * [`Lookup::Substituted`] with the UNK index if absent and UNK is reserved,
    /// * [`Lookup::Unknown`] otherwise.
    pub fn lookup(
        &self,
        symbol: &str,
    ) -> Lookup {
        match self.get_index(symbol) {
            Some(idx) => Lookup::Found(idx),
            None => match self.unk_idx() {
                Some(unk) => Lookup::Substituted(unk),
                None => Lookup::Unknown,
            },
        }
    }

    /// Look up every symbol.
    ///
    /// ## Returns
    /// The indices, or [`TensorizerError::UnknownSymbol`] naming the first
    /// symbol that could not be resolved.
    pub fn lookup_all<I, S>(
        &self,
        symbols: I,
    ) -> TZResult<Vec<usize>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        symbols
            .into_iter()
            .map(|s| self.lookup(s.as_ref()).resolve(s.as_ref()))
            .collect()
    }

    /// Reverse lookup of every index.
    ///
    /// ## Returns
    /// `None` if any index is out of range.
    pub fn reverse_lookup_all(
        &self,
        ids: &[usize],
    ) -> Option<Vec<&str>> {
        ids.iter().map(|&idx| self.symbol(idx)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_with_unk() {
        let vocab = Vocabulary::from_symbols([SpecialToken::Unk.as_str(), "a", "b"]);

        assert_eq!(vocab.lookup("a"), Lookup::Found(1));
        assert_eq!(vocab.lookup("zzz"), Lookup::Substituted(0));
        assert_eq!(vocab.lookup_all(["b", "zzz", "a"]).unwrap(), vec![2, 0, 1]);

        // Stable across repeated calls.
        assert_eq!(vocab.lookup("zzz"), vocab.lookup("zzz"));
        assert_eq!(vocab.pad_idx(), None);
    }

    #[test]
    fn test_lookup_without_unk() {
        let vocab = Vocabulary::from_symbols(["a", "b"]);

        assert_eq!(vocab.lookup("c"), Lookup::Unknown);
        assert!(matches!(
            vocab.lookup_all(["a", "c"]),
            Err(TensorizerError::UnknownSymbol { symbol }) if symbol == "c"
        ));
    }

    #[test]
    fn test_fold_policy() {
        let vocab = Vocabulary::from_symbols([SpecialToken::Unk.as_str(), "a"]);

        assert_eq!(vocab.lookup("a").fold(false, "a").unwrap(), 1);
        assert_eq!(vocab.lookup("q").fold(true, "q").unwrap(), 0);
        assert!(matches!(
            vocab.lookup("q").fold(false, "q"),
            Err(TensorizerError::UnknownSymbol { symbol }) if symbol == "q"
        ));
    }

    #[test]
    fn test_round_trip() {
        let symbols = ["x", "y", "z", "x"];
        let vocab = Vocabulary::from_symbols(symbols);
        assert_eq!(vocab.len(), 3);

        let ids = vocab.lookup_all(symbols).unwrap();
        assert_eq!(vocab.reverse_lookup_all(&ids).unwrap(), symbols.to_vec());
        assert_eq!(vocab.reverse_lookup_all(&[7]), None);
    }

    #[test]
    fn test_serde() {
        let vocab = Vocabulary::from_symbols(["__PAD__", "a"]);
        let json = serde_json::to_string(&vocab).unwrap();
        assert_eq!(json, r#"["__PAD__","a"]"#);

        let rebuilt: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(rebuilt, vocab);
        assert_eq!(rebuilt.pad_idx(), Some(0));
    }
}
