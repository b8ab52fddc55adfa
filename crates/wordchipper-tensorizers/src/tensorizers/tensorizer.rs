//! # Tensorizer Traits

use core::{borrow::Borrow, fmt::Debug};

use crate::{
    data::{ColumnSchema, Row},
    errors::TZResult,
};

/// A field encoder.
///
/// A tensorizer reads the columns named by its [`Tensorizer::column_schema`],
/// converts one row into a ragged per-row output ([`Tensorizer::numberize`]),
/// and pads + stacks a batch of its own per-row outputs into rectangular arrays
/// ([`Tensorizer::tensorize`]).
///
/// Any state built from the training corpus is produced through the
/// [`CorpusInitializer`] half of the contract; after that pass,
/// `numberize` is a pure function of the row and the frozen state.
pub trait Tensorizer: Send + Sync {
    /// The per-row output.
    type Numberized: Debug + Clone + Send + Sync;

    /// The batch output.
    type Tensors;

    /// The columns this tensorizer reads.
    fn column_schema(&self) -> ColumnSchema;

    /// Convert one row into its per-row output.
    ///
    /// ## Arguments
    /// * `row` - the data source row.
    ///
    /// ## Returns
    /// The per-row output; or an error if a column is missing or malformed.
    fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<Self::Numberized>;

    /// Pad and stack a batch of per-row outputs.
    ///
    /// Pass-through tensorizers return the batch unchanged.
    ///
    /// ## Arguments
    /// * `batch` - per-row outputs of this tensorizer, in batch order.
    fn tensorize<B>(
        &self,
        batch: &[B],
    ) -> TZResult<Self::Tensors>
    where
        B: Borrow<Self::Numberized>;

    /// Length-based sort key of a numberized row.
    ///
    /// ## Returns
    /// `None` when this tensorizer does not support length-based sorting.
    fn sort_key(
        &self,
        _row: &Self::Numberized,
    ) -> Option<usize> {
        None
    }
}

/// The corpus-streaming half of the tensorizer contract.
///
/// The lifecycle is:
/// 1. [`CorpusInitializer::start`] - `None` means no corpus pass is needed;
/// 2. [`CorpusInitializer::accept`] - once per corpus row, in source order;
/// 3. [`CorpusInitializer::finish`] - exactly once, after the last row,
///    freezing the accumulated state into the tensorizer.
///
/// All methods default to the no-op initializer.
pub trait CorpusInitializer {
    /// The accumulator carried through the corpus pass.
    type State;

    /// Begin a corpus pass.
    fn start(&self) -> Option<Self::State> {
        None
    }

    /// Accumulate one corpus row.
    fn accept(
        &self,
        _state: &mut Self::State,
        _row: &Row,
    ) -> TZResult<()> {
        Ok(())
    }

    /// Freeze the accumulated state.
    fn finish(
        &mut self,
        _state: Self::State,
    ) -> TZResult<()> {
        Ok(())
    }
}
