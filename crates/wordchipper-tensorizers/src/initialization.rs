//! # Corpus-Streaming Initialization
//!
//! Tensorizers which build state from the training corpus (vocabularies, label
//! sets) see the corpus through a single shared pass:
//!
//! * every tensorizer is primed with [`CorpusInitializer::start`];
//!   those that need no pass drop out immediately;
//! * each row is delivered to every remaining tensorizer before the next row
//!   is read, so all tensorizers observe the same rows in the same order, and
//!   no more than one row is held at a time;
//! * after the last row every remaining tensorizer is finished exactly once.
//!
//! Any error during priming, delivery, or finishing aborts the pass.
//!
//! ```rust
//! use wordchipper_tensorizers::{
//!     data::Row,
//!     initialization::{Initialize, initialize_tensorizers},
//!     tensorizers::{LabelTensorizerOptions, TokenTensorizerOptions},
//! };
//!
//! let rows = vec![
//!     Row::new().with("text", "turn on the lights").with("label", "on"),
//!     Row::new().with("text", "turn them off").with("label", "off"),
//! ];
//!
//! let mut tokens = TokenTensorizerOptions::default().init().unwrap();
//! let mut labels = LabelTensorizerOptions::default().init();
//!
//! let targets: Vec<&mut dyn Initialize> = vec![&mut tokens, &mut labels];
//! let stats = initialize_tensorizers(targets, &rows).unwrap();
//!
//! assert_eq!(stats.rows, 2);
//! assert_eq!(labels.labels().unwrap().len(), 2);
//! ```

use core::borrow::Borrow;

use crate::{data::Row, errors::TZResult, tensorizers::CorpusInitializer};

/// A primed, type-erased corpus consumer.
pub trait InitSession {
    /// Deliver one corpus row.
    fn accept(
        &mut self,
        row: &Row,
    ) -> TZResult<()>;

    /// Close the session, freezing the accumulated state.
    fn finish(self: Box<Self>) -> TZResult<()>;
}

struct Session<'a, C: CorpusInitializer> {
    target: &'a mut C,
    state: C::State,
}

impl<C: CorpusInitializer> InitSession for Session<'_, C> {
    fn accept(
        &mut self,
        row: &Row,
    ) -> TZResult<()> {
        self.target.accept(&mut self.state, row)
    }

    fn finish(self: Box<Self>) -> TZResult<()> {
        let Session { target, state } = *self;
        target.finish(state)
    }
}

/// Object-safe entry point to a [`CorpusInitializer`].
pub trait Initialize {
    /// Prime a session.
    ///
    /// ## Returns
    /// `None` if no corpus pass is needed.
    fn begin(&mut self) -> Option<Box<dyn InitSession + '_>>;
}

impl<C> Initialize for C
where
    C: CorpusInitializer,
    C::State: 'static,
{
    fn begin(&mut self) -> Option<Box<dyn InitSession + '_>> {
        let state = self.start()?;
        Some(Box::new(Session {
            target: self,
            state,
        }))
    }
}

/// Summary of a corpus pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitializationStats {
    /// Tensorizers which took part in the pass.
    pub consumers: usize,

    /// Rows delivered to each consumer.
    pub rows: usize,
}

/// Stream a data source through the initializers of many tensorizers.
///
/// The data source is not read at all when no tensorizer needs a pass.
///
/// ## Arguments
/// * `targets` - the tensorizers to initialize.
/// * `rows` - the data source.
///
/// ## Returns
/// The pass summary, or the first error raised by any tensorizer.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(targets, rows)))]
pub fn initialize_tensorizers<'a, T, I>(
    targets: T,
    rows: I,
) -> TZResult<InitializationStats>
where
    T: IntoIterator<Item = &'a mut dyn Initialize>,
    I: IntoIterator,
    I::Item: Borrow<Row>,
{
    let mut sessions: Vec<Box<dyn InitSession + 'a>> =
        targets.into_iter().filter_map(|t| t.begin()).collect();

    let mut stats = InitializationStats {
        consumers: sessions.len(),
        rows: 0,
    };
    if sessions.is_empty() {
        log::debug!("No tensorizer requires a corpus pass");
        return Ok(stats);
    }

    log::info!("Starting corpus pass for {} tensorizers", stats.consumers);
    for row in rows {
        let row = row.borrow();
        for session in sessions.iter_mut() {
            session.accept(row)?;
        }
        stats.rows += 1;
    }

    for session in sessions {
        session.finish()?;
    }
    log::info!("Finished corpus pass: {} rows", stats.rows);

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TensorizerError;
    use crate::tensorizers::testing::text_rows;

    /// Records every row it sees and how often it was finished.
    #[derive(Default)]
    struct Recorder {
        skip: bool,
        seen: Vec<String>,
        finished: usize,
        fail_on: Option<String>,
    }

    impl CorpusInitializer for Recorder {
        type State = Vec<String>;

        fn start(&self) -> Option<Self::State> {
            if self.skip { None } else { Some(Vec::new()) }
        }

        fn accept(
            &self,
            state: &mut Self::State,
            row: &Row,
        ) -> TZResult<()> {
            let text = row.text("text")?;
            if self.fail_on.as_deref() == Some(text) {
                return Err(TensorizerError::InvalidConfig(text.to_string()));
            }
            state.push(text.to_string());
            Ok(())
        }

        fn finish(
            &mut self,
            state: Self::State,
        ) -> TZResult<()> {
            self.seen = state;
            self.finished += 1;
            Ok(())
        }
    }

    #[test]
    fn test_single_pass_in_order() {
        let rows = text_rows("text", &["a", "b", "c", "d"]);

        let mut r1 = Recorder::default();
        let mut r2 = Recorder::default();
        let mut r3 = Recorder {
            skip: true,
            ..Default::default()
        };

        let targets: Vec<&mut dyn Initialize> = vec![&mut r1, &mut r2, &mut r3];
        let stats = initialize_tensorizers(targets, rows.iter()).unwrap();
        assert_eq!(
            stats,
            InitializationStats {
                consumers: 2,
                rows: 4
            }
        );

        for r in [&r1, &r2] {
            assert_eq!(r.seen, vec!["a", "b", "c", "d"]);
            assert_eq!(r.finished, 1);
        }
        assert!(r3.seen.is_empty());
        assert_eq!(r3.finished, 0);
    }

    #[test]
    fn test_source_untouched_without_consumers() {
        let mut r = Recorder {
            skip: true,
            ..Default::default()
        };

        let mut pulled = 0;
        let source = (0..10).map(|_| {
            pulled += 1;
            Row::new().with("text", "x")
        });

        let targets: Vec<&mut dyn Initialize> = vec![&mut r];
        let stats = initialize_tensorizers(targets, source).unwrap();
        assert_eq!(stats.consumers, 0);
        assert_eq!(pulled, 0);
    }

    #[test]
    fn test_error_aborts_pass() {
        let rows = text_rows("text", &["a", "bad", "c"]);
        let mut r1 = Recorder::default();
        let mut r2 = Recorder {
            fail_on: Some("bad".to_string()),
            ..Default::default()
        };

        let targets: Vec<&mut dyn Initialize> = vec![&mut r1, &mut r2];
        assert!(initialize_tensorizers(targets, &rows).is_err());
        assert_eq!(r1.finished, 0);
        assert_eq!(r2.finished, 0);
    }
}
