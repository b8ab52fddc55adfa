//! # Tensorizer Pipeline

use core::borrow::Borrow;

use crate::{
    config::PipelineConfig,
    data::{ColumnSchema, Row},
    errors::{TZResult, TensorizerError},
    initialization::{Initialize, InitializationStats, initialize_tensorizers},
    pipeline::{BatchTensors, FieldTensorizer, RowOutput},
    tensorizers::Tensorizer,
    types::{IndexType, TZHashMap, hash_map_new, hash_map_with_capacity},
};

/// The numberized outputs of one row, by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberizedRow {
    outputs: TZHashMap<String, RowOutput>,
}

impl NumberizedRow {
    /// The output of a field.
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&RowOutput> {
        self.outputs.get(name)
    }

    /// The output of a field, or [`TensorizerError::UnknownField`].
    pub fn field(
        &self,
        name: &str,
    ) -> TZResult<&RowOutput> {
        self.get(name).ok_or_else(|| TensorizerError::UnknownField {
            name: name.to_string(),
        })
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Has no fields?
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// The tensorized batch, by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorBatch {
    tensors: TZHashMap<String, BatchTensors>,
}

impl TensorBatch {
    /// The tensors of a field.
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&BatchTensors> {
        self.tensors.get(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// Has no fields?
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Consume into the field map.
    pub fn into_inner(self) -> TZHashMap<String, BatchTensors> {
        self.tensors
    }
}

/// An ordered set of named field tensorizers, applied together.
///
/// ```rust
/// use wordchipper_tensorizers::{
///     data::Row,
///     pipeline::{BatchTensors, TensorizerPipeline},
///     tensorizers::{LabelTensorizerOptions, TokenTensorizerOptions},
/// };
///
/// let mut pipeline = TensorizerPipeline::new();
/// pipeline
///     .add("tokens", TokenTensorizerOptions::default().init().unwrap())
///     .unwrap();
/// pipeline
///     .add("labels", LabelTensorizerOptions::default().init())
///     .unwrap();
///
/// let rows = vec![
///     Row::new().with("text", "set an alarm").with("label", "alarm"),
///     Row::new().with("text", "play jazz").with("label", "music"),
/// ];
/// pipeline.initialize(&rows).unwrap();
///
/// let numberized = pipeline.numberize_batch(&rows).unwrap();
/// let batch = pipeline.tensorize(&numberized).unwrap();
///
/// match batch.get("tokens") {
///     Some(BatchTensors::Sequence(t)) => assert_eq!(t.ids.dim(), (2, 3)),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TensorizerPipeline {
    fields: Vec<(String, FieldTensorizer)>,
    index: TZHashMap<String, usize>,
}

impl TensorizerPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            index: hash_map_new(),
        }
    }

    /// Build a pipeline from configuration.
    ///
    /// ## Returns
    /// The pipeline; or the first field construction error.
    pub fn from_config(config: &PipelineConfig) -> TZResult<Self> {
        let mut pipeline = Self::new();
        for field in &config.fields {
            pipeline.add(&field.name, field.tensorizer.build()?)?;
        }
        Ok(pipeline)
    }

    /// Add a named field.
    ///
    /// ## Returns
    /// [`TensorizerError::DuplicateField`] if the name is taken.
    pub fn add<S, T>(
        &mut self,
        name: S,
        tensorizer: T,
    ) -> TZResult<()>
    where
        S: Into<String>,
        T: Into<FieldTensorizer>,
    {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(TensorizerError::DuplicateField { name });
        }
        self.index.insert(name.clone(), self.fields.len());
        self.fields.push((name, tensorizer.into()));
        Ok(())
    }

    /// The tensorizer of a field.
    pub fn get(
        &self,
        name: &str,
    ) -> Option<&FieldTensorizer> {
        self.index.get(name).map(|&idx| &self.fields[idx].1)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Has no fields?
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The field names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// The columns read by every field, in field order.
    pub fn column_schema(&self) -> ColumnSchema {
        self.fields
            .iter()
            .flat_map(|(_, t)| t.column_schema())
            .collect()
    }

    /// Run the corpus pass for every field.
    ///
    /// ## Arguments
    /// * `rows` - the training corpus; read at most once.
    pub fn initialize<I>(
        &mut self,
        rows: I,
    ) -> TZResult<InitializationStats>
    where
        I: IntoIterator,
        I::Item: Borrow<Row>,
    {
        let targets = self
            .fields
            .iter_mut()
            .map(|(_, t)| t as &mut dyn Initialize);
        initialize_tensorizers(targets, rows)
    }

    /// Numberize one row with every field.
    ///
    /// ## Returns
    /// The per-field outputs; or the first field error.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, row)))]
    pub fn numberize(
        &self,
        row: &Row,
    ) -> TZResult<NumberizedRow> {
        let mut outputs = hash_map_with_capacity(self.fields.len());
        for (name, tensorizer) in &self.fields {
            outputs.insert(name.clone(), tensorizer.numberize(row)?);
        }
        Ok(NumberizedRow { outputs })
    }

    /// Numberize many rows.
    ///
    /// Rows are numberized in parallel when the ``rayon`` feature is enabled.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, rows)))]
    pub fn numberize_batch(
        &self,
        rows: &[Row],
    ) -> TZResult<Vec<NumberizedRow>> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                let rows = rows.par_iter();
            } else {
                let rows = rows.iter();
            }
        }
        rows.map(|row| self.numberize(row)).collect()
    }

    /// Stable sort of numberized rows by a field's sort key.
    ///
    /// ## Returns
    /// [`TensorizerError::UnsupportedOperation`] if the field has no sort key.
    pub fn sort_by_field(
        &self,
        rows: Vec<NumberizedRow>,
        name: &str,
    ) -> TZResult<Vec<NumberizedRow>> {
        let tensorizer = self.field(name)?;

        let mut keyed = rows
            .into_iter()
            .map(|row| -> TZResult<(usize, NumberizedRow)> {
                let key = tensorizer.sort_key(row.field(name)?).ok_or_else(|| {
                    TensorizerError::UnsupportedOperation(format!(
                        "field {name:?} ({}) has no sort key",
                        tensorizer.kind()
                    ))
                })?;
                Ok((key, row))
            })
            .collect::<TZResult<Vec<_>>>()?;

        keyed.sort_by_key(|(key, _)| *key);
        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }

    /// Tensorize a batch of numberized rows, field by field.
    ///
    /// [`FieldTensorizer::Ntokens`] fields sum scalars read from the rows of
    /// their sibling fields.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, rows)))]
    pub fn tensorize(
        &self,
        rows: &[NumberizedRow],
    ) -> TZResult<TensorBatch> {
        let mut tensors = hash_map_with_capacity(self.fields.len());
        for (name, tensorizer) in &self.fields {
            let batch = match tensorizer {
                FieldTensorizer::Ntokens(ntokens) => {
                    BatchTensors::Count(ntokens.count(|sibling, index| {
                        self.sibling_scalars(rows, sibling, index)
                    })?)
                }
                _ => {
                    let outputs = rows
                        .iter()
                        .map(|row| row.field(name))
                        .collect::<TZResult<Vec<_>>>()?;
                    tensorizer.tensorize(&outputs)?
                }
            };
            tensors.insert(name.clone(), batch);
        }
        Ok(TensorBatch { tensors })
    }

    fn field(
        &self,
        name: &str,
    ) -> TZResult<&FieldTensorizer> {
        self.get(name).ok_or_else(|| TensorizerError::UnknownField {
            name: name.to_string(),
        })
    }

    fn sibling_scalars(
        &self,
        rows: &[NumberizedRow],
        sibling: &str,
        index: usize,
    ) -> TZResult<Vec<IndexType>> {
        self.field(sibling)?;
        rows.iter()
            .map(|row| {
                row.field(sibling)?
                    .scalar(index)
                    .ok_or_else(|| TensorizerError::NotScalar {
                        name: sibling.to_string(),
                        index,
                    })
            })
            .collect()
    }
}
