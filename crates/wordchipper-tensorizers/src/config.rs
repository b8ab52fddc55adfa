//! # Configuration
//!
//! Serializable tensorizer and pipeline configuration.
//!
//! ```rust
//! use wordchipper_tensorizers::{config::PipelineConfig, pipeline::TensorizerPipeline};
//!
//! let config = PipelineConfig::from_json(
//!     r#"{
//!         "fields": [
//!             {"name": "tokens", "tensorizer": {"type": "token", "add_eos_token": true}},
//!             {"name": "labels", "tensorizer": {"type": "label", "column": "intent"}},
//!             {"name": "ntokens", "tensorizer": {"type": "ntokens", "names": ["tokens"], "indexes": [1]}}
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! let pipeline = TensorizerPipeline::from_config(&config).unwrap();
//! assert_eq!(pipeline.len(), 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    errors::TZResult,
    pipeline::FieldTensorizer,
    tensorizers::{
        ByteTensorizerOptions, CharacterTokenTensorizerOptions, FloatListTensorizerOptions,
        JoinStringOptions, JoinStringTensorizer, LabelTensorizerOptions, MetricTensorizer,
        MetricTensorizerOptions, NtokensTensorizer, NumericLabelTensorizerOptions,
        RawColumnOptions, RawJsonTensorizer, RawStringTensorizer, TokenTensorizerOptions,
        WordLabelTensorizerOptions,
    },
};

/// Configuration of one tensorizer, tagged by ``"type"``.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TensorizerConfig {
    /// A [`crate::tensorizers::TokenTensorizer`].
    Token(TokenTensorizerOptions),

    /// A [`crate::tensorizers::ByteTensorizer`].
    Byte(ByteTensorizerOptions),

    /// A [`crate::tensorizers::CharacterTokenTensorizer`].
    CharacterToken(CharacterTokenTensorizerOptions),

    /// A [`crate::tensorizers::LabelTensorizer`].
    Label(LabelTensorizerOptions),

    /// A [`crate::tensorizers::NumericLabelTensorizer`].
    NumericLabel(NumericLabelTensorizerOptions),

    /// A [`crate::tensorizers::FloatListTensorizer`].
    FloatList(FloatListTensorizerOptions),

    /// A [`crate::tensorizers::WordLabelTensorizer`].
    WordLabel(WordLabelTensorizerOptions),

    /// A [`RawStringTensorizer`].
    RawString(RawColumnOptions),

    /// A [`JoinStringTensorizer`].
    JoinString(JoinStringOptions),

    /// A [`RawJsonTensorizer`].
    RawJson(RawColumnOptions),

    /// A [`MetricTensorizer`].
    Metric(MetricTensorizerOptions),

    /// A [`NtokensTensorizer`].
    Ntokens(MetricTensorizerOptions),
}

impl TensorizerConfig {
    /// Build the configured tensorizer.
    ///
    /// ## Returns
    /// The tensorizer; or the option validation error.
    pub fn build(&self) -> TZResult<FieldTensorizer> {
        Ok(match self.clone() {
            TensorizerConfig::Token(options) => options.init()?.into(),
            TensorizerConfig::Byte(options) => options.init().into(),
            TensorizerConfig::CharacterToken(options) => options.init()?.into(),
            TensorizerConfig::Label(options) => options.init().into(),
            TensorizerConfig::NumericLabel(options) => options.init()?.into(),
            TensorizerConfig::FloatList(options) => options.init()?.into(),
            TensorizerConfig::WordLabel(options) => options.init()?.into(),
            TensorizerConfig::RawString(options) => RawStringTensorizer::new(options).into(),
            TensorizerConfig::JoinString(options) => JoinStringTensorizer::new(options).into(),
            TensorizerConfig::RawJson(options) => RawJsonTensorizer::new(options).into(),
            TensorizerConfig::Metric(options) => MetricTensorizer::new(options)?.into(),
            TensorizerConfig::Ntokens(options) => NtokensTensorizer::new(options)?.into(),
        })
    }
}

/// A named field of a [`PipelineConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// The field name.
    pub name: String,

    /// The field tensorizer.
    pub tensorizer: TensorizerConfig,
}

/// Configuration of a [`crate::pipeline::TensorizerPipeline`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// The fields, in order.
    pub fields: Vec<FieldConfig>,
}

impl PipelineConfig {
    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> TZResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> TZResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a field.
    pub fn with_field<S: Into<String>>(
        mut self,
        name: S,
        tensorizer: TensorizerConfig,
    ) -> Self {
        self.fields.push(FieldConfig {
            name: name.into(),
            tensorizer,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::TensorizerError, tensorizers::Tensorizer};

    #[test]
    fn test_defaults_from_json() {
        let config: TensorizerConfig = serde_json::from_str(r#"{"type": "token"}"#).unwrap();
        assert_eq!(
            config,
            TensorizerConfig::Token(TokenTensorizerOptions::default())
        );

        let config: TensorizerConfig =
            serde_json::from_str(r#"{"type": "character_token", "max_char_length": 5, "column": "q"}"#)
                .unwrap();
        match config {
            TensorizerConfig::CharacterToken(options) => {
                assert_eq!(options.max_char_length, 5);
                assert_eq!(options.token.column, "q");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_build() {
        let field = TensorizerConfig::FloatList(FloatListTensorizerOptions::new("dense"))
            .build()
            .unwrap();
        assert_eq!(field.kind(), "FloatListTensorizer");
        assert_eq!(field.column_schema().len(), 1);

        let bad = TensorizerConfig::NumericLabel(
            NumericLabelTensorizerOptions::default().with_rescale_range(Some([3.0, 1.0])),
        );
        assert!(matches!(bad.build(), Err(TensorizerError::InvalidConfig(_))));
    }

    #[test]
    fn test_pipeline_round_trip() {
        let config = PipelineConfig::default()
            .with_field("tokens", TensorizerConfig::Token(Default::default()))
            .with_field(
                "joined",
                TensorizerConfig::JoinString(JoinStringOptions::new(["a", "b"])),
            );

        let json = config.to_json().unwrap();
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!(
            PipelineConfig::from_json(
                r#"{"fields": [{"name": "x", "tensorizer": {"type": "nope"}}]}"#
            ),
            Err(TensorizerError::Json(_))
        ));
    }
}
