//! Translation model families and the dispatcher that selects between them.
//!
//! Each family implements [`TranslationModel`]: it validates the target
//! language in its own code format, encodes the input the way its tokenizer
//! expects, and cleans the decoded output. The dispatcher only picks the
//! family and supplies the detected source language to families that use it.

use crate::errors::MmdError;
use crate::inference::{GenerationParams, ModelCache, ModelInput};
use crate::langid::DetectedLanguage;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub mod codes;
pub mod dispatcher;
pub mod madlad;
pub mod opus_mt;
pub mod seamless;

pub use dispatcher::TranslationDispatcher;
pub use madlad::MadladTranslator;
pub use opus_mt::OpusMtTranslator;
pub use seamless::SeamlessTranslator;

/// Which translation model family to use for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModelSelector {
    Seamless = 0,
    OpusMt = 1,
    Madlad = 2,
}

impl ModelSelector {
    pub const ALL: [ModelSelector; 3] = [
        ModelSelector::Seamless,
        ModelSelector::OpusMt,
        ModelSelector::Madlad,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ModelSelector::Seamless => "SeamlessM4T",
            ModelSelector::OpusMt => "Opus-MT",
            ModelSelector::Madlad => "MADLAD400",
        }
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<i64> for ModelSelector {
    type Error = MmdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ModelSelector::Seamless),
            1 => Ok(ModelSelector::OpusMt),
            2 => Ok(ModelSelector::Madlad),
            other => Err(MmdError::InvalidModelSelector(other.to_string())),
        }
    }
}

impl FromStr for ModelSelector {
    type Err = MmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Ok(index) = normalized.parse::<i64>() {
            return ModelSelector::try_from(index);
        }

        match normalized.as_str() {
            "seamless" | "seamlessm4t" | "seamless-m4t" => Ok(ModelSelector::Seamless),
            "opus" | "opus-mt" | "opusmt" | "marian" => Ok(ModelSelector::OpusMt),
            "madlad" | "madlad400" | "madlad-400" => Ok(ModelSelector::Madlad),
            _ => Err(MmdError::InvalidModelSelector(s.to_string())),
        }
    }
}

/// Whether a family consumes the detected source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceLanguageUse {
    /// The input must be tagged with the source language
    Required,
    /// The family infers the source itself; detection is skipped
    Ignored,
}

/// Output of one translation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub text: String,
    pub model_id: String,
    pub selector: ModelSelector,
    /// Target code as sent to the model
    pub target_language: String,
    /// Set only when the family consumed it
    pub source_language: Option<DetectedLanguage>,
}

/// One translation model family
#[async_trait]
pub trait TranslationModel: Send + Sync {
    fn selector(&self) -> ModelSelector;

    fn model_id(&self) -> &str;

    fn source_language_use(&self) -> SourceLanguageUse;

    /// Normalize `target_lang` into this family's code format or fail with
    /// `UnsupportedLanguageCode`
    fn normalize_target(&self, target_lang: &str) -> Result<String, MmdError>;

    /// Build the model-specific input for an already normalized target
    fn encode(
        &self,
        text: &str,
        target: &str,
        source: Option<&DetectedLanguage>,
    ) -> Result<(ModelInput, GenerationParams), MmdError>;

    /// Remove residual special tokens from the decoded output
    fn decode(&self, output: &str) -> String {
        codes::strip_special_tokens(output)
    }

    async fn translate(
        &self,
        models: &ModelCache,
        text: &str,
        target_lang: &str,
        source: Option<&DetectedLanguage>,
    ) -> Result<String, MmdError> {
        let target = self.normalize_target(target_lang)?;
        let (input, params) = self.encode(text, &target, source)?;

        let model = models.get_or_load(self.model_id()).await?;
        let output = model.generate(&input, &params).await?;
        let translated = self.decode(&output);

        if translated.is_empty() {
            return Err(MmdError::Inference(format!(
                "{} returned an empty translation",
                self.selector()
            )));
        }

        Ok(translated)
    }
}

pub(crate) fn unsupported(code: &str, selector: ModelSelector) -> MmdError {
    MmdError::UnsupportedLanguageCode {
        code: code.to_string(),
        model: selector.display_name().to_string(),
    }
}
