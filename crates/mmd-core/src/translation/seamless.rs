//! SeamlessM4T: multimodal model used here for text-to-text translation only

use crate::errors::MmdError;
use crate::inference::{GenerationParams, ModelInput};
use crate::langid::DetectedLanguage;
use crate::translation::codes::to_iso639_3;
use crate::translation::{unsupported, ModelSelector, SourceLanguageUse, TranslationModel};

/// Tags the input with the detected source language and asks for text output
/// in the target language. Codes are ISO 639-3 (`eng`, `fra`).
pub struct SeamlessTranslator {
    model_id: String,
}

impl SeamlessTranslator {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

impl TranslationModel for SeamlessTranslator {
    fn selector(&self) -> ModelSelector {
        ModelSelector::Seamless
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn source_language_use(&self) -> SourceLanguageUse {
        SourceLanguageUse::Required
    }

    fn normalize_target(&self, target_lang: &str) -> Result<String, MmdError> {
        to_iso639_3(target_lang).ok_or_else(|| unsupported(target_lang, self.selector()))
    }

    fn encode(
        &self,
        text: &str,
        target: &str,
        source: Option<&DetectedLanguage>,
    ) -> Result<(ModelInput, GenerationParams), MmdError> {
        let source = source.ok_or_else(|| {
            MmdError::ClassifierError(format!(
                "{} needs the source language of the input",
                self.selector()
            ))
        })?;

        let input = ModelInput::new(text)
            .with_src_lang(source.code.clone())
            .with_tgt_lang(target);

        Ok((input, GenerationParams::text_only()))
    }
}
