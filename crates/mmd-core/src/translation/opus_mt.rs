//! Opus-MT (Marian) multilingual model: English to the Romance languages

use crate::errors::MmdError;
use crate::inference::{GenerationParams, ModelInput};
use crate::langid::DetectedLanguage;
use crate::translation::codes::{to_iso639_3, OPUS_MT_ROA_TARGETS};
use crate::translation::{unsupported, ModelSelector, SourceLanguageUse, TranslationModel};

/// Selects the output language with a `>>xxx<<` prefix token and tokenizes
/// with padding. The model is trained on English input, so the detected
/// source language is not consulted.
pub struct OpusMtTranslator {
    model_id: String,
}

impl OpusMtTranslator {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }

    pub fn target_token(target: &str) -> String {
        format!(">>{}<<", target)
    }
}

impl TranslationModel for OpusMtTranslator {
    fn selector(&self) -> ModelSelector {
        ModelSelector::OpusMt
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn source_language_use(&self) -> SourceLanguageUse {
        SourceLanguageUse::Ignored
    }

    fn normalize_target(&self, target_lang: &str) -> Result<String, MmdError> {
        let trimmed = target_lang.trim();
        // Script-qualified tokens such as `frm_Latn` are matched verbatim
        if let Some(token) = OPUS_MT_ROA_TARGETS.iter().find(|t| **t == trimmed) {
            return Ok(token.to_string());
        }

        to_iso639_3(trimmed)
            .filter(|code| OPUS_MT_ROA_TARGETS.contains(&code.as_str()))
            .ok_or_else(|| unsupported(target_lang, self.selector()))
    }

    fn encode(
        &self,
        text: &str,
        target: &str,
        _source: Option<&DetectedLanguage>,
    ) -> Result<(ModelInput, GenerationParams), MmdError> {
        let input = ModelInput::new(format!("{}{}", Self::target_token(target), text))
            .with_padding(true);
        Ok((input, GenerationParams::default()))
    }
}
