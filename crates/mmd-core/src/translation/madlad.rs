//! MADLAD-400: T5-style massively multilingual model

use crate::errors::MmdError;
use crate::inference::{GenerationParams, ModelInput};
use crate::langid::DetectedLanguage;
use crate::translation::codes::to_madlad_tag;
use crate::translation::{unsupported, ModelSelector, SourceLanguageUse, TranslationModel};

/// Selects the output language with a `<2xx>` prefix token, no padding.
pub struct MadladTranslator {
    model_id: String,
}

impl MadladTranslator {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }

    pub fn target_token(target: &str) -> String {
        format!("<2{}>", target)
    }
}

impl TranslationModel for MadladTranslator {
    fn selector(&self) -> ModelSelector {
        ModelSelector::Madlad
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn source_language_use(&self) -> SourceLanguageUse {
        SourceLanguageUse::Ignored
    }

    fn normalize_target(&self, target_lang: &str) -> Result<String, MmdError> {
        to_madlad_tag(target_lang).ok_or_else(|| unsupported(target_lang, self.selector()))
    }

    fn encode(
        &self,
        text: &str,
        target: &str,
        _source: Option<&DetectedLanguage>,
    ) -> Result<(ModelInput, GenerationParams), MmdError> {
        let input = ModelInput::new(format!("{}{}", Self::target_token(target), text));
        Ok((input, GenerationParams::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_prefixes_target_token_without_padding() {
        let translator = MadladTranslator::new("google/madlad400-10b-mt");
        let (input, _) = translator.encode("Hello", "fr", None).unwrap();

        assert_eq!(input.text, "<2fr>Hello");
        assert!(!input.padding);
    }

    #[test]
    fn test_three_letter_targets_are_shortened() {
        let translator = MadladTranslator::new("google/madlad400-10b-mt");
        assert_eq!(translator.normalize_target("fra").unwrap(), "fr");
        assert_eq!(translator.normalize_target("zh_Hant").unwrap(), "zh_Hant");
    }

    #[test]
    fn test_unknown_target_rejected() {
        let translator = MadladTranslator::new("google/madlad400-10b-mt");
        assert!(matches!(
            translator.normalize_target("zz"),
            Err(MmdError::UnsupportedLanguageCode { .. })
        ));
    }
}
