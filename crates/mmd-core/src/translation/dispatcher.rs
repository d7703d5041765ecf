use crate::config::TranslationConfig;
use crate::errors::MmdError;
use crate::inference::ModelCache;
use crate::langid::LanguageIdentifier;
use crate::translation::{
    MadladTranslator, ModelSelector, OpusMtTranslator, SeamlessTranslator, SourceLanguageUse,
    Translation, TranslationModel,
};
use std::sync::Arc;

/// Routes a translation request to the family picked by a [`ModelSelector`].
///
/// The language identifier runs only for families that declare
/// [`SourceLanguageUse::Required`].
pub struct TranslationDispatcher {
    models: Arc<ModelCache>,
    identifier: LanguageIdentifier,
    strategies: Vec<Box<dyn TranslationModel>>,
}

impl TranslationDispatcher {
    pub fn new(config: &TranslationConfig, models: Arc<ModelCache>) -> Self {
        // Indexed by ModelSelector::index()
        let strategies: Vec<Box<dyn TranslationModel>> = vec![
            Box::new(SeamlessTranslator::new(config.models.seamless.clone())),
            Box::new(OpusMtTranslator::new(config.models.opus_mt.clone())),
            Box::new(MadladTranslator::new(config.models.madlad.clone())),
        ];

        Self {
            models,
            identifier: LanguageIdentifier::new(),
            strategies,
        }
    }

    pub fn strategy(&self, selector: ModelSelector) -> &dyn TranslationModel {
        self.strategies[selector.index()].as_ref()
    }

    pub fn identifier(&self) -> &LanguageIdentifier {
        &self.identifier
    }

    pub async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        selector: ModelSelector,
    ) -> Result<Translation, MmdError> {
        if text.trim().is_empty() {
            return Err(MmdError::EmptyInputError(
                "no text to translate".to_string(),
            ));
        }

        let strategy = self.strategy(selector);
        let source = match strategy.source_language_use() {
            SourceLanguageUse::Required => Some(self.identifier.identify(text)?),
            SourceLanguageUse::Ignored => None,
        };

        log::info!(
            "Translating {} characters to '{}' with {} ({})",
            text.chars().count(),
            target_lang,
            selector,
            strategy.model_id()
        );

        let translated = strategy
            .translate(&self.models, text, target_lang, source.as_ref())
            .await?;

        Ok(Translation {
            text: translated,
            model_id: strategy.model_id().to_string(),
            selector,
            target_language: strategy.normalize_target(target_lang)?,
            source_language: source,
        })
    }

    /// Same as [`translate`](Self::translate) with the selector given as a raw integer
    pub async fn translate_with_index(
        &self,
        text: &str,
        target_lang: &str,
        selector: i64,
    ) -> Result<Translation, MmdError> {
        let selector = ModelSelector::try_from(selector)?;
        self.translate(text, target_lang, selector).await
    }
}
