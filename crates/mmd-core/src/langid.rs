//! Language identification for raw input text
//!
//! Uses whatlang's trigram classifier. Codes are reported as ISO 639-3, the
//! form SeamlessM4T expects for its `src_lang`, with the ISO 639-1 form kept
//! alongside when one exists.

use crate::errors::MmdError;
use serde::Serialize;
use whatlang::Detector;

/// Result of classifying a piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedLanguage {
    /// ISO 639-3 code, e.g. `eng`
    pub code: String,
    /// ISO 639-1 code when the language has one, e.g. `en`
    pub iso639_1: Option<String>,
    pub confidence: f64,
    pub reliable: bool,
}

impl std::fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (confidence {:.2})", self.code, self.confidence)
    }
}

pub struct LanguageIdentifier {
    detector: Detector,
}

impl LanguageIdentifier {
    pub fn new() -> Self {
        Self {
            detector: Detector::new(),
        }
    }

    /// Classify `text`, failing with `ClassifierError` when no language can be inferred
    pub fn identify(&self, text: &str) -> Result<DetectedLanguage, MmdError> {
        if text.trim().is_empty() {
            return Err(MmdError::ClassifierError(
                "cannot identify the language of empty text".to_string(),
            ));
        }

        let info = self.detector.detect(text).ok_or_else(|| {
            MmdError::ClassifierError(format!(
                "no language could be identified for input of {} characters",
                text.chars().count()
            ))
        })?;

        let code = info.lang().code().to_string();
        let iso639_1 = isolang::Language::from_639_3(&code)
            .and_then(|lang| lang.to_639_1())
            .map(|c| c.to_string());

        let detected = DetectedLanguage {
            code,
            iso639_1,
            confidence: info.confidence(),
            reliable: info.is_reliable(),
        };
        log::debug!("Identified input language: {}", detected);
        if !detected.reliable {
            log::warn!("Language identification is unreliable: {}", detected);
        }

        Ok(detected)
    }
}

impl Default for LanguageIdentifier {
    fn default() -> Self {
        Self::new()
    }
}
