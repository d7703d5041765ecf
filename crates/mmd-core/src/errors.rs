//! Error types for every stage of the translate → summarize → evaluate pipeline
//!
//! Errors are grouped by the stage that raised them so the controller can decide
//! what a failure means for the current interaction: summarization failures turn
//! into "no summary available", everything else ends the interaction with a
//! message while the session keeps running.

use thiserror::Error;

/// Message carried by [`MmdError::RemoteSummaryUnavailable`].
pub const REMOTE_SUMMARY_UNAVAILABLE: &str = "Error: Unable to get a summary.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MmdError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Language identification failed: {0}")]
    ClassifierError(String),
    #[error("Invalid model selector '{0}': expected 0 (SeamlessM4T), 1 (Opus-MT) or 2 (MADLAD400)")]
    InvalidModelSelector(String),
    #[error("Language code '{code}' is not supported by {model}")]
    UnsupportedLanguageCode { code: String, model: String },
    #[error("Failed to load model '{model}': {message}")]
    ModelLoad { model: String, message: String },
    #[error("Inference request failed: {0}")]
    Inference(String),
    #[error("Summarization failed: {0}")]
    Summarization(String),
    #[error("{}", REMOTE_SUMMARY_UNAVAILABLE)]
    RemoteSummaryUnavailable,
    #[error("Empty input: {0}")]
    EmptyInputError(String),
    #[error("Evaluation failed: {0}")]
    Evaluation(String),
    #[error("Parsing error: {0}")]
    ParsingError(String),
    #[error("I/O error: {0}")]
    IoError(String),
}

impl MmdError {
    /// True for failures that the controller downgrades to "no summary available".
    pub fn is_summarization_failure(&self) -> bool {
        matches!(
            self,
            MmdError::Summarization(_) | MmdError::RemoteSummaryUnavailable
        )
    }
}

impl From<std::io::Error> for MmdError {
    fn from(err: std::io::Error) -> Self {
        MmdError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for MmdError {
    fn from(err: reqwest::Error) -> Self {
        MmdError::Inference(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_sentinel_message_is_preserved() {
        assert_eq!(
            MmdError::RemoteSummaryUnavailable.to_string(),
            "Error: Unable to get a summary."
        );
    }

    #[test]
    fn test_summarization_failures_are_classified() {
        assert!(MmdError::Summarization("boom".into()).is_summarization_failure());
        assert!(MmdError::RemoteSummaryUnavailable.is_summarization_failure());
        assert!(!MmdError::Inference("boom".into()).is_summarization_failure());
        assert!(!MmdError::ClassifierError("boom".into()).is_summarization_failure());
    }

    #[test]
    fn test_unsupported_language_message() {
        let err = MmdError::UnsupportedLanguageCode {
            code: "xx".to_string(),
            model: "Opus-MT".to_string(),
        };
        assert_eq!(err.to_string(), "Language code 'xx' is not supported by Opus-MT");
    }
}
