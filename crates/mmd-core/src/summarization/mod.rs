//! Summarization backends.
//!
//! Two interchangeable [`Summarizer`] implementations: a local engine that runs
//! a seq2seq summarization model through the shared [`ModelCache`], and a
//! remote client that posts raw text to a hosted inference endpoint.

use crate::config::{SummarizationConfig, SummarizerBackend};
use crate::errors::MmdError;
use crate::inference::ModelCache;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

pub mod local;
pub mod remote;

pub use local::LocalSummarizer;
pub use remote::RemoteSummarizer;

/// User-visible notice attached to a summary whose input was cut
pub const TRUNCATION_NOTICE: &str = "Input text was too long and has been truncated.";

/// Produced summaries outside `[min - tolerance, max + tolerance]` words are logged
pub const LENGTH_TOLERANCE_WORDS: usize = 10;

/// Soft length targets for a summary, in words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthBounds {
    pub min_len: usize,
    pub max_len: usize,
}

impl LengthBounds {
    pub fn new(min_len: usize, max_len: usize) -> Result<Self, MmdError> {
        if min_len > max_len {
            return Err(MmdError::ConfigError(format!(
                "Minimum summary length ({}) cannot exceed maximum length ({})",
                min_len, max_len
            )));
        }
        Ok(Self { min_len, max_len })
    }

    pub fn from_config(config: &SummarizationConfig) -> Result<Self, MmdError> {
        Self::new(config.min_length, config.max_length)
    }

    /// Whether `words` is within the bounds widened by [`LENGTH_TOLERANCE_WORDS`]
    pub fn within_tolerance(&self, words: usize) -> bool {
        words.saturating_add(LENGTH_TOLERANCE_WORDS) >= self.min_len
            && words <= self.max_len.saturating_add(LENGTH_TOLERANCE_WORDS)
    }
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self {
            min_len: 25,
            max_len: 50,
        }
    }
}

/// Truncation applied to the summarizer input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Truncation {
    pub original_words: usize,
    pub kept_words: usize,
    pub notice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub text: String,
    pub model_id: String,
    pub truncation: Option<Truncation>,
}

impl Summary {
    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }

    pub fn was_truncated(&self) -> bool {
        self.truncation.is_some()
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Identifier of the model (or endpoint) producing summaries
    fn model_id(&self) -> &str;

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<Summary, MmdError>;
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep at most `max_words` whitespace-separated words, joined by single spaces.
///
/// Returns `None` when the text already fits.
pub fn truncate_words(text: &str, max_words: usize) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return None;
    }
    Some(words[..max_words].join(" "))
}

/// Build the backend selected by `config.backend`
pub fn from_config(
    config: &SummarizationConfig,
    models: Arc<ModelCache>,
) -> Result<Arc<dyn Summarizer>, MmdError> {
    let summarizer: Arc<dyn Summarizer> = match config.backend {
        SummarizerBackend::Local => Arc::new(LocalSummarizer::from_config(config, models)),
        SummarizerBackend::Remote => Arc::new(RemoteSummarizer::from_config(&config.remote)?),
    };
    log::info!(
        "Using {:?} summarizer ({})",
        config.backend,
        summarizer.model_id()
    );
    Ok(summarizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fakes::FakeLoader;

    #[test]
    fn test_bounds_reject_inverted_range() {
        assert!(LengthBounds::new(10, 5).is_err());
        assert_eq!(LengthBounds::new(5, 5).unwrap().max_len, 5);
    }

    #[test]
    fn test_tolerance_window() {
        let bounds = LengthBounds::new(25, 50).unwrap();
        assert!(bounds.within_tolerance(15));
        assert!(bounds.within_tolerance(60));
        assert!(!bounds.within_tolerance(14));
        assert!(!bounds.within_tolerance(61));
    }

    #[test]
    fn test_tolerance_window_at_extremes() {
        let unbounded = LengthBounds::new(0, usize::MAX).unwrap();
        assert!(unbounded.within_tolerance(5));
        assert!(unbounded.within_tolerance(usize::MAX));

        let huge_min = LengthBounds::new(usize::MAX, usize::MAX).unwrap();
        assert!(huge_min.within_tolerance(usize::MAX - 3));
        assert!(!huge_min.within_tolerance(5));
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("a b c", 5), None);
        assert_eq!(truncate_words("a  b\n c d", 2).as_deref(), Some("a b"));
        assert_eq!(word_count("  one two\tthree \n"), 3);
    }

    #[test]
    fn test_factory_selects_backend() {
        let models = Arc::new(ModelCache::new(Arc::new(FakeLoader::echo())));

        let local = from_config(&SummarizationConfig::default(), models.clone()).unwrap();
        assert_eq!(local.model_id(), "sshleifer/distilbart-cnn-12-6");

        let remote_config = SummarizationConfig {
            backend: SummarizerBackend::Remote,
            ..Default::default()
        };
        let remote = from_config(&remote_config, models).unwrap();
        assert_eq!(
            remote.model_id(),
            "https://api-inference.huggingface.co/models/facebook/bart-large-cnn"
        );
    }
}
