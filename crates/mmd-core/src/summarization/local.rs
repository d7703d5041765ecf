use crate::config::SummarizationConfig;
use crate::errors::MmdError;
use crate::inference::{GenerationParams, ModelCache, ModelInput};
use crate::summarization::{
    truncate_words, word_count, LengthBounds, Summarizer, Summary, Truncation, TRUNCATION_NOTICE,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Runs a pretrained seq2seq summarization model through the model cache.
///
/// Input longer than `max_input_words` is cut to exactly that many words.
/// Decoding is deterministic and the length bounds are forwarded as the
/// model's `min_length`/`max_length`; the output is never edited.
pub struct LocalSummarizer {
    models: Arc<ModelCache>,
    model_id: String,
    max_input_words: usize,
}

impl LocalSummarizer {
    pub fn new(models: Arc<ModelCache>, model_id: impl Into<String>, max_input_words: usize) -> Self {
        Self {
            models,
            model_id: model_id.into(),
            max_input_words,
        }
    }

    pub fn from_config(config: &SummarizationConfig, models: Arc<ModelCache>) -> Self {
        Self::new(models, config.model.clone(), config.max_input_words)
    }

    async fn generate(&self, text: &str, bounds: LengthBounds) -> Result<String, MmdError> {
        let model = self.models.get_or_load(&self.model_id).await?;
        let params = GenerationParams::bounded(bounds.min_len, bounds.max_len);
        model.generate(&ModelInput::new(text), &params).await
    }
}

#[async_trait]
impl Summarizer for LocalSummarizer {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<Summary, MmdError> {
        let original_words = word_count(text);
        let (input, truncation) = match truncate_words(text, self.max_input_words) {
            Some(truncated) => {
                log::warn!(
                    "{} ({} words, kept {})",
                    TRUNCATION_NOTICE,
                    original_words,
                    self.max_input_words
                );
                let truncation = Truncation {
                    original_words,
                    kept_words: self.max_input_words,
                    notice: TRUNCATION_NOTICE.to_string(),
                };
                (truncated, Some(truncation))
            }
            None => (text.to_string(), None),
        };

        let output = self.generate(&input, bounds).await.map_err(|e| {
            log::error!("Summarization with '{}' failed: {}", self.model_id, e);
            match e {
                MmdError::Summarization(_) => e,
                other => MmdError::Summarization(other.to_string()),
            }
        })?;

        let text = output.trim().to_string();
        if text.is_empty() {
            return Err(MmdError::Summarization(format!(
                "'{}' returned an empty summary",
                self.model_id
            )));
        }

        let summary_words = word_count(&text);
        if !bounds.within_tolerance(summary_words) {
            log::warn!(
                "Summary has {} words, outside the requested {}..={}",
                summary_words,
                bounds.min_len,
                bounds.max_len
            );
        }

        Ok(Summary {
            text,
            model_id: self.model_id.clone(),
            truncation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fakes::FakeLoader;

    fn summarizer(loader: Arc<FakeLoader>) -> LocalSummarizer {
        let cache = Arc::new(ModelCache::new(loader));
        LocalSummarizer::from_config(&SummarizationConfig::default(), cache)
    }

    #[tokio::test]
    async fn test_bounds_are_forwarded_as_generation_params() {
        let loader = Arc::new(FakeLoader::fixed("A short summary."));
        let summarizer = summarizer(loader.clone());

        let summary = summarizer
            .summarize("Some long article text.", LengthBounds::new(5, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(summary.text, "A short summary.");
        assert_eq!(summary.model_id, "sshleifer/distilbart-cnn-12-6");
        assert!(!summary.was_truncated());

        let calls = loader.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].params.min_length, Some(5));
        assert_eq!(calls[0].params.max_length, Some(10));
        assert!(!calls[0].params.do_sample);
        assert_eq!(calls[0].input.text, "Some long article text.");
    }

    #[tokio::test]
    async fn test_long_input_truncated_to_exactly_max_words() {
        let loader = Arc::new(FakeLoader::fixed("Summary."));
        let summarizer = summarizer(loader.clone());
        let text = (0..1500).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");

        let summary = summarizer
            .summarize(&text, LengthBounds::default())
            .await
            .unwrap();

        let calls = loader.calls();
        let sent = &calls[0].input.text;
        assert_eq!(word_count(sent), 1024);
        assert!(sent.ends_with("w1023"));

        let truncation = summary.truncation.unwrap();
        assert_eq!(truncation.notice, "Input text was too long and has been truncated.");
        assert_eq!(truncation.original_words, 1500);
        assert_eq!(truncation.kept_words, 1024);
    }

    #[tokio::test]
    async fn test_exactly_max_words_is_not_truncated() {
        let loader = Arc::new(FakeLoader::fixed("Summary."));
        let summarizer = summarizer(loader.clone());
        let text = vec!["word"; 1024].join(" ");

        let summary = summarizer.summarize(&text, LengthBounds::default()).await.unwrap();
        assert!(summary.truncation.is_none());
        assert_eq!(loader.calls()[0].input.text, text);
    }

    #[tokio::test]
    async fn test_model_failures_become_summarization_errors() {
        let failing_model = summarizer(Arc::new(FakeLoader::failing_generation("CUDA out of memory")));
        let err = failing_model
            .summarize("Some text.", LengthBounds::default())
            .await
            .unwrap_err();
        assert!(err.is_summarization_failure());

        let missing_model = summarizer(Arc::new(FakeLoader::failing("not found")));
        let err = missing_model
            .summarize("Some text.", LengthBounds::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MmdError::Summarization(_)));
    }
}
