//! Integration tests for the interaction pipeline
//!
//! Model and embedding backends are replaced with in-process implementations
//! of the public traits, so these tests exercise the crate exactly as an
//! embedding application would.

use async_trait::async_trait;
use mmd_core::inference::{GenerationParams, ModelInput, ModelLoader, Seq2SeqModel};
use mmd_core::pipeline::{InteractionStatus, EMPTY_INPUT_MESSAGE};
use mmd_core::{
    InteractionRequest, LengthBounds, MmdConfig, MmdError, ModelSelector, Pipeline, TokenEmbedder,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Returns the first `max_length` words of the input, or the input unchanged
struct PrefixModel {
    id: String,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Seq2SeqModel for PrefixModel {
    fn model_id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, input: &ModelInput, params: &GenerationParams) -> Result<String, MmdError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let words: Vec<&str> = input.text.split_whitespace().collect();
        let keep = params.max_length.unwrap_or(words.len()).min(words.len());
        Ok(words[..keep].join(" "))
    }
}

#[derive(Default)]
struct PrefixLoader {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ModelLoader for PrefixLoader {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn Seq2SeqModel>, MmdError> {
        Ok(Arc::new(PrefixModel {
            id: model_id.to_string(),
            calls: self.calls.clone(),
        }))
    }
}

/// One-hot rows by character sum, framed by two special rows
struct CharSumEmbedder;

#[async_trait]
impl TokenEmbedder for CharSumEmbedder {
    async fn embed_tokens(&self, text: &str) -> Result<Vec<Vec<f32>>, MmdError> {
        let dim = 64;
        let mut rows = vec![vec![1.0; dim]];
        for word in text.split_whitespace() {
            let mut row = vec![0.0; dim];
            let slot = word.to_lowercase().chars().map(|c| c as usize).sum::<usize>() % dim;
            row[slot] = 1.0;
            rows.push(row);
        }
        rows.push(vec![1.0; dim]);
        Ok(rows)
    }
}

fn pipeline(loader: Arc<PrefixLoader>) -> Pipeline {
    Pipeline::with_components(&MmdConfig::default(), loader, Arc::new(CharSumEmbedder)).unwrap()
}

const ARTICLE: &str = "Scientists have discovered a new species of frog in the rainforest. \
    The frog is bright green and only a few centimetres long. \
    Researchers say the discovery shows how much remains unknown about the region.";

#[tokio::test]
async fn test_interaction_produces_all_five_metrics() {
    let loader = Arc::new(PrefixLoader::default());
    let pipeline = pipeline(loader.clone());

    let report = pipeline
        .run(&InteractionRequest {
            text: ARTICLE.to_string(),
            target_language: "fr".to_string(),
            selector: ModelSelector::Madlad,
            bounds: LengthBounds::new(5, 10).unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(report.status, InteractionStatus::Completed);
    let summary = report.summary.unwrap();
    assert_eq!(summary.word_count(), 10);

    let stats = report.stats.unwrap();
    assert_eq!(stats.summary_words, 10);
    assert_eq!(stats.original_words, ARTICLE.split_whitespace().count());

    let metrics = report.metrics.unwrap();
    assert_eq!(metrics.entries().len(), 5);
    // The summary is a prefix of the original, so every unigram matches
    assert!(metrics.rouge_1 > 0.0);
    assert!(metrics.rouge_l > 0.0);
    assert!(metrics.bertscore_f1 > 0.0 && metrics.bertscore_f1 <= 1.0 + 1e-6);

    assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_input_short_circuits() {
    let loader = Arc::new(PrefixLoader::default());
    let pipeline = pipeline(loader.clone());

    let report = pipeline
        .run(&InteractionRequest {
            text: "  ".to_string(),
            target_language: "fra".to_string(),
            selector: ModelSelector::Seamless,
            bounds: LengthBounds::default(),
        })
        .await
        .unwrap();

    assert_eq!(report.status, InteractionStatus::EmptyInput);
    assert_eq!(report.notices, vec![EMPTY_INPUT_MESSAGE.to_string()]);
    assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_steps_can_be_driven_individually() {
    let pipeline = pipeline(Arc::new(PrefixLoader::default()));

    let translation = pipeline
        .translate_step(ARTICLE, "fra", ModelSelector::Seamless)
        .await
        .unwrap();
    assert_eq!(translation.source_language.as_ref().unwrap().code, "eng");

    let outcome = pipeline
        .summarize_step(&translation.text, LengthBounds::new(5, 8).unwrap())
        .await
        .unwrap();
    let summary = outcome.summary().unwrap();
    assert_eq!(summary.word_count(), 8);

    let (stats, _) = pipeline.evaluate_step(ARTICLE, &summary.text).await.unwrap();
    assert!(stats.compression_ratio < 1.0);
}

#[tokio::test]
async fn test_invalid_selector_is_reported() {
    let err = ModelSelector::try_from(5).unwrap_err();
    assert_eq!(err, MmdError::InvalidModelSelector("5".to_string()));
}
