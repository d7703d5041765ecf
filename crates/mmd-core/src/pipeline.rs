//! One session of the translate → summarize → evaluate flow.
//!
//! [`Pipeline`] owns the model cache for the session, so every model is
//! loaded at most once while it lives (unless caching is disabled) and all of
//! them are released when it is dropped. The step methods let a terminal
//! display each stage as soon as it completes; [`Pipeline::run`] chains them
//! for non-interactive use.

use crate::config::MmdConfig;
use crate::errors::MmdError;
use crate::evaluation::{Evaluator, HttpTokenEmbedder, MetricsReport, TokenEmbedder};
use crate::inference::{HttpModelLoader, ModelCache, ModelLoader};
use crate::summarization::{self, word_count, LengthBounds, Summarizer, Summary};
use crate::translation::{ModelSelector, Translation, TranslationDispatcher};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to translate and summarize.";
pub const SUMMARIZATION_FAILED_MESSAGE: &str = "An error occurred during summarization.";

/// Word counts of the original input and its summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub original_words: usize,
    pub summary_words: usize,
    /// `summary_words / original_words`
    pub compression_ratio: f64,
}

impl SummaryStats {
    pub fn compute(original: &str, summary: &str) -> Self {
        let original_words = word_count(original);
        let summary_words = word_count(summary);
        let compression_ratio = if original_words == 0 {
            0.0
        } else {
            summary_words as f64 / original_words as f64
        };
        Self {
            original_words,
            summary_words,
            compression_ratio,
        }
    }
}

/// Result of the summarization step. A failed summarization does not end
/// the interaction; it only means there is nothing to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Summarized(Summary),
    Unavailable { message: String },
}

impl SummaryOutcome {
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            SummaryOutcome::Summarized(summary) => Some(summary),
            SummaryOutcome::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionRequest {
    pub text: String,
    pub target_language: String,
    pub selector: ModelSelector,
    pub bounds: LengthBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionStatus {
    Completed,
    EmptyInput,
    SummaryUnavailable,
    /// Translation and summary are kept; scoring did not complete
    EvaluationFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionReport {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub status: InteractionStatus,
    pub translation: Option<Translation>,
    pub summary: Option<Summary>,
    pub stats: Option<SummaryStats>,
    pub metrics: Option<MetricsReport>,
    /// User-facing messages raised along the way
    pub notices: Vec<String>,
}

impl InteractionReport {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            status: InteractionStatus::Completed,
            translation: None,
            summary: None,
            stats: None,
            metrics: None,
            notices: Vec::new(),
        }
    }
}

impl Default for InteractionReport {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Pipeline {
    models: Arc<ModelCache>,
    dispatcher: TranslationDispatcher,
    summarizer: Arc<dyn Summarizer>,
    evaluator: Evaluator,
}

impl Pipeline {
    pub fn new(
        models: Arc<ModelCache>,
        dispatcher: TranslationDispatcher,
        summarizer: Arc<dyn Summarizer>,
        evaluator: Evaluator,
    ) -> Self {
        Self {
            models,
            dispatcher,
            summarizer,
            evaluator,
        }
    }

    /// Build a session against the inference server described by `config`
    pub fn from_config(config: &MmdConfig) -> Result<Self, MmdError> {
        config.validate()?;
        let loader = Arc::new(HttpModelLoader::from_config(&config.inference)?);
        let embedder = Arc::new(HttpTokenEmbedder::from_config(&config.evaluation.bertscore)?);
        Self::with_components(config, loader, embedder)
    }

    /// Build a session with caller-supplied model and embedding backends
    pub fn with_components(
        config: &MmdConfig,
        loader: Arc<dyn ModelLoader>,
        embedder: Arc<dyn TokenEmbedder>,
    ) -> Result<Self, MmdError> {
        let models = Arc::new(ModelCache::with_caching(loader, config.inference.cache_models));
        let dispatcher = TranslationDispatcher::new(&config.translation, models.clone());
        let summarizer = summarization::from_config(&config.summarization, models.clone())?;
        let evaluator = Evaluator::new(embedder, config.evaluation.bertscore.strip_special_tokens);
        Ok(Self::new(models, dispatcher, summarizer, evaluator))
    }

    pub fn models(&self) -> &ModelCache {
        &self.models
    }

    pub fn summarizer(&self) -> &dyn Summarizer {
        self.summarizer.as_ref()
    }

    pub async fn translate_step(
        &self,
        text: &str,
        target_language: &str,
        selector: ModelSelector,
    ) -> Result<Translation, MmdError> {
        self.dispatcher.translate(text, target_language, selector).await
    }

    pub async fn summarize_step(
        &self,
        text: &str,
        bounds: LengthBounds,
    ) -> Result<SummaryOutcome, MmdError> {
        match self.summarizer.summarize(text, bounds).await {
            Ok(summary) => Ok(SummaryOutcome::Summarized(summary)),
            Err(MmdError::RemoteSummaryUnavailable) => Ok(SummaryOutcome::Unavailable {
                message: MmdError::RemoteSummaryUnavailable.to_string(),
            }),
            Err(e) if e.is_summarization_failure() => {
                log::warn!("No summary available: {}", e);
                Ok(SummaryOutcome::Unavailable {
                    message: SUMMARIZATION_FAILED_MESSAGE.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Score `summary` against the original, untranslated input
    pub async fn evaluate_step(
        &self,
        original: &str,
        summary: &str,
    ) -> Result<(SummaryStats, MetricsReport), MmdError> {
        let stats = SummaryStats::compute(original, summary);
        let metrics = self.evaluator.evaluate(original, summary).await?;
        Ok((stats, metrics))
    }

    /// Run one full interaction
    pub async fn run(&self, request: &InteractionRequest) -> Result<InteractionReport, MmdError> {
        let mut report = InteractionReport::new();

        if request.text.trim().is_empty() {
            log::info!("[{}] Empty input, nothing to do", report.id);
            report.status = InteractionStatus::EmptyInput;
            report.notices.push(EMPTY_INPUT_MESSAGE.to_string());
            return Ok(report);
        }

        log::info!(
            "[{}] Starting interaction: {} words, target '{}', model {}",
            report.id,
            word_count(&request.text),
            request.target_language,
            request.selector
        );

        let translation = self
            .translate_step(&request.text, &request.target_language, request.selector)
            .await
            .map_err(|e| {
                log::error!("[{}] Translation failed: {}", report.id, e);
                e
            })?;

        let outcome = self.summarize_step(&translation.text, request.bounds).await?;
        report.translation = Some(translation);

        let summary = match outcome {
            SummaryOutcome::Summarized(summary) => summary,
            SummaryOutcome::Unavailable { message } => {
                report.status = InteractionStatus::SummaryUnavailable;
                report.notices.push(message);
                log::info!("[{}] Finished without a summary", report.id);
                return Ok(report);
            }
        };

        if let Some(truncation) = &summary.truncation {
            report.notices.push(truncation.notice.clone());
        }

        let stats = SummaryStats::compute(&request.text, &summary.text);
        report.stats = Some(stats);
        let evaluation = self.evaluator.evaluate(&request.text, &summary.text).await;
        report.summary = Some(summary);

        match evaluation {
            Ok(metrics) => {
                log::info!(
                    "[{}] Finished: compression {:.2}, ROUGE-1 {:.4}, BERTScore (F1) {:.4}",
                    report.id,
                    stats.compression_ratio,
                    metrics.rouge_1,
                    metrics.bertscore_f1
                );
                report.metrics = Some(metrics);
            }
            Err(e) => {
                log::error!("[{}] Evaluation failed: {}", report.id, e);
                report.status = InteractionStatus::EvaluationFailed;
                report.notices.push(e.to_string());
            }
        }
        Ok(report)
    }
}
