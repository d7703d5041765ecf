//! Configuration type definitions for the translate/summarize/evaluate pipeline
//!
//! Every section is optional in YAML; a missing file or section falls back to the
//! defaults below, which point at the hosted Hugging Face inference API and the
//! model identifiers the tool was built around.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::errors::MmdError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MmdConfig {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub summarization: SummarizationConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API key resolution for a single endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiAuth {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,
}

/// Inference server that hosts the translation and summarization models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub auth: ApiAuth,
    #[serde(default = "default_inference_timeout")]
    pub timeout_seconds: u64,
    /// Keep loaded models for the whole session instead of reloading per call
    #[serde(default = "default_true")]
    pub cache_models: bool,
    /// Ask the server whether a model is available before the first generation
    #[serde(default)]
    pub probe_on_load: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_target_language")]
    pub default_target_language: String,
    #[serde(default)]
    pub default_model: u8,
    #[serde(default)]
    pub models: TranslationModels,
}

/// Model identifiers for the three supported translation families
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationModels {
    #[serde(default = "default_seamless_model")]
    pub seamless: String,
    #[serde(default = "default_opus_mt_model")]
    pub opus_mt: String,
    #[serde(default = "default_madlad_model")]
    pub madlad: String,
}

/// Which summarizer the controller talks to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerBackend {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationConfig {
    #[serde(default)]
    pub backend: SummarizerBackend,
    #[serde(default = "default_summarization_model")]
    pub model: String,
    #[serde(default = "default_max_input_words")]
    pub max_input_words: usize,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default)]
    pub remote: RemoteSummarizationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSummarizationConfig {
    #[serde(default = "default_remote_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub auth: ApiAuth,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub bertscore: BertScoreConfig,
}

/// Contextual embedding model used for BERTScore
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BertScoreConfig {
    #[serde(default = "default_bertscore_model")]
    pub model: String,
    #[serde(default = "default_inference_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub auth: ApiAuth,
    #[serde(default = "default_embedding_timeout")]
    pub timeout_seconds: u64,
    /// Drop the leading and trailing special-token rows before matching
    #[serde(default = "default_true")]
    pub strip_special_tokens: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_api_key_env() -> Option<String> { Some("HF_API_TOKEN".to_string()) }
fn default_inference_base_url() -> String { "https://api-inference.huggingface.co".to_string() }
fn default_inference_timeout() -> u64 { 120 }
fn default_embedding_timeout() -> u64 { 60 }
fn default_true() -> bool { true }
fn default_target_language() -> String { "fra".to_string() }
fn default_seamless_model() -> String { "facebook/hf-seamless-m4t-medium".to_string() }
fn default_opus_mt_model() -> String { "Helsinki-NLP/opus-mt-en-roa".to_string() }
fn default_madlad_model() -> String { "google/madlad400-10b-mt".to_string() }
fn default_summarization_model() -> String { "sshleifer/distilbart-cnn-12-6".to_string() }
fn default_max_input_words() -> usize { 1024 }
fn default_min_length() -> usize { 25 }
fn default_max_length() -> usize { 50 }
fn default_remote_endpoint() -> String {
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn".to_string()
}
fn default_bertscore_model() -> String { "roberta-large".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ApiAuth {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

impl ApiAuth {
    /// Auth with a literal key and no environment lookup
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_key_env: None,
        }
    }

    /// Auth that never sends a bearer token
    pub fn anonymous() -> Self {
        Self {
            api_key: None,
            api_key_env: None,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_base_url(),
            auth: ApiAuth::default(),
            timeout_seconds: default_inference_timeout(),
            cache_models: true,
            probe_on_load: false,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            default_target_language: default_target_language(),
            default_model: 0,
            models: TranslationModels::default(),
        }
    }
}

impl Default for TranslationModels {
    fn default() -> Self {
        Self {
            seamless: default_seamless_model(),
            opus_mt: default_opus_mt_model(),
            madlad: default_madlad_model(),
        }
    }
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            backend: SummarizerBackend::Local,
            model: default_summarization_model(),
            max_input_words: default_max_input_words(),
            min_length: default_min_length(),
            max_length: default_max_length(),
            remote: RemoteSummarizationConfig::default(),
        }
    }
}

impl Default for RemoteSummarizationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_remote_endpoint(),
            auth: ApiAuth::default(),
        }
    }
}

impl Default for BertScoreConfig {
    fn default() -> Self {
        Self {
            model: default_bertscore_model(),
            base_url: default_inference_base_url(),
            auth: ApiAuth::default(),
            timeout_seconds: default_embedding_timeout(),
            strip_special_tokens: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl MmdConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), MmdError> {
        if self.inference.base_url.is_empty() {
            return Err(MmdError::ConfigError("Inference base_url cannot be empty".to_string()));
        }

        if self.inference.timeout_seconds == 0 {
            return Err(MmdError::ConfigError("Inference timeout_seconds must be greater than 0".to_string()));
        }

        let models = &self.translation.models;
        for (family, model) in [
            ("seamless", &models.seamless),
            ("opus_mt", &models.opus_mt),
            ("madlad", &models.madlad),
        ] {
            if model.is_empty() {
                return Err(MmdError::ConfigError(format!(
                    "Translation model for '{}' cannot be empty",
                    family
                )));
            }
        }

        if self.translation.default_model > 2 {
            return Err(MmdError::ConfigError(format!(
                "translation.default_model must be 0, 1 or 2 (got {})",
                self.translation.default_model
            )));
        }

        let summarization = &self.summarization;
        if summarization.model.is_empty() {
            return Err(MmdError::ConfigError("Summarization model cannot be empty".to_string()));
        }

        if summarization.max_input_words == 0 {
            return Err(MmdError::ConfigError("summarization.max_input_words must be greater than 0".to_string()));
        }

        if summarization.min_length > summarization.max_length {
            return Err(MmdError::ConfigError(format!(
                "summarization.min_length ({}) cannot exceed max_length ({})",
                summarization.min_length, summarization.max_length
            )));
        }

        if summarization.backend == SummarizerBackend::Remote && summarization.remote.endpoint.is_empty() {
            return Err(MmdError::ConfigError("Remote summarization endpoint cannot be empty".to_string()));
        }

        let bertscore = &self.evaluation.bertscore;
        if bertscore.model.is_empty() || bertscore.base_url.is_empty() {
            return Err(MmdError::ConfigError("BERTScore model and base_url cannot be empty".to_string()));
        }

        Ok(())
    }
}
