//! Pretrained model abstractions and the inference server integration.
//!
//! Models run out of process on an inference server; this module defines the
//! seq2seq seam the translation and summarization stages call through, an HTTP
//! implementation of it, and the session-scoped cache that decides when a
//! model is (re)loaded.

use crate::errors::MmdError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

pub mod cache;
pub mod http;

pub use cache::ModelCache;
pub use http::{HttpModelLoader, HttpSeq2SeqModel, InferenceEndpoint};

/// Model-specific encoding of one generation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInput {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tgt_lang: Option<String>,
    pub padding: bool,
}

impl ModelInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            src_lang: None,
            tgt_lang: None,
            padding: false,
        }
    }

    pub fn with_src_lang(mut self, src_lang: impl Into<String>) -> Self {
        self.src_lang = Some(src_lang.into());
        self
    }

    pub fn with_tgt_lang(mut self, tgt_lang: impl Into<String>) -> Self {
        self.tgt_lang = Some(tgt_lang.into());
        self
    }

    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }
}

/// Decoding parameters forwarded to `generate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_speech: Option<bool>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            do_sample: false,
            generate_speech: None,
        }
    }
}

impl GenerationParams {
    /// Deterministic decoding bounded by soft length targets
    pub fn bounded(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length: Some(min_length),
            max_length: Some(max_length),
            ..Default::default()
        }
    }

    pub fn text_only() -> Self {
        Self {
            generate_speech: Some(false),
            ..Default::default()
        }
    }
}

/// A loaded sequence-to-sequence model (tokenizer and weights as one unit)
#[async_trait]
pub trait Seq2SeqModel: Send + Sync {
    fn model_id(&self) -> &str;

    /// Run generation and return the first decoded candidate with special tokens removed
    async fn generate(
        &self,
        input: &ModelInput,
        params: &GenerationParams,
    ) -> Result<String, MmdError>;
}

/// Resolves a pretrained model by its repository identifier
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn Seq2SeqModel>, MmdError>;
}
