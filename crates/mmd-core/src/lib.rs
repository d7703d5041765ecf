//! Translate free text, summarize the translation and score the summary.
//!
//! Pretrained models do the heavy lifting and are reached through an
//! inference server; this crate wires their parameters, encodes each model
//! family's input, computes the lexical metrics and sequences the calls.
//!
//! # Architecture Overview
//!
//! - **Inference runtime**: seq2seq model seam, HTTP backend and a session-scoped model cache
//! - **Language identification**: trigram classifier for the input text
//! - **Translation**: one strategy per model family (SeamlessM4T, Opus-MT, MADLAD-400) behind a dispatcher
//! - **Summarization**: local model engine or hosted endpoint client
//! - **Evaluation**: ROUGE-1/2/L, BLEU and BERTScore-F1
//! - **Pipeline**: the interaction controller tying the stages together

pub mod config;
pub mod errors;
pub mod evaluation;
pub mod inference;
pub mod langid;
pub mod pipeline;
pub mod summarization;
pub mod translation;

pub use config::*;
pub use errors::MmdError;
pub use evaluation::{Evaluator, MetricName, MetricsReport, TokenEmbedder};
pub use langid::{DetectedLanguage, LanguageIdentifier};
pub use pipeline::{InteractionReport, InteractionRequest, Pipeline, SummaryOutcome, SummaryStats};
pub use summarization::{LengthBounds, Summarizer, Summary};
pub use translation::{ModelSelector, Translation, TranslationDispatcher};

#[cfg(test)]
pub mod test_utils;
