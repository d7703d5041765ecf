//! Summary scoring: ROUGE-1/2/L, BLEU and BERTScore-F1.
//!
//! Lexical metrics are computed in process. BERTScore needs contextual token
//! embeddings, which come through the [`TokenEmbedder`] seam.

use crate::errors::MmdError;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;
use std::fmt;
use std::sync::Arc;

pub mod bertscore;
pub mod bleu;
pub mod rouge;

pub use bertscore::HttpTokenEmbedder;

/// Produces one embedding row per token of a text, special tokens included
#[async_trait]
pub trait TokenEmbedder: Send + Sync {
    async fn embed_tokens(&self, text: &str) -> Result<Vec<Vec<f32>>, MmdError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    Rouge1,
    Rouge2,
    RougeL,
    Bleu,
    BertScoreF1,
}

impl MetricName {
    pub const ALL: [MetricName; 5] = [
        MetricName::Rouge1,
        MetricName::Rouge2,
        MetricName::RougeL,
        MetricName::Bleu,
        MetricName::BertScoreF1,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricName::Rouge1 => "ROUGE-1",
            MetricName::Rouge2 => "ROUGE-2",
            MetricName::RougeL => "ROUGE-L",
            MetricName::Bleu => "BLEU",
            MetricName::BertScoreF1 => "BERTScore (F1)",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five scores of one summary, always reported in the same order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsReport {
    pub rouge_1: f64,
    pub rouge_2: f64,
    pub rouge_l: f64,
    pub bleu: f64,
    pub bertscore_f1: f64,
}

impl MetricsReport {
    pub fn get(&self, metric: MetricName) -> f64 {
        match metric {
            MetricName::Rouge1 => self.rouge_1,
            MetricName::Rouge2 => self.rouge_2,
            MetricName::RougeL => self.rouge_l,
            MetricName::Bleu => self.bleu,
            MetricName::BertScoreF1 => self.bertscore_f1,
        }
    }

    pub fn entries(&self) -> Vec<(MetricName, f64)> {
        MetricName::ALL.iter().map(|m| (*m, self.get(*m))).collect()
    }
}

// Serialized as an ordered map keyed by metric label
impl Serialize for MetricsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MetricName::ALL.len()))?;
        for (name, value) in self.entries() {
            map.serialize_entry(name.label(), &value)?;
        }
        map.end()
    }
}

pub struct Evaluator {
    embedder: Arc<dyn TokenEmbedder>,
    strip_special_tokens: bool,
}

impl Evaluator {
    pub fn new(embedder: Arc<dyn TokenEmbedder>, strip_special_tokens: bool) -> Self {
        Self {
            embedder,
            strip_special_tokens,
        }
    }

    /// Score `summary` (hypothesis) against `reference`
    pub async fn evaluate(&self, reference: &str, summary: &str) -> Result<MetricsReport, MmdError> {
        let reference_tokens = rouge::tokenize(reference);
        let summary_tokens = rouge::tokenize(summary);
        if reference_tokens.is_empty() {
            return Err(MmdError::EmptyInputError("reference has no words".to_string()));
        }
        if summary_tokens.is_empty() {
            return Err(MmdError::EmptyInputError("summary has no words".to_string()));
        }

        let rouge_1 = rouge::rouge_n_tokens(&reference_tokens, &summary_tokens, 1).f1;
        let rouge_2 = rouge::rouge_n_tokens(&reference_tokens, &summary_tokens, 2).f1;
        let rouge_l = rouge::rouge_l_tokens(&reference_tokens, &summary_tokens).f1;
        let bleu = bleu::sentence_bleu(reference, summary);
        let bertscore_f1 = self.bertscore(reference, summary).await?.f1;

        let report = MetricsReport {
            rouge_1,
            rouge_2,
            rouge_l,
            bleu,
            bertscore_f1,
        };
        log::debug!("Evaluation: {:?}", report);
        Ok(report)
    }

    pub async fn bertscore(&self, reference: &str, summary: &str) -> Result<bertscore::BertScore, MmdError> {
        let mut candidate = self.embedder.embed_tokens(summary).await?;
        let mut reference_rows = self.embedder.embed_tokens(reference).await?;
        if self.strip_special_tokens {
            candidate = bertscore::strip_special_rows(candidate);
            reference_rows = bertscore::strip_special_rows(reference_rows);
        }
        bertscore::score_embeddings(&candidate, &reference_rows)
    }
}
