use crate::config::BertScoreConfig;
use crate::errors::MmdError;
use crate::evaluation::TokenEmbedder;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BertScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Mean over `from` of each token's best cosine match in `to`
fn greedy_match(from: &[Vec<f32>], to: &[Vec<f32>]) -> f64 {
    let total: f64 = from
        .iter()
        .map(|a| {
            to.iter()
                .map(|b| cosine_similarity(a, b) as f64)
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .sum();
    total / from.len() as f64
}

/// Greedy-matching BERTScore between the token embeddings of a candidate and a reference.
///
/// Precision averages over candidate tokens, recall over reference tokens.
pub fn score_embeddings(
    candidate: &[Vec<f32>],
    reference: &[Vec<f32>],
) -> Result<BertScore, MmdError> {
    if candidate.is_empty() || reference.is_empty() {
        return Err(MmdError::EmptyInputError(
            "BERTScore needs at least one token on each side".to_string(),
        ));
    }

    let precision = greedy_match(candidate, reference);
    let recall = greedy_match(reference, candidate);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Ok(BertScore {
        precision,
        recall,
        f1,
    })
}

/// Drop the leading and trailing special-token rows (`<s>`, `</s>`)
pub fn strip_special_rows(mut rows: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
    if rows.len() < 2 {
        return Vec::new();
    }
    rows.pop();
    rows.remove(0);
    rows
}

/// Token embeddings from a feature-extraction pipeline on the inference server
pub struct HttpTokenEmbedder {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpTokenEmbedder {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, MmdError> {
        let model = model.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MmdError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: format!(
                "{}/pipeline/feature-extraction/{}",
                base_url.trim_end_matches('/'),
                model
            ),
            model,
            api_key,
        })
    }

    pub fn from_config(config: &BertScoreConfig) -> Result<Self, MmdError> {
        Self::new(
            &config.base_url,
            config.model.clone(),
            config.auth.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Accept `[tokens][dim]` or a batch of one, `[1][tokens][dim]`
fn parse_token_embeddings(body: Value) -> Result<Vec<Vec<f32>>, MmdError> {
    if let Some(error) = body.get("error") {
        return Err(MmdError::Evaluation(format!("Embedding server error: {}", error)));
    }

    if let Ok(mut batch) = serde_json::from_value::<Vec<Vec<Vec<f32>>>>(body.clone()) {
        if batch.len() != 1 {
            return Err(MmdError::ParsingError(format!(
                "Expected embeddings for one text, got {}",
                batch.len()
            )));
        }
        return Ok(batch.remove(0));
    }

    serde_json::from_value::<Vec<Vec<f32>>>(body)
        .map_err(|e| MmdError::ParsingError(format!("Unexpected embedding response shape: {}", e)))
}

#[async_trait]
impl TokenEmbedder for HttpTokenEmbedder {
    async fn embed_tokens(&self, text: &str) -> Result<Vec<Vec<f32>>, MmdError> {
        let payload = json!({
            "inputs": text,
            "options": {
                "wait_for_model": true
            }
        });

        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request
            .json(&payload)
            .send()
            .await
            .map_err(|e| MmdError::Evaluation(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MmdError::Evaluation(format!(
                "Embedding server returned {}: {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MmdError::ParsingError(format!("Failed to parse embedding response: {}", e)))?;

        let rows = parse_token_embeddings(body)?;
        log::debug!("Embedded {} tokens with '{}'", rows.len(), self.model);
        Ok(rows)
    }
}
