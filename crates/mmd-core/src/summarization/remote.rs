use crate::config::RemoteSummarizationConfig;
use crate::errors::MmdError;
use crate::summarization::{LengthBounds, Summarizer, Summary};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Client for a hosted summarization endpoint.
///
/// Sends the raw text with the length bounds in one POST. Anything other than
/// a non-empty array whose first element carries `summary_text` is reported
/// as [`MmdError::RemoteSummaryUnavailable`].
pub struct RemoteSummarizer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteSummarizer {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self, MmdError> {
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(MmdError::ConfigError(
                "Remote summarization endpoint cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| MmdError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn from_config(config: &RemoteSummarizationConfig) -> Result<Self, MmdError> {
        Self::new(config.endpoint.clone(), config.auth.api_key.clone())
    }

    fn build_request_body(text: &str, bounds: LengthBounds) -> Value {
        json!({
            "inputs": text,
            "parameters": {
                "min_length": bounds.min_len,
                "max_length": bounds.max_len
            }
        })
    }
}

fn extract_summary_text(response: &Value) -> Option<String> {
    response
        .as_array()?
        .first()?
        .get("summary_text")?
        .as_str()
        .map(|s| s.to_string())
}

#[async_trait]
impl Summarizer for RemoteSummarizer {
    fn model_id(&self) -> &str {
        &self.endpoint
    }

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<Summary, MmdError> {
        let body = Self::build_request_body(text, bounds);
        log::debug!("Remote summarization request to {}", self.endpoint);

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            log::error!("Remote summarization request failed: {}", e);
            MmdError::RemoteSummaryUnavailable
        })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            log::error!("Failed to read remote summarization response: {}", e);
            MmdError::RemoteSummaryUnavailable
        })?;
        log::debug!("Remote summarization response ({}): {}", status, response_text);

        let parsed: Value = serde_json::from_str(&response_text).unwrap_or(Value::Null);
        match extract_summary_text(&parsed) {
            Some(summary) => Ok(Summary {
                text: summary,
                model_id: self.endpoint.clone(),
                truncation: None,
            }),
            None => {
                log::warn!(
                    "Remote summarization returned no summary (status {}): {}",
                    status,
                    response_text
                );
                Err(MmdError::RemoteSummaryUnavailable)
            }
        }
    }
}
