use crate::config::InferenceConfig;
use crate::errors::MmdError;
use crate::inference::{GenerationParams, ModelInput, ModelLoader, Seq2SeqModel};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Output fields the inference server may use for a generated sequence
const OUTPUT_FIELDS: [&str; 3] = ["generated_text", "translation_text", "summary_text"];

/// Connection settings shared by every model served from one inference server
#[derive(Debug, Clone)]
pub struct InferenceEndpoint {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl InferenceEndpoint {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self, MmdError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MmdError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self, MmdError> {
        Self::new(
            config.base_url.clone(),
            config.auth.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn model_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.base_url, model_id)
    }

    fn status_url(&self, model_id: &str) -> String {
        format!("{}/status/{}", self.base_url, model_id)
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }
}

/// A model served by the inference server, addressed by its repository id
#[derive(Debug, Clone)]
pub struct HttpSeq2SeqModel {
    endpoint: InferenceEndpoint,
    model_id: String,
}

impl HttpSeq2SeqModel {
    pub fn new(endpoint: InferenceEndpoint, model_id: impl Into<String>) -> Self {
        Self {
            endpoint,
            model_id: model_id.into(),
        }
    }

    fn build_request_body(&self, input: &ModelInput, params: &GenerationParams) -> Value {
        let mut parameters = json!({
            "do_sample": params.do_sample,
            "padding": input.padding,
            "skip_special_tokens": true,
        });

        if let Some(src_lang) = &input.src_lang {
            parameters["src_lang"] = json!(src_lang);
        }
        if let Some(tgt_lang) = &input.tgt_lang {
            parameters["tgt_lang"] = json!(tgt_lang);
        }
        if let Some(min_length) = params.min_length {
            parameters["min_length"] = json!(min_length);
        }
        if let Some(max_length) = params.max_length {
            parameters["max_length"] = json!(max_length);
        }
        if let Some(generate_speech) = params.generate_speech {
            parameters["generate_speech"] = json!(generate_speech);
        }

        json!({
            "inputs": input.text,
            "parameters": parameters,
            "options": {
                "wait_for_model": true
            }
        })
    }
}

/// Extract the first generated sequence from an inference server response
pub(crate) fn parse_generation_response(response: &Value) -> Result<String, MmdError> {
    if let Some(error) = response.get("error") {
        let message = error
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| error.to_string());
        return Err(MmdError::Inference(message));
    }

    let candidate = match response {
        Value::Array(items) => match items.first() {
            // Some servers wrap each batch entry in its own array
            Some(Value::Array(inner)) => inner.first(),
            other => other,
        },
        Value::Object(_) => Some(response),
        _ => None,
    }
    .ok_or_else(|| MmdError::ParsingError("Empty generation response".to_string()))?;

    OUTPUT_FIELDS
        .iter()
        .find_map(|field| candidate.get(*field).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
        .ok_or_else(|| {
            MmdError::ParsingError(format!(
                "Generation response has none of the fields {:?}: {}",
                OUTPUT_FIELDS, candidate
            ))
        })
}

#[async_trait]
impl Seq2SeqModel for HttpSeq2SeqModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        input: &ModelInput,
        params: &GenerationParams,
    ) -> Result<String, MmdError> {
        let url = self.endpoint.model_url(&self.model_id);
        let body = self.build_request_body(input, params);

        log::debug!("Inference request to {}", url);
        log::debug!("Request body: {}", serde_json::to_string_pretty(&body).unwrap_or_default());

        let response = self
            .endpoint
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MmdError::Inference(format!("HTTP request to {} failed: {}", url, e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| MmdError::Inference(format!("Failed to read response: {}", e)))?;

        log::debug!("Inference response ({}): {}", status, response_text);

        if !status.is_success() {
            return Err(MmdError::Inference(format!(
                "Model '{}' request failed with status {}: {}",
                self.model_id, status, response_text
            )));
        }

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| MmdError::ParsingError(format!("Invalid JSON response: {}", e)))?;

        parse_generation_response(&response_json)
    }
}

/// Loads models from an inference server, optionally checking availability first
pub struct HttpModelLoader {
    endpoint: InferenceEndpoint,
    probe_on_load: bool,
}

impl HttpModelLoader {
    pub fn new(endpoint: InferenceEndpoint) -> Self {
        Self {
            endpoint,
            probe_on_load: false,
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self, MmdError> {
        Ok(Self::new(InferenceEndpoint::from_config(config)?).with_probe(config.probe_on_load))
    }

    pub fn with_probe(mut self, probe_on_load: bool) -> Self {
        self.probe_on_load = probe_on_load;
        self
    }

    async fn probe(&self, model_id: &str) -> Result<(), MmdError> {
        let url = self.endpoint.status_url(model_id);
        let load_error = |message: String| MmdError::ModelLoad {
            model: model_id.to_string(),
            message,
        };

        let response = self
            .endpoint
            .get(&url)
            .send()
            .await
            .map_err(|e| load_error(format!("status request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(load_error(format!("status {}: {}", status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| load_error(format!("invalid status response: {}", e)))?;

        if let Some(error) = body.get("error").and_then(|e| e.as_str()) {
            return Err(load_error(error.to_string()));
        }

        // The hosted API reports "Loadable", "Loaded" or "TooBig"
        match body.get("state").and_then(|s| s.as_str()) {
            Some("TooBig") => Err(load_error("model is too large for this server".to_string())),
            Some(state) => {
                log::debug!("Model '{}' state: {}", model_id, state);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn Seq2SeqModel>, MmdError> {
        if model_id.is_empty() {
            return Err(MmdError::ModelLoad {
                model: model_id.to_string(),
                message: "model identifier cannot be empty".to_string(),
            });
        }

        if self.probe_on_load {
            self.probe(model_id).await?;
        }

        Ok(Arc::new(HttpSeq2SeqModel::new(self.endpoint.clone(), model_id)))
    }
}
