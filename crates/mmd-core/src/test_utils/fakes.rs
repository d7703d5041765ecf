//! In-process stand-ins for the model and embedding seams

use crate::errors::MmdError;
use crate::evaluation::TokenEmbedder;
use crate::inference::{GenerationParams, ModelInput, ModelLoader, Seq2SeqModel};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// Return the encoded input text unchanged
    Echo,
    /// Always return this text
    Fixed(String),
    /// Fail every generation with `Inference(message)`
    Fail(String),
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model_id: String,
    pub input: ModelInput,
    pub params: GenerationParams,
}

pub struct FakeModel {
    model_id: String,
    behavior: FakeBehavior,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

#[async_trait]
impl Seq2SeqModel for FakeModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        input: &ModelInput,
        params: &GenerationParams,
    ) -> Result<String, MmdError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model_id: self.model_id.clone(),
            input: input.clone(),
            params: params.clone(),
        });

        match &self.behavior {
            FakeBehavior::Echo => Ok(input.text.clone()),
            FakeBehavior::Fixed(text) => Ok(text.clone()),
            FakeBehavior::Fail(message) => Err(MmdError::Inference(message.clone())),
        }
    }
}

pub struct FakeLoader {
    behavior: FakeBehavior,
    load_error: Option<String>,
    loaded: Mutex<Vec<String>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeLoader {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            load_error: None,
            loaded: Mutex::new(Vec::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo() -> Self {
        Self::new(FakeBehavior::Echo)
    }

    pub fn fixed(text: &str) -> Self {
        Self::new(FakeBehavior::Fixed(text.to_string()))
    }

    pub fn failing_generation(message: &str) -> Self {
        Self::new(FakeBehavior::Fail(message.to_string()))
    }

    /// A loader whose every load fails
    pub fn failing(message: &str) -> Self {
        Self {
            load_error: Some(message.to_string()),
            ..Self::echo()
        }
    }

    pub fn loaded_ids(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelLoader for FakeLoader {
    async fn load(&self, model_id: &str) -> Result<Arc<dyn Seq2SeqModel>, MmdError> {
        if let Some(message) = &self.load_error {
            return Err(MmdError::ModelLoad {
                model: model_id.to_string(),
                message: message.clone(),
            });
        }

        self.loaded.lock().unwrap().push(model_id.to_string());
        Ok(Arc::new(FakeModel {
            model_id: model_id.to_string(),
            behavior: self.behavior.clone(),
            calls: self.calls.clone(),
        }))
    }
}

/// Hash-based token embeddings: equal words get equal vectors, and every text
/// is framed by a leading and trailing special-token row
pub struct FakeEmbedder {
    dimension: usize,
    requests: Mutex<Vec<String>>,
    failure: Option<String>,
}

impl FakeEmbedder {
    pub fn new() -> Self {
        Self {
            dimension: 32,
            requests: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Records each request, then fails it with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn embed_word(&self, word: &str) -> Vec<f32> {
        let word = word.to_lowercase();
        (0..self.dimension)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                (&word, i).hash(&mut hasher);
                ((hasher.finish() % 1000) as f32 - 500.0) / 500.0
            })
            .collect()
    }
}

impl Default for FakeEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenEmbedder for FakeEmbedder {
    async fn embed_tokens(&self, text: &str) -> Result<Vec<Vec<f32>>, MmdError> {
        self.requests.lock().unwrap().push(text.to_string());
        if let Some(message) = &self.failure {
            return Err(MmdError::Evaluation(message.clone()));
        }

        let mut rows = vec![vec![1.0; self.dimension]];
        rows.extend(text.split_whitespace().map(|w| self.embed_word(w)));
        rows.push(vec![-1.0; self.dimension]);
        Ok(rows)
    }
}
