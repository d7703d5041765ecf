use crate::errors::MmdError;
use crate::inference::{ModelLoader, Seq2SeqModel};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Session-scoped cache of loaded models keyed by model identifier.
///
/// Models are loaded lazily on first use and released when evicted or when the
/// cache is dropped. With caching disabled every lookup goes back to the loader,
/// which reproduces load-per-call behavior while still timing each load.
pub struct ModelCache {
    loader: Arc<dyn ModelLoader>,
    models: RwLock<HashMap<String, Arc<dyn Seq2SeqModel>>>,
    enabled: bool,
    loads: AtomicUsize,
}

impl ModelCache {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            models: RwLock::new(HashMap::new()),
            enabled: true,
            loads: AtomicUsize::new(0),
        }
    }

    /// A cache that never retains models
    pub fn uncached(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            enabled: false,
            ..Self::new(loader)
        }
    }

    pub fn with_caching(loader: Arc<dyn ModelLoader>, enabled: bool) -> Self {
        if enabled {
            Self::new(loader)
        } else {
            Self::uncached(loader)
        }
    }

    /// Return the cached model or load it
    pub async fn get_or_load(&self, model_id: &str) -> Result<Arc<dyn Seq2SeqModel>, MmdError> {
        if self.enabled {
            if let Some(model) = self.models.read().await.get(model_id) {
                log::debug!("Model cache hit for '{}'", model_id);
                return Ok(model.clone());
            }
        }

        // Hold the write lock across the load so one model is never loaded twice
        let mut models = self.models.write().await;
        if self.enabled {
            if let Some(model) = models.get(model_id) {
                return Ok(model.clone());
            }
        }

        let started = Instant::now();
        let model = self.loader.load(model_id).await?;
        self.loads.fetch_add(1, Ordering::Relaxed);
        log::info!(
            "Loaded model '{}' in {:.2?}{}",
            model_id,
            started.elapsed(),
            if self.enabled { "" } else { " (caching disabled)" }
        );

        if self.enabled {
            models.insert(model_id.to_string(), model.clone());
        }

        Ok(model)
    }

    pub async fn contains(&self, model_id: &str) -> bool {
        self.models.read().await.contains_key(model_id)
    }

    /// Drop one model; returns whether it was cached
    pub async fn evict(&self, model_id: &str) -> bool {
        let removed = self.models.write().await.remove(model_id).is_some();
        if removed {
            log::info!("Evicted model '{}' from cache", model_id);
        }
        removed
    }

    pub async fn clear(&self) {
        let mut models = self.models.write().await;
        log::info!("Releasing {} cached model(s)", models.len());
        models.clear();
    }

    pub async fn len(&self) -> usize {
        self.models.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.models.read().await.is_empty()
    }

    /// Number of loader invocations since the cache was created
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
