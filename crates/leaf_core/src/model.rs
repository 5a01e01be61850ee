//! Model loading.
//!
//! A [`ModelLoader`] is created once at startup and handed to whoever needs
//! to run inference. It builds the classifier on the first successful
//! [`ModelLoader::load`] call and hands out the same shared instance after
//! that; there is no process-wide model.

use ndarray::ArrayView4;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::config::ClassifierConfig;
use crate::error::LeafError;
use crate::labels::{LABEL_COUNT, verify_label_file};

/// A loaded image classifier.
///
/// Implementations must tolerate concurrent `forward` calls; serialize
/// internally if the runtime underneath cannot.
pub trait Classifier: Send + Sync {
    /// One forward pass over a preprocessed batch of one. Returns the score
    /// vector for that single image.
    fn forward(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, LeafError>;

    /// Length of the score vector, when the model declares it up front.
    fn output_len(&self) -> Option<usize> {
        None
    }
}

type Factory = dyn Fn(&ClassifierConfig) -> Result<Arc<dyn Classifier>, LeafError> + Send + Sync;

/// Single owner of the classifier instance.
pub struct ModelLoader {
    config: ClassifierConfig,
    factory: Box<Factory>,
    slot: Mutex<Option<Arc<dyn Classifier>>>,
}

impl ModelLoader {
    /// Loader backed by the ONNX Runtime classifier at `config.model_path`.
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_factory(config, default_factory)
    }

    /// Loader that builds its classifier with `factory` instead.
    pub fn with_factory<F>(config: ClassifierConfig, factory: F) -> Self
    where
        F: Fn(&ClassifierConfig) -> Result<Arc<dyn Classifier>, LeafError> + Send + Sync + 'static,
    {
        Self {
            config,
            factory: Box::new(factory),
            slot: Mutex::new(None),
        }
    }

    /// Loader that already holds `model`.
    pub fn preloaded(config: ClassifierConfig, model: Arc<dyn Classifier>) -> Self {
        let loader = Self::with_factory(config, |cfg| {
            Err(LeafError::model_load(&cfg.model_path, "loader was preloaded"))
        });
        *loader.lock_slot() = Some(model);
        loader
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Build the classifier if that has not happened yet and return it.
    ///
    /// Concurrent callers wait for the first load instead of starting their
    /// own. A failed load leaves the loader empty.
    pub fn load(&self) -> Result<Arc<dyn Classifier>, LeafError> {
        let mut slot = self.lock_slot();
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let started = Instant::now();
        let path = &self.config.model_path;
        if let Some(labels) = &self.config.labels_path {
            verify_label_file(labels)?;
        }
        let model = (self.factory)(&self.config)?;
        if let Some(len) = model.output_len().filter(|&len| len != LABEL_COUNT) {
            return Err(LeafError::model_load(
                path,
                format!("model outputs {len} classes, label table has {LABEL_COUNT}"),
            ));
        }
        tracing::info!(
            "model loaded from {} in {:.1?}",
            path.display(),
            started.elapsed()
        );

        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// The loaded classifier, or `ModelUnavailable` if `load` has not
    /// succeeded yet.
    pub fn model(&self) -> Result<Arc<dyn Classifier>, LeafError> {
        self.lock_slot()
            .as_ref()
            .map(Arc::clone)
            .ok_or(LeafError::ModelUnavailable)
    }

    pub fn is_loaded(&self) -> bool {
        self.lock_slot().is_some()
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn Classifier>>> {
        // The slot only ever holds a fully built model, so a poisoned lock
        // still guards a consistent value.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelLoader")
            .field("config", &self.config)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(feature = "ort")]
fn default_factory(cfg: &ClassifierConfig) -> Result<Arc<dyn Classifier>, LeafError> {
    let model = crate::onnx::OnnxClassifier::load(cfg)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "ort"))]
fn default_factory(cfg: &ClassifierConfig) -> Result<Arc<dyn Classifier>, LeafError> {
    Err(LeafError::model_load(
        &cfg.model_path,
        "built without ONNX Runtime support; enable the `ort` feature",
    ))
}
