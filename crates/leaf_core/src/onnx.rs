//! ONNX Runtime backend for the leaf disease classifier.

use ndarray::{ArrayView4, CowArray};
use ort::{
    GraphOptimizationLevel, SessionBuilder, environment::Environment, session::Session,
    tensor::OrtOwnedTensor, value::Value,
};
use std::sync::{Arc, Mutex};

use crate::config::ClassifierConfig;
use crate::error::LeafError;
use crate::model::Classifier;

/// Classifier exported to ONNX, run on the CPU.
///
/// Forward passes are serialized through the session mutex.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_len: Option<usize>,
    _environment: Arc<Environment>,
}

impl OnnxClassifier {
    pub fn load(cfg: &ClassifierConfig) -> Result<Self, LeafError> {
        let path = &cfg.model_path;
        if !path.exists() {
            return Err(LeafError::model_load(path, "model file is missing"));
        }

        let environment = Environment::builder()
            .with_name("leafdoc")
            .build()
            .map_err(|e| LeafError::model_load(path, format!("runtime init failed: {e}")))?
            .into_arc();
        let session = SessionBuilder::new(&environment)
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level1))
            .and_then(|b| b.with_intra_threads(cfg.intra_threads))
            .and_then(|b| b.with_model_from_file(path))
            .map_err(|e| LeafError::model_load(path, e))?;

        let output_len = session
            .outputs
            .first()
            .and_then(|out| out.dimensions.last().copied().flatten())
            .map(|d| d as usize);
        tracing::debug!(
            "onnx session ready: {} input(s), output length {:?}",
            session.inputs.len(),
            output_len
        );

        Ok(Self {
            session: Mutex::new(session),
            output_len,
            _environment: environment,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn forward(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, LeafError> {
        let session = self
            .session
            .lock()
            .map_err(|_| LeafError::Inference("session lock poisoned".into()))?;
        let cow = CowArray::from(input.into_dyn());
        let value = Value::from_array(session.allocator(), &cow)
            .map_err(|e| LeafError::Inference(format!("could not build input tensor: {e}")))?;
        let outputs: Vec<Value> = session
            .run(vec![value])
            .map_err(|e| LeafError::Inference(e.to_string()))?;
        let first = outputs
            .first()
            .ok_or_else(|| LeafError::Inference("model returned no outputs".into()))?;
        let scores: OrtOwnedTensor<f32, _> = first
            .try_extract()
            .map_err(|e| LeafError::Inference(format!("unexpected output tensor: {e}")))?;
        let scores = scores.view().iter().copied().collect();
        Ok(scores)
    }

    fn output_len(&self) -> Option<usize> {
        self.output_len
    }
}
