//! Image bytes in, class index (or full diagnosis) out.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::error::LeafError;
use crate::labels::{DiseaseClass, LABEL_COUNT};
use crate::model::ModelLoader;
use crate::preprocess::Preprocessor;
use crate::recommend::suggest_for;

/// Raw classifier output for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub index: usize,
    pub class: DiseaseClass,
    /// Score of the winning class as reported by the model.
    pub confidence: f32,
    pub scores: Vec<f32>,
}

/// Label plus the interventions to show for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub class: DiseaseClass,
    pub confidence: f32,
    pub suggestions: &'static [&'static str],
}

impl Diagnosis {
    pub fn label(&self) -> &'static str {
        self.class.as_str()
    }
}

/// Runs uploads through preprocessing and one forward pass.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    loader: Arc<ModelLoader>,
    preprocessor: Preprocessor,
}

impl InferencePipeline {
    pub fn new(loader: Arc<ModelLoader>) -> Self {
        let preprocessor = Preprocessor::from_config(loader.config());
        Self {
            loader,
            preprocessor,
        }
    }

    pub fn loader(&self) -> &ModelLoader {
        &self.loader
    }

    /// Index of the predicted class in `DiseaseClass::ALL`.
    pub fn predict(&self, image_bytes: &[u8]) -> Result<usize, LeafError> {
        Ok(self.predict_scores(image_bytes)?.index)
    }

    pub fn predict_scores(&self, image_bytes: &[u8]) -> Result<Prediction, LeafError> {
        let model = self.loader.model()?;
        let started = Instant::now();
        let input = self.preprocessor.prepare(image_bytes)?;
        let scores = model.forward(input.view())?;
        if scores.len() != LABEL_COUNT {
            return Err(LeafError::OutputShape {
                expected: LABEL_COUNT,
                actual: scores.len(),
            });
        }

        let index = argmax(&scores)
            .ok_or_else(|| LeafError::Inference("model produced no comparable scores".into()))?;
        let class = DiseaseClass::ALL[index];
        let confidence = scores[index];
        tracing::debug!(
            "predicted {index} ({class}) with score {confidence:.3} in {:.1?}",
            started.elapsed()
        );
        Ok(Prediction {
            index,
            class,
            confidence,
            scores,
        })
    }

    /// Predict and attach the recommendations. Either both are produced or
    /// the call fails.
    pub fn diagnose(&self, image_bytes: &[u8]) -> Result<Diagnosis, LeafError> {
        let prediction = self.predict_scores(image_bytes)?;
        Ok(Diagnosis {
            class: prediction.class,
            confidence: prediction.confidence,
            suggestions: suggest_for(prediction.class),
        })
    }

    pub fn diagnose_file(&self, path: impl AsRef<Path>) -> Result<Diagnosis, LeafError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LeafError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.diagnose(&bytes)
    }
}

/// Index of the largest score. Ties go to the lowest index and NaN never
/// wins; `None` when there is nothing to compare.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0.5, 0.5, 0.0], Some(0))]
    #[case(&[0.1, 0.7, 0.7, 0.2], Some(1))]
    #[case(&[0.0, 0.0, 0.0], Some(0))]
    #[case(&[-3.0, -1.0, -2.0], Some(1))]
    #[case(&[f32::NAN, 0.2, 0.9], Some(2))]
    #[case(&[0.3, f32::NAN, 0.3], Some(0))]
    #[case(&[f32::NAN], None)]
    #[case(&[], None)]
    fn argmax_prefers_lowest_index(#[case] scores: &[f32], #[case] expected: Option<usize>) {
        assert_eq!(argmax(scores), expected);
    }

    #[test]
    fn argmax_handles_infinities() {
        assert_eq!(argmax(&[1.0, f32::INFINITY, f32::INFINITY]), Some(1));
        assert_eq!(argmax(&[f32::NEG_INFINITY, f32::NEG_INFINITY]), Some(0));
    }
}
