//! Leaf disease recognition: decode an uploaded leaf photo, classify it with
//! a pretrained model and look up pesticide suggestions for the result.
//!
//! ```no_run
//! use std::sync::Arc;
//! use leaf_core::{ClassifierConfig, InferencePipeline, ModelLoader};
//!
//! # fn main() -> Result<(), leaf_core::LeafError> {
//! let loader = Arc::new(ModelLoader::new(ClassifierConfig::default()));
//! loader.load()?;
//! let pipeline = InferencePipeline::new(loader);
//! let diagnosis = pipeline.diagnose_file("leaf.jpg")?;
//! println!("{}", diagnosis.label());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod labels;
pub mod model;
#[cfg(feature = "ort")]
pub mod onnx;
pub mod pipeline;
pub mod preprocess;
pub mod recommend;

pub use config::{ClassifierConfig, PixelScale, ResizeFilter, TensorLayout};
pub use error::LeafError;
pub use labels::{DiseaseClass, LABEL_COUNT, UnknownLabel, verify_label_file};
pub use model::{Classifier, ModelLoader};
#[cfg(feature = "ort")]
pub use onnx::OnnxClassifier;
pub use pipeline::{Diagnosis, InferencePipeline, Prediction, argmax};
pub use preprocess::Preprocessor;
pub use recommend::{NO_PESTICIDE_NEEDED, format_numbered, recommendations, suggest, suggest_for};
