//! Error type shared by the loader, the preprocessing steps and the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between a model artifact, an uploaded image
/// and a diagnosis.
#[derive(Debug, Error)]
pub enum LeafError {
    /// The model artifact is missing, corrupt or incompatible with the label table.
    #[error("failed to load model from {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    /// The uploaded bytes could not be decoded as an image.
    #[error("input is not a decodable image: {0}")]
    InvalidImage(#[from] image::ImageError),

    /// A prediction was requested before the model was loaded.
    #[error("model is not loaded")]
    ModelUnavailable,

    /// The forward pass itself failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The model returned a score vector that does not line up with the label table.
    #[error("model produced {actual} scores, expected {expected}")]
    OutputShape { expected: usize, actual: usize },

    #[error("invalid configuration in {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LeafError {
    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Fatal errors stop the process from serving predictions at all; the
    /// rest belong to a single request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ModelLoad { .. } | Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_config_errors_are_fatal() {
        assert!(LeafError::model_load("m.onnx", "missing").is_fatal());
        assert!(
            LeafError::Config {
                path: PathBuf::from("leaf.toml"),
                reason: "bad".into()
            }
            .is_fatal()
        );
        assert!(!LeafError::ModelUnavailable.is_fatal());
        assert!(
            !LeafError::OutputShape {
                expected: 28,
                actual: 3
            }
            .is_fatal()
        );
    }

    #[test]
    fn model_load_message_names_the_artifact() {
        let err = LeafError::model_load("models/leaf.onnx", "file not found");
        assert_eq!(
            err.to_string(),
            "failed to load model from models/leaf.onnx: file not found"
        );
    }
}
