//! Classifier configuration, loadable from TOML.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LeafError;

/// Resampling filter used when shrinking or growing the upload to the model
/// input size. Must match whatever produced the training images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    /// Bicubic; what the reference preprocessing used.
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Numeric range of the channel values fed to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelScale {
    /// Raw 0..=255 floats, no rescaling.
    #[default]
    Raw,
    /// Divided by 255 into 0..=1.
    Unit,
}

impl PixelScale {
    pub fn apply(self, value: u8) -> f32 {
        match self {
            PixelScale::Raw => value as f32,
            PixelScale::Unit => value as f32 / 255.0,
        }
    }
}

/// Memory layout of the input tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorLayout {
    /// `[batch, height, width, channels]`, the Keras convention.
    #[default]
    Nhwc,
    /// `[batch, channels, height, width]`.
    Nchw,
}

/// Configuration for the leaf disease classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    /// Optional labels file checked against the built-in table on load.
    pub labels_path: Option<PathBuf>,
    pub input_size: u32,
    pub resize_filter: ResizeFilter,
    pub pixel_scale: PixelScale,
    pub layout: TensorLayout,
    /// Intra-op threads for the ONNX Runtime session.
    pub intra_threads: i16,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/leaf_disease.onnx"),
            labels_path: None,
            input_size: 128,
            resize_filter: ResizeFilter::default(),
            pixel_scale: PixelScale::default(),
            layout: TensorLayout::default(),
            intra_threads: 1,
        }
    }
}

impl ClassifierConfig {
    /// Read a TOML file. Missing keys keep their defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LeafError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LeafError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, LeafError> {
        Self::parse(raw, Path::new("<inline>"))
    }

    fn parse(raw: &str, origin: &Path) -> Result<Self, LeafError> {
        let cfg: Self = toml::from_str(raw).map_err(|e| LeafError::Config {
            path: origin.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        cfg.validate().map_err(|reason| LeafError::Config {
            path: origin.to_path_buf(),
            reason,
        })?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.input_size == 0 {
            return Err("input_size must be greater than zero".into());
        }
        if self.intra_threads < 1 {
            return Err("intra_threads must be at least 1".into());
        }
        Ok(())
    }
}
