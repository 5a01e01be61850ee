//! Turns uploaded image bytes into the batch tensor the classifier expects.

use image::{RgbImage, imageops};
use ndarray::Array4;

use crate::config::{ClassifierConfig, PixelScale, ResizeFilter, TensorLayout};
use crate::error::LeafError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preprocessor {
    input_size: u32,
    filter: ResizeFilter,
    scale: PixelScale,
    layout: TensorLayout,
}

impl Preprocessor {
    pub fn from_config(cfg: &ClassifierConfig) -> Self {
        Self {
            input_size: cfg.input_size,
            filter: cfg.resize_filter,
            scale: cfg.pixel_scale,
            layout: cfg.layout,
        }
    }

    /// Decode and convert to 8-bit RGB. Grayscale is expanded to three
    /// channels and alpha is discarded; neither is an error.
    pub fn decode(&self, bytes: &[u8]) -> Result<RgbImage, LeafError> {
        let img = image::load_from_memory(bytes)?;
        Ok(img.to_rgb8())
    }

    /// Resize exactly to the model input size and lay the pixels out as a
    /// batch of one.
    pub fn to_tensor(&self, rgb: &RgbImage) -> Array4<f32> {
        let size = self.input_size;
        let resized = if rgb.dimensions() == (size, size) {
            rgb.clone()
        } else {
            imageops::resize(rgb, size, size, self.filter.into())
        };

        let scale = self.scale;
        match self.layout {
            TensorLayout::Nhwc => Array4::from_shape_fn(self.input_shape(), |(_, y, x, c)| {
                scale.apply(resized.get_pixel(x as u32, y as u32)[c])
            }),
            TensorLayout::Nchw => Array4::from_shape_fn(self.input_shape(), |(_, c, y, x)| {
                scale.apply(resized.get_pixel(x as u32, y as u32)[c])
            }),
        }
    }

    pub fn prepare(&self, bytes: &[u8]) -> Result<Array4<f32>, LeafError> {
        let rgb = self.decode(bytes)?;
        Ok(self.to_tensor(&rgb))
    }

    pub fn input_shape(&self) -> (usize, usize, usize, usize) {
        let s = self.input_size as usize;
        match self.layout {
            TensorLayout::Nhwc => (1, s, s, 3),
            TensorLayout::Nchw => (1, 3, s, s),
        }
    }
}
