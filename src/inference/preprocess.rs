//! Image preprocessing
//!
//! Mirrors the transform used when the model was trained: RGB, bicubic
//! resize to a square (aspect ratio discarded), raw 0-255 channel values as
//! f32, NHWC with a leading batch axis of 1. Pixel values are intentionally
//! NOT scaled to 0-1.
//!
//! The resize uses the same bicubic kernel (a = -0.5) as Pillow's default,
//! but Pillow works in fixed point with its own pass order and rounding, so
//! resized pixels can differ by +/-1 per channel. Flat regions and the
//! output shape match exactly.

use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, ImageReader};
use ndarray::Array4;

/// Bicubic kernel matching Pillow's default `resize` filter.
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("could not read upload: {0}")]
    Read(#[from] std::io::Error),

    #[error("upload is not a decodable image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Decode encoded bytes, format guessed from content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PreprocessError> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    Ok(image)
}

/// Turn a decoded image into a `(1, edge, edge, 3)` input batch.
pub fn to_batch(image: &DynamicImage, edge: u32) -> Result<Array4<f32>, PreprocessError> {
    let rgb = image.to_rgb8();
    let resized = image::imageops::resize(&rgb, edge, edge, RESIZE_FILTER);

    let side = edge as usize;
    let data: Vec<f32> = resized.into_raw().into_iter().map(f32::from).collect();

    Ok(Array4::from_shape_vec((1, side, side, 3), data)?)
}

/// Decode and transform in one step.
pub fn preprocess(bytes: &[u8], edge: u32) -> Result<Array4<f32>, PreprocessError> {
    to_batch(&decode(bytes)?, edge)
}
