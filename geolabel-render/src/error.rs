use thiserror::Error;

/// Errors originating from raster handling.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel data holds {actual} bytes, expected {expected} for RGBA")]
    BufferLength { expected: usize, actual: usize },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
