//! Decoding of encoded map images (PNG, JPEG) into RGBA buffers.

use tracing::debug;

use crate::buffer::RenderBuffer;

/// Decode an encoded image, converting whatever color type it carries to RGBA8.
pub fn decode_image(bytes: &[u8]) -> crate::Result<RenderBuffer> {
    let decoded = image::load_from_memory(bytes)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(width, height, bytes = bytes.len(), "Decoded image");
    RenderBuffer::from_rgba(width, height, rgba.into_raw())
}
