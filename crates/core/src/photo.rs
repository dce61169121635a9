//! Dish photo processing.
//!
//! Uploaded photos are shrunk to fit a square bounding box and re-encoded
//! as JPEG before they are stored, whatever format they arrived in.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ImageReader;

use crate::error::CoreError;

/// Longest edge, in pixels, of a stored photo.
pub const MAX_DIMENSION: u32 = 1200;

/// JPEG quality used when re-encoding.
pub const JPEG_QUALITY: u8 = 85;

/// MIME type of every stored photo.
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// File extension of every stored photo.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Decode `bytes`, shrink to fit [`MAX_DIMENSION`] (never upscaling),
/// flatten to RGB and encode as JPEG.
pub fn process_image(bytes: &[u8]) -> Result<Vec<u8>, CoreError> {
    let decoded = image::load_from_memory(bytes).map_err(processing_failed)?;

    let resized = if decoded.width() > MAX_DIMENSION || decoded.height() > MAX_DIMENSION {
        decoded.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        decoded
    };

    let rgb = resized.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(processing_failed)?;
    Ok(out)
}

/// Read only the header of `bytes` and return `(width, height)`.
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32), CoreError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| processing_failed(e.into()))?
        .into_dimensions()
        .map_err(processing_failed)
}

/// MIME type implied by a file name's extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

fn processing_failed(err: image::ImageError) -> CoreError {
    CoreError::Validation(format!("Image processing failed: {err}"))
}
