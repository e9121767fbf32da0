use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::application::ports::RenderError;
use crate::domain::EncodedImage;

pub const ENCODED_MIME_TYPE: &str = "image/jpeg";

/// Downscales to `max_dimension` on the longest side, drops alpha, and
/// returns base64 JPEG.
pub fn encode_for_model(
    image: DynamicImage,
    max_dimension: u32,
    jpeg_quality: u8,
) -> Result<EncodedImage, RenderError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::ImageDecode("image has no pixels".to_string()));
    }

    let resized = if max_dimension > 0 && width.max(height) > max_dimension {
        image.resize(max_dimension, max_dimension, FilterType::Triangle)
    } else {
        image
    };

    let rgb = resized.to_rgb8();
    let (out_width, out_height) = rgb.dimensions();

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    JpegEncoder::new_with_quality(&mut Cursor::new(&mut jpeg_bytes), jpeg_quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| RenderError::ImageEncode(e.to_string()))?;

    Ok(EncodedImage::new(
        ENCODED_MIME_TYPE,
        general_purpose::STANDARD.encode(&jpeg_bytes),
        out_width,
        out_height,
    ))
}
