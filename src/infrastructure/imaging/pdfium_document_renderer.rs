use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::application::ports::{DocumentRenderer, RenderError};
use crate::domain::{DocumentFormat, EncodedImage};

use super::image_encoder::encode_for_model;
use super::pdf_rasterizer::rasterize_first_page;

pub const DEFAULT_RENDER_DPI: f32 = 150.0;
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// PDFs go through pdfium, everything else through the `image` decoders.
pub struct PdfiumDocumentRenderer {
    dpi: f32,
    max_dimension: u32,
    jpeg_quality: u8,
}

impl PdfiumDocumentRenderer {
    pub fn new(dpi: f32, max_dimension: u32, jpeg_quality: u8) -> Self {
        Self {
            dpi,
            max_dimension,
            jpeg_quality,
        }
    }
}

impl Default for PdfiumDocumentRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_DPI, DEFAULT_MAX_DIMENSION, DEFAULT_JPEG_QUALITY)
    }
}

impl DocumentRenderer for PdfiumDocumentRenderer {
    fn render_first_page(
        &self,
        path: &Path,
        format: DocumentFormat,
    ) -> Result<EncodedImage, RenderError> {
        let image = if format.is_multi_page() {
            rasterize_first_page(path, self.dpi, self.max_dimension)?
        } else {
            decode_image(path, format_hint(format))?
        };

        encode_for_model(image, self.max_dimension, self.jpeg_quality)
    }
}

fn format_hint(format: DocumentFormat) -> Option<ImageFormat> {
    match format {
        DocumentFormat::Png => Some(ImageFormat::Png),
        DocumentFormat::Jpeg => Some(ImageFormat::Jpeg),
        DocumentFormat::Webp => Some(ImageFormat::WebP),
        DocumentFormat::Pdf => None,
    }
}

/// Uses the declared format as a hint but trusts the file's magic bytes when they disagree.
fn decode_image(
    path: &Path,
    hint: Option<ImageFormat>,
) -> Result<image::DynamicImage, RenderError> {
    let mut reader = ImageReader::open(path).map_err(|e| RenderError::ImageDecode(e.to_string()))?;
    if let Some(hint) = hint {
        reader.set_format(hint);
    }
    let reader = reader
        .with_guessed_format()
        .map_err(|e| RenderError::ImageDecode(e.to_string()))?;

    reader
        .decode()
        .map_err(|e| RenderError::ImageDecode(e.to_string()))
}
