mod image_encoder;
mod pdf_rasterizer;
mod pdfium_document_renderer;

pub use image_encoder::{ENCODED_MIME_TYPE, encode_for_model};
pub use pdf_rasterizer::{rasterize_first_page, render_target_size};
pub use pdfium_document_renderer::{
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DIMENSION, DEFAULT_RENDER_DPI, PdfiumDocumentRenderer,
};
