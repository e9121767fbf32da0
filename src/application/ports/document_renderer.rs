use std::path::Path;

use crate::domain::{DocumentFormat, EncodedImage};

/// Turns a downloaded document into the single image sent to the model.
///
/// Implementations are blocking; callers run them off the async runtime.
pub trait DocumentRenderer: Send + Sync {
    fn render_first_page(
        &self,
        path: &Path,
        format: DocumentFormat,
    ) -> Result<EncodedImage, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF rasterizer unavailable, ensure the pdfium library is installed: {0}")]
    RasterizerUnavailable(String),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("document has no pages")]
    EmptyDocument,
    #[error("image decode failed: {0}")]
    ImageDecode(String),
    #[error("image encode failed: {0}")]
    ImageEncode(String),
}
