use std::path::Path;

use image::DynamicImage;
use pdfium_render::prelude::*;

use crate::application::ports::RenderError;

const POINTS_PER_INCH: f32 = 72.0;

/// Bitmap size for a page of `width_pt` x `height_pt` points at `dpi`, with the
/// longest side capped at `max_dimension` and the aspect ratio kept.
pub fn render_target_size(
    width_pt: f32,
    height_pt: f32,
    dpi: f32,
    max_dimension: u32,
) -> (i32, i32) {
    let width = (width_pt * dpi / POINTS_PER_INCH).max(1.0);
    let height = (height_pt * dpi / POINTS_PER_INCH).max(1.0);
    let limit = max_dimension.max(1) as f32;

    let scale = (limit / width.max(height)).min(1.0);
    let clamp = |side: f32| ((side * scale).round() as i32).max(1);

    (clamp(width), clamp(height))
}

/// Renders page 0 of a PDF. Later pages are never touched.
pub fn rasterize_first_page(
    path: &Path,
    dpi: f32,
    max_dimension: u32,
) -> Result<DynamicImage, RenderError> {
    let pdfium = Pdfium::new(
        Pdfium::bind_to_system_library()
            .map_err(|e| RenderError::RasterizerUnavailable(e.to_string()))?,
    );

    let doc = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| RenderError::InvalidDocument(format!("pdfium open failed: {e}")))?;

    let page_count = doc.pages().len();
    if page_count == 0 {
        return Err(RenderError::EmptyDocument);
    }

    let page = doc
        .pages()
        .get(0)
        .map_err(|e| RenderError::InvalidDocument(format!("first page access failed: {e}")))?;

    let (width, height) =
        render_target_size(page.width().value, page.height().value, dpi, max_dimension);
    let limit = max_dimension.max(1) as i32;

    tracing::debug!(page_count, width, height, "Rasterizing first PDF page");

    let bitmap = page
        .render_with_config(
            &PdfRenderConfig::new()
                .set_target_width(width)
                .set_target_height(height)
                .set_maximum_width(limit)
                .set_maximum_height(limit),
        )
        .map_err(|e| RenderError::InvalidDocument(format!("render first page failed: {e}")))?;

    Ok(bitmap.as_image())
}
