use std::io::Write;

use bill_extractor::application::ports::RenderError;
use bill_extractor::infrastructure::imaging::{rasterize_first_page, render_target_size};

#[test]
fn given_letter_page_when_sizing_then_scales_points_by_dpi() {
    let (width, height) = render_target_size(612.0, 792.0, 144.0, 4096);

    assert_eq!((width, height), (1224, 1584));
}

#[test]
fn given_oversized_page_when_sizing_then_longest_side_is_capped() {
    // 5000 x 2500 pt at 150 DPI would be roughly 10417 x 5208 px.
    let (width, height) = render_target_size(5000.0, 2500.0, 150.0, 2048);

    assert_eq!(width, 2048);
    assert_eq!(height, 1024);
}

#[test]
fn given_tall_page_when_sizing_then_height_is_the_capped_side() {
    let (width, height) = render_target_size(1000.0, 4000.0, 72.0, 1000);

    assert_eq!((width, height), (250, 1000));
}

#[test]
fn given_degenerate_page_when_sizing_then_each_side_is_at_least_one_pixel() {
    let (width, height) = render_target_size(0.0, 0.0, 150.0, 2048);

    assert!(width >= 1 && height >= 1);
}

#[test]
fn given_garbage_pdf_when_rasterizing_then_fails_without_image_decoding() {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"this is not a pdf").unwrap();

    let result = rasterize_first_page(file.path(), 150.0, 2048);

    assert!(matches!(
        result,
        Err(RenderError::RasterizerUnavailable(_)) | Err(RenderError::InvalidDocument(_))
    ));
}
