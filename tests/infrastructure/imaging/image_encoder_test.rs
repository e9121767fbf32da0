use base64::{Engine as _, engine::general_purpose};
use image::{ColorType, DynamicImage, RgbaImage};

use bill_extractor::infrastructure::imaging::{ENCODED_MIME_TYPE, encode_for_model};

fn rgba_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([10, 120, 240, 90]),
    ))
}

#[test]
fn given_rgba_image_when_encoding_then_output_is_three_channel_jpeg() {
    let encoded = encode_for_model(rgba_image(64, 32), 2048, 85).unwrap();

    let bytes = general_purpose::STANDARD.decode(&encoded.data).unwrap();
    assert_eq!(encoded.mime_type, ENCODED_MIME_TYPE);
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!((encoded.width, encoded.height), (64, 32));
}

#[test]
fn given_oversized_image_when_encoding_then_longest_side_is_capped() {
    let encoded = encode_for_model(rgba_image(4000, 1000), 2048, 85).unwrap();

    assert_eq!(encoded.width, 2048);
    assert_eq!(encoded.height, 512);
}

#[test]
fn given_small_image_when_encoding_then_it_is_not_upscaled() {
    let encoded = encode_for_model(rgba_image(300, 400), 2048, 85).unwrap();

    assert_eq!((encoded.width, encoded.height), (300, 400));
}
