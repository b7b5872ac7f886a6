use std::io::Cursor;

use super::*;

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(2, 1, vec![100u8, 50, 200, 128, 10, 20, 30, 0]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!((prepared.width, prepared.height), (2, 1));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128,
            0,
            0,
            0,
            0
        ]
    );
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn missing_file_is_an_asset_error() {
    let dir = std::env::temp_dir();
    let err = load_image(&dir, "reelkit-definitely-missing.png").unwrap_err();
    assert!(matches!(err, ReelError::Asset(_)));
}
