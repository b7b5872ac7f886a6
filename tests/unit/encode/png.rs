use super::*;

#[test]
fn unpremultiply_restores_straight_color() {
    let out = unpremultiply_rgba8(&[64, 0, 32, 128, 9, 9, 9, 0, 1, 2, 3, 255]);
    assert_eq!(&out[0..4], &[128, 0, 64, 128]);
    assert_eq!(&out[4..8], &[0, 0, 0, 0]);
    assert_eq!(&out[8..12], &[1, 2, 3, 255]);
}

#[test]
fn png_roundtrips_opaque_pixels() {
    let path = std::env::temp_dir()
        .join(format!("reelkit_png_{}", std::process::id()))
        .join("frame.png");
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 0, 255, 255],
    };
    write_png(&frame, &path).unwrap();

    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (2, 1));
    assert_eq!(back.into_raw(), frame.data);
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn png_rejects_short_buffers() {
    let frame = FrameRGBA {
        width: 4,
        height: 4,
        data: vec![0; 4],
    };
    assert!(write_png(&frame, Path::new("unused.png")).is_err());
}
