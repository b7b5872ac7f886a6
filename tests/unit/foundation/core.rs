use super::*;

fn range(s: u64, e: u64) -> FrameRange {
    FrameRange::new(FrameIndex(s), FrameIndex(e)).unwrap()
}

#[test]
fn range_is_half_open() {
    let r = range(2, 5);
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn inverted_range_is_rejected() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(range(3, 3).is_empty());
}

#[test]
fn chunks_cover_range_in_order() {
    let parts: Vec<_> = range(3, 11).chunks(3).collect();
    assert_eq!(parts, vec![range(3, 6), range(6, 9), range(9, 11)]);
    assert_eq!(range(0, 4).chunks(0).count(), 4);
    assert_eq!(range(7, 7).chunks(5).count(), 0);
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_time_and_display() {
    let ntsc = Fps::new(30000, 1001).unwrap();
    assert!((ntsc.frames_to_secs(30000) - 1001.0).abs() < 1e-9);
    assert_eq!(ntsc.to_string(), "30000/1001");
    assert_eq!(Fps::new(25, 1).unwrap().to_string(), "25");
}

#[test]
fn opacity_scales_premultiplied_channels() {
    let c = Rgba8Premul::from_straight_rgba(255, 0, 0, 255).with_opacity(0.5);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 0);
    assert_eq!(c.with_opacity(0.0), Rgba8Premul::TRANSPARENT);
}

#[test]
fn canvas_geometry() {
    let c = Canvas {
        width: 100,
        height: 50,
    };
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(c.center(), Point::new(50.0, 25.0));
    assert_eq!(c.frame_bytes(), 20_000);
}
