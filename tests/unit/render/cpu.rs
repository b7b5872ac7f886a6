use super::*;
use crate::foundation::core::{FrameIndex, Vec2};
use crate::scene::model::{Layer, Scene};

fn canvas() -> Canvas {
    Canvas {
        width: 64,
        height: 32,
    }
}

fn frame_with(scene: Scene) -> EvaluatedFrame {
    EvaluatedFrame {
        frame: FrameIndex(0),
        layers: vec![Layer {
            item_id: "a".to_owned(),
            track_index: 0,
            local_frame: 0,
            scene,
        }],
        audio: Vec::new(),
    }
}

fn red() -> Rgba8Premul {
    Rgba8Premul::from_straight_rgba(255, 0, 0, 255)
}

#[test]
fn empty_frame_is_transparent_without_clear() {
    let mut be = CpuBackend::new(".", CpuBackendOpts::default());
    let out = be.render_frame(canvas(), &frame_with(Scene::new())).unwrap();
    assert_eq!((out.width, out.height), (64, 32));
    assert_eq!(out.data.len(), 64 * 32 * 4);
    assert!(out.data.iter().all(|&b| b == 0));
}

#[test]
fn clear_color_fills_every_pixel() {
    let opts = CpuBackendOpts::default().with_clear_rgba(Some([0, 0, 255, 255]));
    let mut be = CpuBackend::new(".", opts);
    let out = be.render_frame(canvas(), &frame_with(Scene::new())).unwrap();
    assert_eq!(out.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(out.pixel(63, 31), Some([0, 0, 255, 255]));
}

#[test]
fn solid_rect_paints_inside_only() {
    let mut scene = Scene::new();
    scene.fill_rect(Rect::new(0.0, 0.0, 32.0, 32.0), red());
    let mut be = CpuBackend::new(".", CpuBackendOpts::default());
    let out = be.render_frame(canvas(), &frame_with(scene)).unwrap();
    assert_eq!(out.pixel(10, 10), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(50, 10), Some([0, 0, 0, 0]));
}

#[test]
fn later_layers_draw_on_top() {
    let mut bottom = Scene::new();
    bottom.fill_rect(canvas().rect(), red());
    let mut top = Scene::new();
    top.fill_rect(
        Rect::new(0.0, 0.0, 16.0, 16.0),
        Rgba8Premul::from_straight_rgba(0, 255, 0, 255),
    );
    let mut frame = frame_with(bottom);
    frame.layers.push(Layer {
        item_id: "b".to_owned(),
        track_index: 1,
        local_frame: 0,
        scene: top,
    });

    let mut be = CpuBackend::new(".", CpuBackendOpts::default());
    let out = be.render_frame(canvas(), &frame).unwrap();
    assert_eq!(out.pixel(4, 4), Some([0, 255, 0, 255]));
    assert_eq!(out.pixel(40, 20), Some([255, 0, 0, 255]));
}

#[test]
fn group_opacity_scales_alpha() {
    let mut inner = Scene::new();
    inner.fill_rect(canvas().rect(), red());
    let mut scene = Scene::new();
    scene.group(Affine::IDENTITY, 0.5, inner);

    let mut be = CpuBackend::new(".", CpuBackendOpts::default());
    let out = be.render_frame(canvas(), &frame_with(scene)).unwrap();
    let px = out.pixel(20, 20).unwrap();
    assert!((126..=129).contains(&px[3]), "alpha {}", px[3]);
    assert_eq!(px[0], px[3]);
}

#[test]
fn group_transform_moves_children() {
    let mut inner = Scene::new();
    inner.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), red());
    let mut scene = Scene::new();
    scene.group(Affine::translate((40.0, 0.0)), 1.0, inner);

    let mut be = CpuBackend::new(".", CpuBackendOpts::default());
    let out = be.render_frame(canvas(), &frame_with(scene)).unwrap();
    assert_eq!(out.pixel(2, 2), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(44, 4), Some([255, 0, 0, 255]));
}

#[test]
fn ellipse_leaves_corners_empty() {
    let mut scene = Scene::new();
    scene.fill_ellipse(Point::new(32.0, 16.0), Vec2::new(16.0, 16.0), red());
    let mut be = CpuBackend::new(".", CpuBackendOpts::default());
    let out = be.render_frame(canvas(), &frame_with(scene)).unwrap();
    assert_eq!(out.pixel(32, 16), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(17, 1), Some([0, 0, 0, 0]));
}

#[test]
fn missing_image_draws_placeholder_and_keeps_going() {
    let dir = std::env::temp_dir().join(format!("reelkit_cpu_missing_{}", std::process::id()));
    let mut scene = Scene::new();
    scene.push(DrawNode::Image {
        src: "nope.png".to_owned(),
        dest: Rect::new(0.0, 0.0, 64.0, 32.0),
        fit: Fit::Cover,
    });
    let mut be = CpuBackend::new(&dir, CpuBackendOpts::default());
    let out = be.render_frame(canvas(), &frame_with(scene.clone())).unwrap();
    assert_eq!(out.pixel(32, 2), Some([48, 48, 48, 255]));
    assert!(be.failed_sources.contains("nope.png"));

    // Second frame reuses the recorded failure.
    let again = be.render_frame(canvas(), &frame_with(scene.clone())).unwrap();
    assert_eq!(again, out);

    // A file appearing later is not read: the failure sticks for this backend.
    std::fs::create_dir_all(&dir).unwrap();
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 255]));
    img.save(dir.join("nope.png")).unwrap();
    let later = be.render_frame(canvas(), &frame_with(scene)).unwrap();
    assert_eq!(later, out);
    assert!(be.image_paint_for("nope.png").is_err());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn image_asset_is_drawn_into_dest() {
    let dir = std::env::temp_dir().join(format!("reelkit_cpu_image_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 255]));
    img.save(dir.join("green.png")).unwrap();

    let mut scene = Scene::new();
    scene.push(DrawNode::Image {
        src: "green.png".to_owned(),
        dest: Rect::new(0.0, 0.0, 32.0, 32.0),
        fit: Fit::Fill,
    });
    let mut be = CpuBackend::new(&dir, CpuBackendOpts::default());
    let out = be.render_frame(canvas(), &frame_with(scene)).unwrap();
    assert_eq!(out.pixel(16, 16), Some([0, 255, 0, 255]));
    assert_eq!(out.pixel(48, 16), Some([0, 0, 0, 0]));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn text_without_font_is_skipped() {
    let mut scene = Scene::new();
    scene.text(TextRun {
        text: "Hello".to_owned(),
        origin: Point::new(32.0, 4.0),
        font_size: 20.0,
        color: red(),
        align: TextAlign::Center,
        max_width: None,
    });
    let mut be = CpuBackend::new(".", CpuBackendOpts::default());
    let out = be.render_frame(canvas(), &frame_with(scene)).unwrap();
    assert!(out.data.iter().all(|&b| b == 0));
    assert!(be.text_unavailable);
}

#[test]
fn fit_rect_modes() {
    let dest = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(fit_rect(Fit::Fill, 10.0, 10.0, dest), dest);
    assert_eq!(
        fit_rect(Fit::Contain, 10.0, 10.0, dest),
        Rect::new(25.0, 0.0, 75.0, 50.0)
    );
    assert_eq!(
        fit_rect(Fit::Cover, 10.0, 10.0, dest),
        Rect::new(0.0, -25.0, 100.0, 75.0)
    );
}

#[test]
fn svg_path_shapes_parse_or_fail() {
    let ok = shape_path(&Shape::Path {
        d: "M0 0 L10 0 L10 10 Z".to_owned(),
    })
    .unwrap();
    assert!(ok.elements().len() >= 4);
    assert!(
        shape_path(&Shape::Path {
            d: "not a path".to_owned()
        })
        .is_err()
    );
}

#[test]
fn unpremultiply_inverts_premultiply() {
    let c = Rgba8Premul::from_straight_rgba(200, 100, 50, 128);
    let [r, g, b, a] = unpremultiply(c);
    assert_eq!(a, 128);
    assert!((i16::from(r) - 200).abs() <= 2);
    assert!((i16::from(g) - 100).abs() <= 2);
    assert!((i16::from(b) - 50).abs() <= 2);
    assert_eq!(unpremultiply(Rgba8Premul::TRANSPARENT), [0, 0, 0, 0]);
}
