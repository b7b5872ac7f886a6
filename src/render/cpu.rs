use crate::assets::decode::load_image;
use crate::assets::media::{VideoSourceInfo, decode_video_frame_rgba8, probe_video};
use crate::assets::store::{TextBrushRgba8, TextLayoutEngine, resolve_asset_path};
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_px};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::scene::model::{DrawNode, EvaluatedFrame, Fit, Shape, TextAlign, TextRun};
use kurbo::Shape as _;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

const PATH_TOLERANCE: f64 = 0.1;

/// Options for the CPU backend.
#[derive(Debug, Clone, Default)]
pub struct CpuBackendOpts {
    /// Straight-alpha RGBA8 painted under every frame; `None` leaves it transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Font file used for every text run. Without one, text is skipped.
    pub font_path: Option<PathBuf>,
}

impl CpuBackendOpts {
    /// Return options with a configured clear color.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    /// Return options with a configured font file.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

struct TextState {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
}

struct VideoFrameDecoder {
    info: Arc<VideoSourceInfo>,
    frame_cache: HashMap<u64, vello_cpu::Image>,
    lru: VecDeque<u64>,
    capacity: usize,
}

impl VideoFrameDecoder {
    fn new(info: VideoSourceInfo) -> Self {
        let capacity = std::env::var("REELKIT_VIDEO_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(64);
        Self {
            info: Arc::new(info),
            frame_cache: HashMap::new(),
            lru: VecDeque::new(),
            capacity,
        }
    }

    fn decode_at(&mut self, source_time_s: f64) -> ReelResult<ImagePaint> {
        // Millisecond buckets.
        let key = ((source_time_s.max(0.0)) * 1000.0).round() as u64;
        let paint = match self.frame_cache.get(&key).cloned() {
            Some(img) => {
                self.touch(key);
                img
            }
            None => {
                let mut rgba = decode_video_frame_rgba8(&self.info, source_time_s)?;
                premultiply_rgba8_in_place(&mut rgba);
                let image = premul_bytes_to_image(&rgba, self.info.width, self.info.height)?;
                self.frame_cache.insert(key, image.clone());
                self.touch(key);
                while self.lru.len() > self.capacity {
                    if let Some(old) = self.lru.pop_front() {
                        self.frame_cache.remove(&old);
                    }
                }
                image
            }
        };
        Ok(ImagePaint {
            paint,
            w: self.info.width,
            h: self.info.height,
        })
    }

    fn touch(&mut self, key: u64) {
        if let Some(pos) = self.lru.iter().position(|x| *x == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

/// CPU backend powered by `vello_cpu` for vector/image rasterization and `parley` for text.
///
/// Asset failures never abort a frame: the node is replaced by a placeholder and a warning is
/// logged once per source.
pub(crate) struct CpuBackend {
    assets_root: PathBuf,
    opts: CpuBackendOpts,
    ctx: Option<vello_cpu::RenderContext>,

    image_cache: HashMap<String, ImagePaint>,
    video_decoders: HashMap<String, VideoFrameDecoder>,
    failed_sources: HashSet<String>,

    text: Option<TextState>,
    text_unavailable: bool,
}

impl CpuBackend {
    pub(crate) fn new(assets_root: impl Into<PathBuf>, opts: CpuBackendOpts) -> Self {
        Self {
            assets_root: assets_root.into(),
            opts,
            ctx: None,
            image_cache: HashMap::new(),
            video_decoders: HashMap::new(),
            failed_sources: HashSet::new(),
            text: None,
            text_unavailable: false,
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> ReelResult<R>,
    ) -> ReelResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn note_failure(&mut self, src: &str, err: &ReelError) {
        if self.failed_sources.insert(src.to_owned()) {
            tracing::warn!(src, error = %err, "asset failed to load; drawing placeholder");
        }
    }

    fn check_not_failed(&self, src: &str) -> ReelResult<()> {
        if self.failed_sources.contains(src) {
            return Err(ReelError::asset(format!("'{src}' failed to load earlier")));
        }
        Ok(())
    }

    fn image_paint_for(&mut self, src: &str) -> ReelResult<ImagePaint> {
        self.check_not_failed(src)?;
        if let Some(p) = self.image_cache.get(src) {
            return Ok(p.clone());
        }
        let prepared = load_image(&self.assets_root, src)?;
        let out = ImagePaint {
            paint: premul_bytes_to_image(&prepared.rgba8_premul, prepared.width, prepared.height)?,
            w: prepared.width,
            h: prepared.height,
        };
        self.image_cache.insert(src.to_owned(), out.clone());
        Ok(out)
    }

    fn video_paint_for(&mut self, src: &str, source_time_s: f64) -> ReelResult<ImagePaint> {
        self.check_not_failed(src)?;
        if !self.video_decoders.contains_key(src) {
            let path = resolve_asset_path(&self.assets_root, src)?;
            let info = probe_video(&path)?;
            self.video_decoders
                .insert(src.to_owned(), VideoFrameDecoder::new(info));
        }
        let decoder = self
            .video_decoders
            .get_mut(src)
            .ok_or_else(|| ReelError::render("video decoder missing"))?;
        decoder.decode_at(source_time_s)
    }

    fn text_state(&mut self) -> Option<&mut TextState> {
        if self.text.is_none() && !self.text_unavailable {
            match self.load_text_state() {
                Ok(state) => self.text = Some(state),
                Err(e) => {
                    tracing::warn!(error = %e, "text rendering disabled");
                    self.text_unavailable = true;
                }
            }
        }
        self.text.as_mut()
    }

    fn load_text_state(&self) -> ReelResult<TextState> {
        let path = self
            .opts
            .font_path
            .as_ref()
            .ok_or_else(|| ReelError::asset("no font configured"))?;
        let bytes = std::fs::read(path).map_err(|e| {
            ReelError::asset(format!("failed to read font '{}': {e}", path.display()))
        })?;
        let engine = TextLayoutEngine::new(&bytes)?;
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        Ok(TextState { engine, font })
    }

    fn draw_node(
        &mut self,
        node: &DrawNode,
        transform: Affine,
        ctx: &mut vello_cpu::RenderContext,
    ) -> ReelResult<()> {
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(transform));

        match node {
            DrawNode::Fill { shape, color } => {
                if color.a == 0 {
                    return Ok(());
                }
                ctx.set_paint(paint_color(*color));
                match shape {
                    Shape::Rect { rect, radius } if *radius <= 0.0 => {
                        ctx.fill_rect(&rect_to_cpu(*rect));
                    }
                    _ => match shape_path(shape) {
                        Ok(path) => ctx.fill_path(&bezpath_to_cpu(&path)),
                        Err(e) => self.note_failure("path", &e),
                    },
                }
                Ok(())
            }
            DrawNode::Text(run) => {
                self.draw_text(run, transform, ctx);
                Ok(())
            }
            DrawNode::Image { src, dest, fit } => {
                match self.image_paint_for(src) {
                    Ok(p) => draw_image(ctx, &p, *dest, *fit),
                    Err(e) => {
                        self.note_failure(src, &e);
                        draw_placeholder(ctx, *dest);
                    }
                }
                Ok(())
            }
            DrawNode::Video {
                src,
                dest,
                fit,
                source_time_secs,
            } => {
                match self.video_paint_for(src, *source_time_secs) {
                    Ok(p) => draw_image(ctx, &p, *dest, *fit),
                    Err(e) => {
                        self.note_failure(src, &e);
                        draw_placeholder(ctx, *dest);
                    }
                }
                Ok(())
            }
            DrawNode::Group {
                transform: local,
                opacity,
                children,
            } => {
                let opacity = opacity.clamp(0.0, 1.0) as f32;
                if opacity <= 0.0 {
                    return Ok(());
                }
                if opacity < 1.0 {
                    ctx.push_opacity_layer(opacity);
                }
                let tr = transform * *local;
                for child in children {
                    self.draw_node(child, tr, ctx)?;
                }
                if opacity < 1.0 {
                    ctx.pop_layer();
                }
                Ok(())
            }
        }
    }

    fn draw_text(&mut self, run: &TextRun, transform: Affine, ctx: &mut vello_cpu::RenderContext) {
        if run.text.is_empty() || run.color.a == 0 {
            return;
        }
        let Some(state) = self.text_state() else {
            return;
        };
        let [r, g, b, a] = unpremultiply(run.color);
        let layout = match state.engine.layout(
            &run.text,
            run.font_size as f32,
            TextBrushRgba8 { r, g, b, a },
            run.max_width.map(|w| w as f32),
            run.align,
        ) {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!(error = %e, "text layout failed");
                return;
            }
        };

        let box_w = run.max_width.unwrap_or(f64::from(layout.width()));
        let x0 = match run.align {
            TextAlign::Start => run.origin.x,
            TextAlign::Center => run.origin.x - box_w / 2.0,
            TextAlign::End => run.origin.x - box_w,
        };
        let tr = transform * Affine::translate((x0, run.origin.y));
        ctx.set_transform(affine_to_cpu(tr));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let brush = glyph_run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = glyph_run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&state.font)
                    .font_size(glyph_run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

impl RenderBackend for CpuBackend {
    fn render_frame(&mut self, canvas: Canvas, frame: &EvaluatedFrame) -> ReelResult<FrameRGBA> {
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ReelError::render("canvas width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ReelError::render("canvas height exceeds u16"))?;
        let clear = self.opts.clear_rgba;

        self.with_ctx_mut(w, h, |this, ctx| {
            if let Some([r, g, b, a]) = clear {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_rect(&rect_to_cpu(canvas.rect()));
            }
            for layer in &frame.layers {
                for node in &layer.scene.nodes {
                    this.draw_node(node, Affine::IDENTITY, ctx)?;
                }
            }
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(FrameRGBA {
                width: canvas.width,
                height: canvas.height,
                data: pixmap.data_as_u8_slice().to_vec(),
            })
        })
    }
}

/// Where an image of `src_w x src_h` lands inside `dest` for a fit mode.
pub(crate) fn fit_rect(fit: Fit, src_w: f64, src_h: f64, dest: Rect) -> Rect {
    if src_w <= 0.0 || src_h <= 0.0 {
        return dest;
    }
    let sx = dest.width() / src_w;
    let sy = dest.height() / src_h;
    let scale = match fit {
        Fit::Fill => return dest,
        Fit::Cover => sx.max(sy),
        Fit::Contain => sx.min(sy),
    };
    let (w, h) = (src_w * scale, src_h * scale);
    let c = dest.center();
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, c.x + w / 2.0, c.y + h / 2.0)
}

fn draw_image(ctx: &mut vello_cpu::RenderContext, p: &ImagePaint, dest: Rect, fit: Fit) {
    let placed = fit_rect(fit, f64::from(p.w), f64::from(p.h), dest);
    let visible = placed.intersect(dest);
    if visible.width() <= 0.0 || visible.height() <= 0.0 {
        return;
    }
    let paint_tr = Affine::translate((placed.x0, placed.y0))
        * Affine::scale_non_uniform(
            placed.width() / f64::from(p.w),
            placed.height() / f64::from(p.h),
        );
    ctx.set_paint_transform(affine_to_cpu(paint_tr));
    ctx.set_paint(p.paint.clone());
    ctx.fill_rect(&rect_to_cpu(visible));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

/// Visible "failed to load" state: dark panel crossed by a red X.
fn draw_placeholder(ctx: &mut vello_cpu::RenderContext, dest: Rect) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(48, 48, 48, 255));
    ctx.fill_rect(&rect_to_cpu(dest));

    let t = (dest.width().min(dest.height()) * 0.02).max(1.0);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(220, 40, 40, 255));
    for (a, b) in [
        (Point::new(dest.x0, dest.y0), Point::new(dest.x1, dest.y1)),
        (Point::new(dest.x1, dest.y0), Point::new(dest.x0, dest.y1)),
    ] {
        let d = b - a;
        let len = d.hypot();
        if len <= 0.0 {
            continue;
        }
        let n = kurbo::Vec2::new(-d.y, d.x) * (t / len);
        let mut path = BezPath::new();
        path.move_to(a + n);
        path.line_to(b + n);
        path.line_to(b - n);
        path.line_to(a - n);
        path.close_path();
        ctx.fill_path(&bezpath_to_cpu(&path));
    }
}

fn shape_path(shape: &Shape) -> ReelResult<BezPath> {
    Ok(match shape {
        Shape::Rect { rect, radius } => {
            kurbo::RoundedRect::from_rect(*rect, *radius).to_path(PATH_TOLERANCE)
        }
        Shape::Ellipse { center, radii } => {
            kurbo::Ellipse::new(*center, *radii, 0.0).to_path(PATH_TOLERANCE)
        }
        Shape::Pie {
            center,
            radius,
            start_angle,
            sweep,
        } => kurbo::CircleSegment::new(*center, *radius, 0.0, *start_angle, *sweep)
            .to_path(PATH_TOLERANCE),
        Shape::Polygon { points } => {
            let mut path = BezPath::new();
            let mut it = points.iter();
            if let Some(first) = it.next() {
                path.move_to(*first);
                for p in it {
                    path.line_to(*p);
                }
                path.close_path();
            }
            path
        }
        Shape::Path { d } => BezPath::from_svg(d.trim())
            .map_err(|e| ReelError::validation(format!("invalid svg path data: {e}")))?,
    })
}

fn unpremultiply(c: Rgba8Premul) -> [u8; 4] {
    unpremultiply_px([c.r, c.g, c.b, c.a])
}

fn paint_color(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = unpremultiply(c);
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_bytes_to_image(bytes: &[u8], width: u32, height: u32) -> ReelResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::asset("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::asset("image height exceeds u16"))?;
    if bytes.len() != (width as usize) * (height as usize) * 4 {
        return Err(ReelError::asset("image byte length mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
