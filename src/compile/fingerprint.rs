use crate::foundation::core::{Affine, Point, Rect, Rgba8Premul};
use crate::scene::model::{DrawNode, EvaluatedFrame, Fit, Scene, Shape, TextAlign, TextRun};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5e1f_c0de_2b7a_9d41;

/// Stable per-frame fingerprint used by static-frame elision caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FrameFingerprint {
    pub(crate) hi: u64,
    pub(crate) lo: u64,
}

/// Fingerprint the visible content of an evaluated frame.
///
/// The absolute frame index, item ids and audio cues are not hashed, so identical pixels elide
/// across time regardless of which item drew them.
pub(crate) fn fingerprint_frame(frame: &EvaluatedFrame) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(frame.layers.len() as u64);
    for layer in &frame.layers {
        write_scene(&mut h, &layer.scene);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        // -0.0 and 0.0 draw the same pixels.
        let v = if v == 0.0 { 0.0 } else { v };
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn write_opt_f64(&mut self, v: Option<f64>) {
        match v {
            Some(v) => {
                self.write_u8(1);
                self.write_f64(v);
            }
            None => self.write_u8(0),
        }
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_scene(h: &mut StableHasher, scene: &Scene) {
    h.write_u64(scene.nodes.len() as u64);
    for node in &scene.nodes {
        write_node(h, node);
    }
}

fn write_node(h: &mut StableHasher, node: &DrawNode) {
    match node {
        DrawNode::Fill { shape, color } => {
            h.write_u8(0);
            write_shape(h, shape);
            write_color(h, *color);
        }
        DrawNode::Text(run) => {
            h.write_u8(1);
            write_text(h, run);
        }
        DrawNode::Image { src, dest, fit } => {
            h.write_u8(2);
            h.write_str(src);
            write_rect(h, *dest);
            write_fit(h, *fit);
        }
        DrawNode::Video {
            src,
            dest,
            fit,
            source_time_secs,
        } => {
            h.write_u8(3);
            h.write_str(src);
            write_rect(h, *dest);
            write_fit(h, *fit);
            h.write_f64(*source_time_secs);
        }
        DrawNode::Group {
            transform,
            opacity,
            children,
        } => {
            h.write_u8(4);
            write_affine(h, *transform);
            h.write_f64(*opacity);
            h.write_u64(children.len() as u64);
            for c in children {
                write_node(h, c);
            }
        }
    }
}

fn write_shape(h: &mut StableHasher, shape: &Shape) {
    match shape {
        Shape::Rect { rect, radius } => {
            h.write_u8(0);
            write_rect(h, *rect);
            h.write_f64(*radius);
        }
        Shape::Ellipse { center, radii } => {
            h.write_u8(1);
            write_point(h, *center);
            h.write_f64(radii.x);
            h.write_f64(radii.y);
        }
        Shape::Pie {
            center,
            radius,
            start_angle,
            sweep,
        } => {
            h.write_u8(2);
            write_point(h, *center);
            h.write_f64(*radius);
            h.write_f64(*start_angle);
            h.write_f64(*sweep);
        }
        Shape::Polygon { points } => {
            h.write_u8(3);
            h.write_u64(points.len() as u64);
            for p in points {
                write_point(h, *p);
            }
        }
        Shape::Path { d } => {
            h.write_u8(4);
            h.write_str(d);
        }
    }
}

fn write_text(h: &mut StableHasher, run: &TextRun) {
    h.write_str(&run.text);
    write_point(h, run.origin);
    h.write_f64(run.font_size);
    write_color(h, run.color);
    h.write_u8(match run.align {
        TextAlign::Start => 0,
        TextAlign::Center => 1,
        TextAlign::End => 2,
    });
    h.write_opt_f64(run.max_width);
}

fn write_fit(h: &mut StableHasher, fit: Fit) {
    h.write_u8(match fit {
        Fit::Cover => 0,
        Fit::Contain => 1,
        Fit::Fill => 2,
    });
}

fn write_color(h: &mut StableHasher, c: Rgba8Premul) {
    h.write_bytes(&[c.r, c.g, c.b, c.a]);
}

fn write_point(h: &mut StableHasher, p: Point) {
    h.write_f64(p.x);
    h.write_f64(p.y);
}

fn write_rect(h: &mut StableHasher, r: Rect) {
    h.write_f64(r.x0);
    h.write_f64(r.y0);
    h.write_f64(r.x1);
    h.write_f64(r.y1);
}

fn write_affine(h: &mut StableHasher, a: Affine) {
    for c in a.as_coeffs() {
        h.write_f64(c);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
