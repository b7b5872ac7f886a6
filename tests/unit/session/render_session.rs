use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Rect, Rgba8Premul};
use crate::registry::animation::{Animation, RenderCtx};
use crate::registry::store::RegistryEntry;
use crate::scene::model::Scene;
use crate::schema::field::Schema;
use serde_json::json;

/// Bar whose width grows with progress.
struct Grow;

impl Animation for Grow {
    type Config = serde_json::Value;

    fn schema(&self) -> Schema {
        Schema::new()
    }

    fn render(&self, ctx: &RenderCtx, _config: &Self::Config) -> Scene {
        let w = f64::from(ctx.canvas.width) * ctx.progress();
        let mut s = Scene::new();
        s.fill_rect(
            Rect::new(0.0, 0.0, w.max(1.0), f64::from(ctx.canvas.height)),
            Rgba8Premul::from_straight_rgba(255, 255, 255, 255),
        );
        s
    }
}

fn registry() -> AnimationRegistry {
    let mut reg = AnimationRegistry::new();
    reg.register(RegistryEntry::new("Grow", "Grow", Grow));
    reg
}

fn comp(kind: &str) -> Composition {
    Composition::from_value(json!({
        "fps": 30, "width": 32, "height": 32,
        "tracks": [{ "name": "main", "items": [
            { "id": "a", "type": kind, "from": 0, "durationInFrames": 8, "color": "#ff0000" }
        ]}]
    }))
    .unwrap()
}

fn opts(parallel: bool, elision: bool) -> RenderSessionOpts {
    RenderSessionOpts {
        parallel,
        chunk_size: 1024,
        threads: parallel.then_some(2),
        static_frame_elision: elision,
        channel_capacity: 4,
        enable_audio: false,
    }
}

fn range(start: u64, end: u64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

fn render(kind: &str, o: RenderSessionOpts) -> (RenderStats, InMemorySink) {
    let sess = RenderSession::new(&comp(kind), &registry(), std::env::temp_dir(), o).unwrap();
    let mut sink = InMemorySink::new();
    let stats = sess
        .render_range(range(0, 8), &CpuBackendOpts::default(), &mut sink)
        .unwrap();
    (stats, sink)
}

#[test]
fn parallel_range_is_ordered_and_varies_by_frame() {
    let (stats, sink) = render("Grow", opts(true, false));
    assert_eq!(
        stats,
        RenderStats {
            frames_total: 8,
            frames_rendered: 8,
            frames_elided: 0,
        }
    );
    assert!(sink.is_finished());
    for (i, (idx, _)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
    }
    assert_ne!(sink.frames()[0].1.data, sink.frames()[7].1.data);
}

#[test]
fn static_frames_are_elided_sequential_and_parallel() {
    for parallel in [false, true] {
        let (stats, sink) = render("solid", opts(parallel, true));
        assert_eq!(stats.frames_total, 8);
        assert_eq!(stats.frames_rendered, 1);
        assert_eq!(stats.frames_elided, 7);
        assert_eq!(sink.frames().len(), 8);
        for (_, frame) in sink.frames() {
            assert_eq!(frame.data, sink.frames()[0].1.data);
        }
        assert_eq!(sink.frames()[3].1.pixel(5, 5), Some([255, 0, 0, 255]));
    }
}

#[test]
fn parallel_matches_sequential_output() {
    let (_, seq) = render("Grow", opts(false, false));
    let (_, par) = render("Grow", opts(true, false));
    let (_, par_elided) = render("Grow", opts(true, true));
    assert_eq!(seq.frames(), par.frames());
    assert_eq!(seq.frames(), par_elided.frames());
}

#[test]
fn small_chunks_do_not_change_output() {
    let (_, whole) = render("Grow", opts(true, false));
    let mut o = opts(true, false);
    o.chunk_size = 3;
    let (stats, chunked) = render("Grow", o);
    assert_eq!(stats.frames_total, 8);
    assert_eq!(whole.frames(), chunked.frames());
}

#[test]
fn sink_receives_composition_config() {
    let (_, sink) = render("solid", opts(false, false));
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (32, 32));
    assert_eq!(cfg.fps, Fps::new(30, 1).unwrap());
    assert!(cfg.audio.is_none());
}

#[test]
fn ranges_outside_duration_are_rejected() {
    let sess =
        RenderSession::new(&comp("solid"), &registry(), ".", RenderSessionOpts::default()).unwrap();
    let mut sink = InMemorySink::new();
    let backend = CpuBackendOpts::default();
    assert!(sess.render_range(range(0, 9), &backend, &mut sink).is_err());
    assert!(sess.render_range(range(4, 4), &backend, &mut sink).is_err());
    assert!(sess.render_frame(FrameIndex(8), &backend).is_err());
    assert!(sess.evaluate(FrameIndex(8)).is_err());
    assert!(sess.render_frame(FrameIndex(7), &backend).is_ok());
}

#[test]
fn zero_threads_is_a_validation_error() {
    let mut o = opts(true, false);
    o.threads = Some(0);
    let sess = RenderSession::new(&comp("solid"), &registry(), ".", o).unwrap();
    let mut sink = InMemorySink::new();
    let err = sess
        .render_range(range(0, 2), &CpuBackendOpts::default(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn render_all_covers_whole_duration() {
    let sess =
        RenderSession::new(&comp("Grow"), &registry(), ".", opts(false, false)).unwrap();
    let mut sink = InMemorySink::new();
    let stats = sess
        .render_all(&CpuBackendOpts::default(), &mut sink)
        .unwrap();
    assert_eq!(stats.frames_total, sess.duration_frames());
    assert_eq!(sink.frames().len(), 8);
}

#[test]
fn items_and_metadata_are_reported() {
    let sess =
        RenderSession::new(&comp("Grow"), &registry(), ".", RenderSessionOpts::default()).unwrap();
    assert_eq!(sess.duration_frames(), 8);
    assert_eq!(
        sess.canvas(),
        Canvas {
            width: 32,
            height: 32
        }
    );
    assert_eq!(
        sess.items(),
        vec![ItemSummary {
            id: "a".to_owned(),
            type_name: "Grow".to_owned(),
            track_index: 0,
            from: 0,
            end: 8,
        }]
    );
}

/// Sink that fails on the third frame.
struct Failing(u32);

impl FrameSink for Failing {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> ReelResult<()> {
        self.0 += 1;
        if self.0 == 3 {
            return Err(ReelError::render("disk full"));
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        Ok(())
    }
}

#[test]
fn sink_errors_abort_the_range() {
    for parallel in [false, true] {
        let sess = RenderSession::new(&comp("Grow"), &registry(), ".", opts(parallel, false))
            .unwrap();
        let mut sink = Failing(0);
        assert!(
            sess.render_range(range(0, 8), &CpuBackendOpts::default(), &mut sink)
                .is_err()
        );
    }
}
