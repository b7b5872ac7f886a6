use crate::audio::manifest::build_audio_manifest;
use crate::audio::mix::{mix_manifest, write_mix_to_f32le_file};
use crate::compile::fingerprint::{FrameFingerprint, fingerprint_frame};
use crate::compile::resolve::{ResolvedComposition, resolve};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::eval::evaluator::evaluate_frame;
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::registry::store::AnimationRegistry;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::cpu::{CpuBackend, CpuBackendOpts};
use crate::scene::model::EvaluatedFrame;
use crate::timeline::composition::Composition;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

const MAX_REORDER_BUFFER_BYTES: u64 = 128 * 1024 * 1024;

/// Options for [`RenderSession`] range rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSessionOpts {
    /// Render frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Frames per render/encode chunk. Also capped so one chunk of frames stays under 128 MiB.
    pub chunk_size: usize,
    /// Worker thread count for the pool. `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Render identical frames only once per chunk.
    pub static_frame_elision: bool,
    /// Bound of the channel between renderers and the sink thread.
    pub channel_capacity: usize,
    /// Mix voice/video audio for the range and hand it to the sink.
    pub enable_audio: bool,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
            channel_capacity: 4,
            enable_audio: true,
        }
    }
}

/// Counters returned by [`RenderSession::render_range`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames delivered to the sink.
    pub frames_total: u64,
    /// Frames that went through the rasterizer.
    pub frames_rendered: u64,
    /// Frames reused from an identical earlier frame.
    pub frames_elided: u64,
}

/// Resolved view of one timeline item, for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemSummary {
    /// Item id.
    pub id: String,
    /// Primitive tag or animation id.
    pub type_name: String,
    /// Track the item sits on; higher tracks draw on top.
    pub track_index: usize,
    /// First active frame.
    pub from: u64,
    /// First frame after the item ends.
    pub end: u64,
}

/// A composition resolved against a registry, ready to evaluate and render.
///
/// Construction performs every lookup and validation up front, so an unknown item type or an
/// invalid configuration fails here rather than mid-render.
pub struct RenderSession {
    comp: ResolvedComposition,
    assets_root: PathBuf,
    opts: RenderSessionOpts,
}

impl RenderSession {
    /// Resolve `comp` against `registry`. Asset sources are looked up under `assets_root`.
    pub fn new(
        comp: &Composition,
        registry: &AnimationRegistry,
        assets_root: impl Into<PathBuf>,
        opts: RenderSessionOpts,
    ) -> ReelResult<Self> {
        let comp = resolve(comp, registry)?;
        Ok(Self {
            comp,
            assets_root: assets_root.into(),
            opts,
        })
    }

    /// Composition frame rate.
    pub fn fps(&self) -> Fps {
        self.comp.fps
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.comp.canvas
    }

    /// Total frames in the composition.
    pub fn duration_frames(&self) -> u64 {
        self.comp.duration_frames
    }

    /// Options this session renders ranges with.
    pub fn opts(&self) -> &RenderSessionOpts {
        &self.opts
    }

    /// Items in draw order.
    pub fn items(&self) -> Vec<ItemSummary> {
        self.comp
            .items
            .iter()
            .map(|item| ItemSummary {
                id: item.id.clone(),
                type_name: item.renderer.type_name().to_owned(),
                track_index: item.track_index,
                from: item.window.from,
                end: item.window.end(),
            })
            .collect()
    }

    /// Display list for `frame`.
    pub fn evaluate(&self, frame: FrameIndex) -> ReelResult<EvaluatedFrame> {
        self.check_frame(frame)?;
        Ok(evaluate_frame(&self.comp, frame))
    }

    /// Rasterize a single frame.
    pub fn render_frame(
        &self,
        frame: FrameIndex,
        backend_opts: &CpuBackendOpts,
    ) -> ReelResult<FrameRGBA> {
        let evaluated = self.evaluate(frame)?;
        let mut backend = CpuBackend::new(self.assets_root.clone(), backend_opts.clone());
        backend.render_frame(self.comp.canvas, &evaluated)
    }

    /// Render the whole composition into `sink`.
    pub fn render_all(
        &self,
        backend_opts: &CpuBackendOpts,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderStats> {
        let range = FrameRange::new(FrameIndex(0), FrameIndex(self.comp.duration_frames))?;
        self.render_range(range, backend_opts, sink)
    }

    /// Render `range` and stream it to `sink`.
    ///
    /// The sink sees frames in strictly increasing order whatever order workers finish in, and
    /// the pixels do not depend on `parallel`, `threads` or `chunk_size`.
    #[tracing::instrument(
        skip_all,
        fields(start = range.start.0, end = range.end.0, parallel = self.opts.parallel)
    )]
    pub fn render_range(
        &self,
        range: FrameRange,
        backend_opts: &CpuBackendOpts,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderStats> {
        if range.is_empty() {
            return Err(ReelError::validation("render range must be non-empty"));
        }
        if range.end.0 > self.comp.duration_frames {
            return Err(ReelError::validation(format!(
                "render range end {} is past the composition duration {}",
                range.end.0, self.comp.duration_frames
            )));
        }

        let mut audio_tmp = TempFileGuard(None);
        let audio = if self.opts.enable_audio {
            self.mix_audio(range, &mut audio_tmp)?
        } else {
            None
        };

        let cfg = SinkConfig {
            width: self.comp.canvas.width,
            height: self.comp.canvas.height,
            fps: self.comp.fps,
            audio,
        };

        let bytes_per_frame = self.comp.canvas.frame_bytes().max(1);
        let chunk_size = (self.opts.chunk_size.max(1) as u64)
            .min((MAX_REORDER_BUFFER_BYTES / bytes_per_frame).max(1))
            .min(range.len_frames());

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };
        let cap = self.opts.channel_capacity.max(1);

        let stats = std::thread::scope(|scope| -> ReelResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(cap);
            let (start, end) = (range.start.0, range.end.0);
            let sink_ref: &mut dyn FrameSink = sink;

            let encoder = scope.spawn(move || -> ReelResult<()> {
                sink_ref.begin(cfg)?;
                let mut next = start;
                let mut pending = HashMap::<u64, Arc<FrameRGBA>>::new();
                while next < end {
                    match pending.remove(&next) {
                        Some(frame) => {
                            sink_ref.push_frame(FrameIndex(next), &frame)?;
                            next += 1;
                        }
                        None => {
                            let msg = rx.recv().map_err(|_| {
                                ReelError::render("render workers stopped before the range ended")
                            })?;
                            pending.insert(msg.idx.0, msg.frame);
                        }
                    }
                }
                sink_ref.end()
            });

            let ctx = ChunkCtx {
                comp: &self.comp,
                assets_root: &self.assets_root,
                backend_opts,
                tx: &tx,
            };
            let produced = match pool.as_ref() {
                Some(pool) => self.produce_parallel(&ctx, pool, range, chunk_size),
                None => self.produce_sequential(&ctx, range, chunk_size),
            };
            drop(tx);

            let encoded = encoder
                .join()
                .map_err(|_| ReelError::render("sink thread panicked"))?;
            // A producer error usually disconnects the channel, so report it first.
            let stats = produced?;
            encoded?;
            Ok(stats)
        })?;

        tracing::debug!(
            rendered = stats.frames_rendered,
            elided = stats.frames_elided,
            "range rendered"
        );
        drop(audio_tmp);
        Ok(stats)
    }

    fn mix_audio(
        &self,
        range: FrameRange,
        guard: &mut TempFileGuard,
    ) -> ReelResult<Option<AudioInputConfig>> {
        let manifest = build_audio_manifest(&self.comp, &self.assets_root, range)?;
        if manifest.segments.is_empty() {
            return Ok(None);
        }
        let mixed = mix_manifest(&manifest);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let path = std::env::temp_dir().join(format!(
            "reelkit_mix_{}_{nanos}.f32le",
            std::process::id()
        ));
        write_mix_to_f32le_file(&mixed, &path)?;
        guard.0 = Some(path.clone());
        Ok(Some(AudioInputConfig {
            path,
            sample_rate: manifest.sample_rate,
            channels: manifest.channels,
        }))
    }

    fn produce_sequential(
        &self,
        ctx: &ChunkCtx<'_>,
        range: FrameRange,
        chunk_size: u64,
    ) -> ReelResult<RenderStats> {
        let mut backend = CpuBackend::new(ctx.assets_root.to_path_buf(), ctx.backend_opts.clone());
        let mut stats = RenderStats::default();
        for chunk in range.chunks(chunk_size) {
            let mut cache = HashMap::<FrameFingerprint, Arc<FrameRGBA>>::new();
            for f in chunk.start.0..chunk.end.0 {
                let evaluated = evaluate_frame(ctx.comp, FrameIndex(f));
                let fp = self
                    .opts
                    .static_frame_elision
                    .then(|| fingerprint_frame(&evaluated));
                if let Some(frame) = fp.and_then(|fp| cache.get(&fp)) {
                    stats.frames_elided += 1;
                    ctx.send(f, frame.clone())?;
                    continue;
                }
                let frame = Arc::new(backend.render_frame(ctx.comp.canvas, &evaluated)?);
                stats.frames_rendered += 1;
                if let Some(fp) = fp {
                    cache.insert(fp, frame.clone());
                }
                ctx.send(f, frame)?;
            }
            stats.frames_total += chunk.len_frames();
        }
        Ok(stats)
    }

    fn produce_parallel(
        &self,
        ctx: &ChunkCtx<'_>,
        pool: &rayon::ThreadPool,
        range: FrameRange,
        chunk_size: u64,
    ) -> ReelResult<RenderStats> {
        let mut stats = RenderStats::default();
        for chunk in range.chunks(chunk_size) {
            let (chunk_start, chunk_end) = (chunk.start.0, chunk.end.0);
            let total = chunk.len_frames();
            if self.opts.static_frame_elision {
                let (unique, frame_to_unique) =
                    render_unique_frames(ctx, pool, chunk_start, chunk_end)?;
                for (f, u) in (chunk_start..chunk_end).zip(frame_to_unique) {
                    ctx.send(f, unique[u].clone())?;
                }
                let rendered = unique.len() as u64;
                stats.frames_rendered += rendered;
                stats.frames_elided += total.saturating_sub(rendered);
            } else {
                render_and_send(ctx, pool, chunk_start, chunk_end)?;
                stats.frames_rendered += total;
            }
            stats.frames_total += total;
        }
        Ok(stats)
    }

    fn check_frame(&self, frame: FrameIndex) -> ReelResult<()> {
        if frame.0 >= self.comp.duration_frames {
            return Err(ReelError::validation(format!(
                "frame {} is outside the composition duration {}",
                frame.0, self.comp.duration_frames
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    frame: Arc<FrameRGBA>,
}

struct ChunkCtx<'a> {
    comp: &'a ResolvedComposition,
    assets_root: &'a Path,
    backend_opts: &'a CpuBackendOpts,
    tx: &'a mpsc::SyncSender<FrameMsg>,
}

impl ChunkCtx<'_> {
    fn worker(&self) -> CpuBackend {
        CpuBackend::new(self.assets_root.to_path_buf(), self.backend_opts.clone())
    }

    fn send(&self, f: u64, frame: Arc<FrameRGBA>) -> ReelResult<()> {
        self.tx
            .send(FrameMsg {
                idx: FrameIndex(f),
                frame,
            })
            .map_err(|_| ReelError::render("sink thread is no longer accepting frames"))
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    match threads {
        Some(0) => return Err(ReelError::validation("threads must be >= 1 when set")),
        Some(n) => builder = builder.num_threads(n),
        None => {}
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build render thread pool: {e}")))
}

/// Evaluate a chunk on the calling thread, then rasterize each distinct frame once in parallel.
fn render_unique_frames(
    ctx: &ChunkCtx<'_>,
    pool: &rayon::ThreadPool,
    start: u64,
    end: u64,
) -> ReelResult<(Vec<Arc<FrameRGBA>>, Vec<usize>)> {
    let mut unique = Vec::<EvaluatedFrame>::new();
    let mut seen = HashMap::<FrameFingerprint, usize>::new();
    let mut frame_to_unique = Vec::with_capacity((end - start) as usize);
    for f in start..end {
        let evaluated = evaluate_frame(ctx.comp, FrameIndex(f));
        let fp = fingerprint_frame(&evaluated);
        let u = *seen.entry(fp).or_insert_with(|| {
            unique.push(evaluated);
            unique.len() - 1
        });
        frame_to_unique.push(u);
    }

    let canvas = ctx.comp.canvas;
    let rendered = pool.install(|| {
        unique
            .par_iter()
            .map_init(
                || ctx.worker(),
                |backend, evaluated| backend.render_frame(canvas, evaluated).map(Arc::new),
            )
            .collect::<ReelResult<Vec<_>>>()
    })?;
    Ok((rendered, frame_to_unique))
}

fn render_and_send(
    ctx: &ChunkCtx<'_>,
    pool: &rayon::ThreadPool,
    start: u64,
    end: u64,
) -> ReelResult<()> {
    pool.install(|| {
        (start..end).into_par_iter().try_for_each_init(
            || ctx.worker(),
            |backend, f| -> ReelResult<()> {
                let evaluated = evaluate_frame(ctx.comp, FrameIndex(f));
                let frame = backend.render_frame(ctx.comp.canvas, &evaluated)?;
                ctx.send(f, Arc::new(frame))
            },
        )
    })
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
