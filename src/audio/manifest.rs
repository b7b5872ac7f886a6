use crate::assets::media::{self, AudioPcm, decode_audio_f32_stereo};
use crate::assets::store::resolve_asset_path;
use crate::audio::mix::frame_to_sample;
use crate::compile::resolve::ResolvedComposition;
use crate::foundation::core::FrameRange;
use crate::foundation::error::{ReelError, ReelResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Debug)]
/// One scheduled audio contribution in output sample space.
pub(crate) struct AudioSegment {
    pub(crate) item_id: String,
    pub(crate) timeline_start_sample: u64,
    pub(crate) timeline_end_sample: u64,
    pub(crate) source_start_sec: f64,
    pub(crate) playback_rate: f64,
    pub(crate) volume: f32,
    pub(crate) source_sample_rate: u32,
    pub(crate) source_channels: u16,
    pub(crate) source_interleaved_f32: Arc<Vec<f32>>,
}

#[derive(Clone, Debug)]
/// Audio rendering plan for a timeline frame range.
pub(crate) struct AudioManifest {
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
    pub(crate) total_samples: u64,
    pub(crate) segments: Vec<AudioSegment>,
}

/// Build the audio plan for `range` from voice and video items.
///
/// Sources that fail to decode are skipped with a warning; the rest of the mix still plays.
pub(crate) fn build_audio_manifest(
    comp: &ResolvedComposition,
    assets_root: &Path,
    range: FrameRange,
) -> ReelResult<AudioManifest> {
    if range.is_empty() {
        return Err(ReelError::validation("audio manifest range must be non-empty"));
    }
    if range.end.0 > comp.duration_frames {
        return Err(ReelError::validation(
            "audio manifest range must be within composition duration",
        ));
    }

    let sample_rate = media::MIX_SAMPLE_RATE;
    let mut pcm_cache = HashMap::<String, Option<CachedPcm>>::new();
    let mut segments = Vec::new();

    for item in &comp.items {
        let Some(source) = item.renderer.audio() else {
            continue;
        };
        let start = item.window.from.max(range.start.0);
        let end = item.window.end().min(range.end.0);
        if start >= end {
            continue;
        }

        let pcm = pcm_cache
            .entry(source.src.clone())
            .or_insert_with(|| match decode_source(assets_root, &source.src) {
                Ok(pcm) => Some(CachedPcm {
                    sample_rate: pcm.sample_rate,
                    channels: pcm.channels,
                    data: Arc::new(pcm.interleaved_f32),
                }),
                Err(e) => {
                    tracing::warn!(
                        item = %item.id,
                        src = %source.src,
                        error = %e,
                        "skipping audio source"
                    );
                    None
                }
            })
            .clone();
        let Some(pcm) = pcm else { continue };
        if pcm.data.is_empty() {
            continue;
        }

        let local_secs = comp.fps.frames_to_secs(start - item.window.from);
        segments.push(AudioSegment {
            item_id: item.id.clone(),
            timeline_start_sample: frame_to_sample(start - range.start.0, comp.fps, sample_rate),
            timeline_end_sample: frame_to_sample(end - range.start.0, comp.fps, sample_rate),
            source_start_sec: source.source_time_secs(local_secs),
            playback_rate: source.playback_rate.max(0.0),
            volume: source.volume.max(0.0) as f32,
            source_sample_rate: pcm.sample_rate,
            source_channels: pcm.channels,
            source_interleaved_f32: pcm.data,
        });
    }

    Ok(AudioManifest {
        sample_rate,
        channels: 2,
        total_samples: frame_to_sample(range.len_frames(), comp.fps, sample_rate),
        segments,
    })
}

#[derive(Clone, Debug)]
struct CachedPcm {
    sample_rate: u32,
    channels: u16,
    data: Arc<Vec<f32>>,
}

fn decode_source(assets_root: &Path, src: &str) -> ReelResult<AudioPcm> {
    let path = resolve_asset_path(assets_root, src)?;
    decode_audio_f32_stereo(&path, media::MIX_SAMPLE_RATE)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/manifest.rs"]
mod tests;
