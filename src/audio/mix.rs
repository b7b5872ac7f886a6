use crate::audio::manifest::{AudioManifest, AudioSegment};
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use std::path::Path;

/// Mix all manifest segments into interleaved output PCM, clamped to `[-1, 1]`.
pub(crate) fn mix_manifest(manifest: &AudioManifest) -> Vec<f32> {
    let frames = manifest.total_samples as usize;
    let mut out = vec![0.0f32; frames * usize::from(manifest.channels)];

    for seg in &manifest.segments {
        mix_segment(&mut out, manifest, seg);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn mix_segment(out: &mut [f32], manifest: &AudioManifest, seg: &AudioSegment) {
    let src = seg.source_interleaved_f32.as_ref();
    let src_channels = usize::from(seg.source_channels.max(1));
    let src_frames = src.len() / src_channels;
    let out_frames = out.len() / usize::from(manifest.channels.max(1));
    if src_frames == 0 {
        return;
    }

    let end = (seg.timeline_end_sample as usize).min(out_frames);
    for dst_sample in (seg.timeline_start_sample as usize)..end {
        let rel_samples = dst_sample as u64 - seg.timeline_start_sample;
        let rel_sec = rel_samples as f64 / f64::from(manifest.sample_rate);
        let src_pos = (seg.source_start_sec + rel_sec * seg.playback_rate)
            * f64::from(seg.source_sample_rate);
        if !src_pos.is_finite() || src_pos < 0.0 {
            break;
        }
        let f0 = src_pos.floor() as usize;
        if f0 >= src_frames {
            tracing::debug!(item = %seg.item_id, "audio source ended before its item window");
            break;
        }
        let f1 = (f0 + 1).min(src_frames - 1);
        let frac = (src_pos - f0 as f64) as f32;
        let lerp = |a: f32, b: f32| a + (b - a) * frac;

        let (l, r) = if src_channels == 1 {
            let v = lerp(src[f0], src[f1]);
            (v, v)
        } else {
            let i0 = f0 * src_channels;
            let i1 = f1 * src_channels;
            (lerp(src[i0], src[i1]), lerp(src[i0 + 1], src[i1 + 1]))
        };

        let dst_idx = dst_sample * usize::from(manifest.channels);
        out[dst_idx] += l * seg.volume;
        if manifest.channels > 1 {
            out[dst_idx + 1] += r * seg.volume;
        }
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub(crate) fn write_mix_to_f32le_file(samples: &[f32], out_path: &Path) -> ReelResult<()> {
    let mut bytes = Vec::<u8>::with_capacity(samples.len() * 4);
    for &sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::render(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

/// Convert a frame delta to the nearest sample index at `sample_rate`.
pub(crate) fn frame_to_sample(frame_delta: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frame_delta) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((num + (den / 2)) / den) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
