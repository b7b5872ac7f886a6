//! Video frames and audio tracks decoded by the system `ffmpeg`/`ffprobe`.
//!
//! Only process spawning depends on the `media-ffmpeg` feature. Without it every decode fails
//! with an asset error, which the backend turns into a placeholder.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Output;

use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate shared by audio decode, mix and encode.
pub(crate) const MIX_SAMPLE_RATE: u32 = 48_000;

/// A probed video source.
#[derive(Clone, Debug)]
pub(crate) struct VideoSourceInfo {
    pub(crate) source_path: PathBuf,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl VideoSourceInfo {
    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Interleaved `f32` PCM.
#[derive(Clone, Debug)]
pub(crate) struct AudioPcm {
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
    pub(crate) interleaved_f32: Vec<f32>,
}

#[cfg(feature = "media-ffmpeg")]
fn run(program: &str, args: Vec<OsString>) -> ReelResult<Output> {
    std::process::Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ReelError::asset(format!("failed to run {program}: {e}")))
}

#[cfg(not(feature = "media-ffmpeg"))]
fn run(program: &str, _args: Vec<OsString>) -> ReelResult<Output> {
    Err(ReelError::asset(format!(
        "{program} decoding requires the 'media-ffmpeg' feature"
    )))
}

fn failure(what: &str, path: &Path, out: &Output) -> ReelError {
    ReelError::asset(format!(
        "{what} failed for '{}': {}",
        path.display(),
        String::from_utf8_lossy(&out.stderr).trim()
    ))
}

fn probe_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=width,height",
        "-of",
        "csv=p=0",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(path.into());
    args
}

fn frame_args(path: &Path, source_time_secs: f64) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-v".into(), "error".into()];
    args.push("-ss".into());
    args.push(format!("{:.6}", source_time_secs.max(0.0)).into());
    args.push("-i".into());
    args.push(path.into());
    for a in ["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"] {
        args.push(a.into());
    }
    args
}

fn audio_args(path: &Path, sample_rate: u32) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-v".into(), "error".into(), "-i".into(), path.into()];
    for a in ["-vn", "-f", "f32le", "-acodec", "pcm_f32le", "-ac", "2", "-ar"] {
        args.push(a.into());
    }
    args.push(sample_rate.to_string().into());
    args.push("pipe:1".into());
    args
}

/// Parse `width,height` as printed by `ffprobe -of csv=p=0`.
fn parse_probe_dimensions(stdout: &[u8]) -> ReelResult<(u32, u32)> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| ReelError::asset("no video stream found"))?;
    let mut parts = line.split(',').map(|p| p.trim().parse::<u32>());
    match (parts.next(), parts.next()) {
        (Some(Ok(w)), Some(Ok(h))) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(ReelError::asset(format!(
            "unexpected ffprobe dimensions '{line}'"
        ))),
    }
}

fn f32le_samples(bytes: &[u8]) -> ReelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::asset(
            "decoded audio length is not a whole number of f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// `true` when ffmpeg failed only because the input has no audio stream.
fn lacks_audio_stream(stderr: &str) -> bool {
    stderr.contains("matches no streams") || stderr.contains("does not contain any stream")
}

/// Look up the dimensions of the first video stream.
pub(crate) fn probe_video(source_path: &Path) -> ReelResult<VideoSourceInfo> {
    let out = run("ffprobe", probe_args(source_path))?;
    if !out.status.success() {
        return Err(failure("ffprobe", source_path, &out));
    }
    let (width, height) = parse_probe_dimensions(&out.stdout)?;
    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
    })
}

/// Straight-alpha RGBA8 frame nearest to `source_time_secs`.
pub(crate) fn decode_video_frame_rgba8(
    source: &VideoSourceInfo,
    source_time_secs: f64,
) -> ReelResult<Vec<u8>> {
    let out = run("ffmpeg", frame_args(&source.source_path, source_time_secs))?;
    if !out.status.success() {
        return Err(failure("video decode", &source.source_path, &out));
    }
    let expected = source.frame_len();
    let mut frame = out.stdout;
    if expected == 0 || frame.len() < expected {
        return Err(ReelError::asset(format!(
            "video decode of '{}' returned {} bytes, expected {expected}",
            source.source_path.display(),
            frame.len()
        )));
    }
    frame.truncate(expected);
    Ok(frame)
}

/// Stereo PCM of a media file's audio track; empty when the file has none.
pub(crate) fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
    let out = run("ffmpeg", audio_args(path, sample_rate))?;
    let interleaved_f32 = if out.status.success() {
        f32le_samples(&out.stdout)?
    } else if lacks_audio_stream(&String::from_utf8_lossy(&out.stderr)) {
        Vec::new()
    } else {
        return Err(failure("audio decode", path, &out));
    };
    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
