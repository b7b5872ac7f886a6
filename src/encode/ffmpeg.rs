use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegSinkOpts {
    /// Destination MP4.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Straight-alpha background that transparent pixels are flattened onto.
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    /// Defaults: overwrite enabled, opaque black background.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

/// Pipes raw frames into a system `ffmpeg` process producing H.264/yuv420p MP4.
///
/// When the sink config carries audio, the mixed PCM file is muxed as AAC.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    cfg: Option<SinkConfig>,
    encoder: Option<Encoder>,
    scratch: Vec<u8>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Sink writing to `opts.out_path`. Nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            cfg: None,
            encoder: None,
            scratch: Vec::new(),
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        check_sink_config(&cfg)?;
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ReelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(ReelError::render(
                "MP4 output needs ffmpeg, which was not found on PATH",
            ));
        }

        let args = ffmpeg_args(&cfg, &self.opts);
        tracing::debug!(?args, "spawning ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::render(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::render("ffmpeg stdin unavailable"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::render("ffmpeg stderr unavailable"))?;
        let drain = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf)?;
            Ok(buf)
        });

        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.encoder = Some(Encoder {
            child,
            stdin: Some(stdin),
            stderr: Some(drain),
        });
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::render("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(ReelError::render(format!(
                "ffmpeg sink got frame {} after frame {}",
                idx.0, last.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        flatten_over_background(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;

        let stdin = self
            .encoder
            .as_mut()
            .and_then(|e| e.stdin.as_mut())
            .ok_or_else(|| ReelError::render("ffmpeg sink already finished"))?;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| ReelError::render(format!("writing frame to ffmpeg failed: {e}")))?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        let mut enc = self
            .encoder
            .take()
            .ok_or_else(|| ReelError::render("ffmpeg sink not started"))?;
        drop(enc.stdin.take());

        let status = enc
            .child
            .wait()
            .map_err(|e| ReelError::render(format!("waiting for ffmpeg failed: {e}")))?;
        let stderr = match enc.stderr.take() {
            Some(h) => h
                .join()
                .map_err(|_| ReelError::render("ffmpeg stderr reader panicked"))?
                .map_err(|e| ReelError::render(format!("reading ffmpeg stderr failed: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            return Err(ReelError::render(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        tracing::info!(out = %self.opts.out_path.display(), "wrote mp4");
        Ok(())
    }
}

fn check_sink_config(cfg: &SinkConfig) -> ReelResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(ReelError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(ReelError::validation("MP4 width/height must be non-zero"));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(ReelError::validation(format!(
            "MP4 output needs even dimensions (yuv420p), got {}x{}",
            cfg.width, cfg.height
        )));
    }
    if let Some(audio) = &cfg.audio
        && (audio.sample_rate == 0 || audio.channels == 0)
    {
        return Err(ReelError::validation(
            "audio sample rate and channel count must be non-zero",
        ));
    }
    Ok(())
}

/// Full ffmpeg argument list: raw RGBA on stdin, optional f32le audio file, MP4 out.
pub(crate) fn ffmpeg_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |s: &str| args.push(s.into());

    push(if opts.overwrite { "-y" } else { "-n" });
    for a in ["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba", "-s"] {
        push(a);
    }
    push(&format!("{}x{}", cfg.width, cfg.height));
    // Input rate goes before `-i`; rational so 30000/1001 stays exact.
    push("-r");
    push(&format!("{}/{}", cfg.fps.num, cfg.fps.den));
    push("-i");
    push("pipe:0");

    match &cfg.audio {
        Some(audio) => {
            push("-f");
            push("f32le");
            push("-ar");
            push(&audio.sample_rate.to_string());
            push("-ac");
            push(&audio.channels.to_string());
            push("-i");
            args.push(audio.path.clone().into_os_string());
            args.extend(
                [
                    "-c:v",
                    "libx264",
                    "-pix_fmt",
                    "yuv420p",
                    "-c:a",
                    "aac",
                    "-shortest",
                ]
                .map(OsString::from),
            );
        }
        None => {
            args.extend(["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"].map(OsString::from));
        }
    }
    args.extend(["-movflags", "+faststart"].map(OsString::from));
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Composite premultiplied RGBA8 over an opaque background.
pub(crate) fn flatten_over_background(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> ReelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "frame byte length does not match width*height*4",
        ));
    }
    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let inv = 255 - u16::from(s[3]);
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Create the parent directory of `path` when missing.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    use anyhow::Context as _;

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
