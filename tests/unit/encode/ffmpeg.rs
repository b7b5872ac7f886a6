use super::*;
use crate::encode::sink::AudioInputConfig;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30000, 1001).unwrap(),
        audio: None,
    }
}

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn transparent_pixels_become_background() {
    let mut dst = vec![0u8; 4];
    flatten_over_background(&mut dst, &[0, 0, 0, 0], [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn opaque_pixels_pass_through() {
    let mut dst = vec![0u8; 4];
    flatten_over_background(&mut dst, &[1, 2, 3, 255], [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn half_alpha_blends_with_background() {
    let mut dst = vec![0u8; 4];
    flatten_over_background(&mut dst, &[128, 0, 0, 128], [0, 0, 255, 255]).unwrap();
    assert_eq!(dst[0], 128);
    assert_eq!(dst[1], 0);
    assert!((126..=128).contains(&dst[2]));
    assert_eq!(dst[3], 255);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_over_background(&mut dst, &[0; 4], [0, 0, 0, 255]).is_err());
}

#[test]
fn odd_dimensions_are_rejected() {
    assert!(check_sink_config(&cfg(33, 32)).is_err());
    assert!(check_sink_config(&cfg(32, 0)).is_err());
    assert!(check_sink_config(&cfg(32, 32)).is_ok());
}

#[test]
fn args_without_audio_disable_audio_stream() {
    let opts = FfmpegSinkOpts::new("out/video.mp4");
    let args = strings(&ffmpeg_args(&cfg(64, 32), &opts));
    assert_eq!(args[0], "-y");
    assert!(args.windows(2).any(|w| w == ["-s", "64x32"]));
    assert!(args.windows(2).any(|w| w == ["-r", "30000/1001"]));
    assert!(args.contains(&"-an".to_owned()));
    assert!(!args.contains(&"aac".to_owned()));
    assert_eq!(args.last().map(String::as_str), Some("out/video.mp4"));
}

#[test]
fn args_with_audio_add_second_input() {
    let mut c = cfg(64, 32);
    c.audio = Some(AudioInputConfig {
        path: PathBuf::from("/tmp/mix.f32le"),
        sample_rate: 48_000,
        channels: 2,
    });
    let mut opts = FfmpegSinkOpts::new("v.mp4");
    opts.overwrite = false;
    let args = strings(&ffmpeg_args(&c, &opts));
    assert_eq!(args[0], "-n");
    assert!(args.windows(2).any(|w| w == ["-i", "/tmp/mix.f32le"]));
    assert!(args.windows(2).any(|w| w == ["-ar", "48000"]));
    assert!(args.windows(2).any(|w| w == ["-c:a", "aac"]));
    assert!(args.contains(&"-shortest".to_owned()));
    assert!(!args.contains(&"-an".to_owned()));
}

#[test]
fn refuses_existing_file_without_overwrite() {
    let path = std::env::temp_dir().join(format!("reelkit_exists_{}.mp4", std::process::id()));
    std::fs::write(&path, b"x").unwrap();
    let mut opts = FfmpegSinkOpts::new(&path);
    opts.overwrite = false;
    let mut sink = FfmpegSink::new(opts);
    let err = sink.begin(cfg(32, 32)).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}
