//! Frame sinks: in-memory capture, MP4 through the system `ffmpeg`, and single-frame PNG output.

pub(crate) mod ffmpeg;
pub(crate) mod png;
pub(crate) mod sink;
