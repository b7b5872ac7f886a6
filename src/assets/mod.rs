//! Asset access: path rules, image decode, ffmpeg-backed media and text layout.

pub(crate) mod decode;
pub(crate) mod media;
pub(crate) mod store;
