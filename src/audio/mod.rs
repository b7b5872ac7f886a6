//! Audio pipeline: manifest building and mixing, run once per range outside the frame loop.

pub(crate) mod manifest;
pub(crate) mod mix;
