//! Rasterization of evaluated frames.

pub(crate) mod backend;
pub(crate) mod cpu;
