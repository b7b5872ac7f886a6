//! Display-list output of renderers.

pub(crate) mod color;
pub(crate) mod model;
