//! Timeline wire model: tracks of time-scoped items.

pub(crate) mod composition;
pub(crate) mod model;
pub(crate) mod primitive;
pub(crate) mod window;
