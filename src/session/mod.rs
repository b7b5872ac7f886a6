//! Resolved compositions: single-frame evaluation and ordered range rendering into sinks.

pub(crate) mod render_session;
