//! Per-frame evaluation of a resolved composition.

pub(crate) mod evaluator;
