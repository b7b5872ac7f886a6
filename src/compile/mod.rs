//! Composition resolution and frame fingerprints.

pub(crate) mod fingerprint;
pub(crate) mod resolve;
