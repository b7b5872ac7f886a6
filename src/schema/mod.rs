//! Configuration schemas for animations and primitives.
//!
//! A [`Schema`] declares the fields an animation accepts. Validation fills defaults (including
//! inside nested objects and arrays of objects) and collects every type mismatch with its JSON
//! path before anything is rendered.

pub(crate) mod field;
pub(crate) mod validate;
