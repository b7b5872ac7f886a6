//! Animation registry: the table mapping item `type` ids to renderers and schemas.

pub(crate) mod animation;
pub(crate) mod store;
