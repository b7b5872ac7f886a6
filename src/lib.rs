//! reelkit turns a registry of parameterized animation templates and a JSON timeline into video.
//!
//! The flow is:
//!
//! - register animations in an [`AnimationRegistry`] (or start from
//!   [`AnimationRegistry::with_builtin_templates`])
//! - load a [`Composition`] (tracks of time-scoped items)
//! - create a [`RenderSession`], which resolves every item eagerly: unknown `type` tags and
//!   invalid configurations fail here, never mid-render
//! - evaluate display lists, rasterize single frames, or stream a range into a [`FrameSink`]
//!
//! Animations are pure functions of an item-local [`RenderCtx`] and a typed configuration, so
//! frames can be rendered in any order and in parallel with byte-identical results.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod audio;
mod compile;
mod encode;
mod eval;
mod foundation;
mod registry;
mod render;
mod scene;
mod schema;
mod session;
mod timeline;

/// Built-in animation templates.
pub mod templates;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::interpolate::{
    Extrapolate, InterpolateOpts, interpolate, interpolate_clamped, interpolate_piecewise,
};
pub use crate::animation::spring::{SpringConfig, settle_frames, spring, spring_between};

pub use crate::schema::field::{Field, FieldKind, Schema};
pub use crate::schema::validate::{SchemaError, SchemaErrors, SchemaPathElem};

pub use crate::registry::animation::{Animation, BoundAnimation, DynAnimation, RenderCtx, erase};
pub use crate::registry::store::{AnimationRegistry, RegistryEntry};

pub use crate::timeline::composition::{Composition, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use crate::timeline::model::{CompositionDef, FpsDef, ItemDef, RESERVED_ITEM_KEYS, TrackDef};
pub use crate::timeline::primitive::PrimitiveKind;
pub use crate::timeline::window::{ItemPhase, ItemWindow};

pub use crate::scene::color::ColorDef;
pub use crate::scene::model::{
    AudioCue, DrawNode, EvaluatedFrame, Fit, Layer, Scene, Shape, TextAlign, TextRun,
};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::encode::png::write_png;
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::CpuBackendOpts;
pub use crate::session::render_session::{
    ItemSummary, RenderSession, RenderSessionOpts, RenderStats,
};
