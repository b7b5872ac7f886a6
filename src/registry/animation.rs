use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::scene::model::Scene;
use crate::schema::field::Schema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Per-frame input of an animation render.
///
/// `frame` is relative to the start of the owning timeline item, so an animation never observes
/// absolute timeline time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCtx {
    /// Frame relative to the item start (`0` on the first active frame).
    pub frame: u64,
    /// Length of the item window in frames (always `>= 1` while rendering).
    pub duration_frames: u64,
    /// Composition frame rate.
    pub fps: Fps,
    /// Output canvas.
    pub canvas: Canvas,
}

impl RenderCtx {
    /// Normalized position inside the item window: `0.0` on the first frame, `1.0` on the last.
    pub fn progress(&self) -> f64 {
        if self.duration_frames <= 1 {
            return 1.0;
        }
        (self.frame as f64 / (self.duration_frames - 1) as f64).clamp(0.0, 1.0)
    }

    /// Elapsed item-local time in seconds.
    pub fn secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frame)
    }

    /// Frames remaining after this one.
    pub fn frames_left(&self) -> u64 {
        self.duration_frames.saturating_sub(self.frame + 1)
    }
}

/// A parameterized visual effect.
///
/// Rendering must be a pure function of `(ctx, config)`: no wall clock, no interior caches, no
/// unseeded randomness. Any frame may be rendered any number of times in any order.
pub trait Animation: Send + Sync + 'static {
    /// Typed configuration, bound from schema-validated properties.
    type Config: DeserializeOwned + Send + Sync + 'static;

    /// Declared parameters and their defaults.
    fn schema(&self) -> Schema;

    /// Produce the display list for one item-local frame.
    fn render(&self, ctx: &RenderCtx, config: &Self::Config) -> Scene;
}

/// An animation with its configuration already bound.
pub trait BoundAnimation: Send + Sync {
    /// Render one item-local frame.
    fn render(&self, ctx: &RenderCtx) -> Scene;
}

/// Object-safe view of an [`Animation`], stored in registry entries.
pub trait DynAnimation: Send + Sync {
    /// Declared parameters and their defaults.
    fn schema(&self) -> Schema;

    /// Bind already-validated properties to the typed configuration.
    fn bind(&self, props: Map<String, Value>) -> ReelResult<Arc<dyn BoundAnimation>>;
}

struct Erased<A>(Arc<A>);

struct Bound<A: Animation> {
    animation: Arc<A>,
    config: A::Config,
}

impl<A: Animation> BoundAnimation for Bound<A> {
    fn render(&self, ctx: &RenderCtx) -> Scene {
        self.animation.render(ctx, &self.config)
    }
}

impl<A: Animation> DynAnimation for Erased<A> {
    fn schema(&self) -> Schema {
        self.0.schema()
    }

    fn bind(&self, props: Map<String, Value>) -> ReelResult<Arc<dyn BoundAnimation>> {
        let config = serde_json::from_value::<A::Config>(Value::Object(props))
            .map_err(|e| ReelError::serde(format!("failed to bind animation config: {e}")))?;
        Ok(Arc::new(Bound {
            animation: self.0.clone(),
            config,
        }))
    }
}

/// Erase a concrete animation into a shareable trait object.
pub fn erase<A: Animation>(animation: A) -> Arc<dyn DynAnimation> {
    Arc::new(Erased(Arc::new(animation)))
}

#[cfg(test)]
#[path = "../../tests/unit/registry/animation.rs"]
mod tests;
