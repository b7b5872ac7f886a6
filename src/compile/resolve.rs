use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::registry::animation::{BoundAnimation, RenderCtx};
use crate::registry::store::AnimationRegistry;
use crate::scene::model::Scene;
use crate::schema::field::Schema;
use crate::schema::validate::{SchemaErrors, SchemaPathElem};
use crate::timeline::composition::Composition;
use crate::timeline::model::RESERVED_ITEM_KEYS;
use crate::timeline::primitive::{AudioSource, BoundPrimitive, PrimitiveKind};
use crate::timeline::window::ItemWindow;
use std::sync::Arc;

/// Renderer selected for an item: a fixed primitive or a registered animation.
#[derive(Clone)]
pub(crate) enum ItemRenderer {
    Primitive(BoundPrimitive),
    Animation {
        id: String,
        bound: Arc<dyn BoundAnimation>,
    },
}

impl ItemRenderer {
    pub(crate) fn render(&self, ctx: &RenderCtx) -> Scene {
        match self {
            Self::Primitive(p) => p.render(ctx),
            Self::Animation { bound, .. } => bound.render(ctx),
        }
    }

    pub(crate) fn audio(&self) -> Option<AudioSource> {
        match self {
            Self::Primitive(p) => p.audio(),
            Self::Animation { .. } => None,
        }
    }

    pub(crate) fn type_name(&self) -> &str {
        match self {
            Self::Primitive(BoundPrimitive::Solid(_)) => PrimitiveKind::Solid.tag(),
            Self::Primitive(BoundPrimitive::Text(_)) => PrimitiveKind::Text.tag(),
            Self::Primitive(BoundPrimitive::Video(_)) => PrimitiveKind::Video.tag(),
            Self::Primitive(BoundPrimitive::Voice(_)) => PrimitiveKind::Voice.tag(),
            Self::Animation { id, .. } => id,
        }
    }
}

/// One item after lookup, validation and binding.
#[derive(Clone)]
pub(crate) struct ResolvedItem {
    pub(crate) id: String,
    pub(crate) track_index: usize,
    pub(crate) window: ItemWindow,
    pub(crate) renderer: ItemRenderer,
}

/// A composition whose every item is ready to render. Items are stored bottom to top.
#[derive(Clone)]
pub(crate) struct ResolvedComposition {
    pub(crate) fps: Fps,
    pub(crate) canvas: Canvas,
    pub(crate) duration_frames: u64,
    pub(crate) items: Vec<ResolvedItem>,
}

/// Resolve every item of `comp` against `registry`.
///
/// Unknown item types fail immediately. Configuration problems are collected across all items
/// and reported together, with paths rooted at the document (`$.tracks[0].items[1].fontSize`).
#[tracing::instrument(skip_all, fields(tracks = comp.def().tracks.len()))]
pub(crate) fn resolve(
    comp: &Composition,
    registry: &AnimationRegistry,
) -> ReelResult<ResolvedComposition> {
    comp.validate()?;

    let mut errors = Vec::new();
    let mut pending = Vec::new();
    let mut path = Vec::<SchemaPathElem>::new();

    for (ti, track) in comp.def().tracks.iter().enumerate() {
        for (ii, item) in track.items.iter().enumerate() {
            path.clear();
            path.extend([
                SchemaPathElem::Field("tracks".to_owned()),
                SchemaPathElem::Index(ti),
                SchemaPathElem::Field("items".to_owned()),
                SchemaPathElem::Index(ii),
            ]);

            let target = match PrimitiveKind::from_type(&item.kind) {
                Some(kind) => Target::Primitive(kind),
                None => match registry.get(&item.kind) {
                    Some(entry) => Target::Registered(entry),
                    None => return Err(ReelError::unknown_item_type(&item.id, &item.kind)),
                },
            };

            let schema = match &target {
                Target::Primitive(kind) => kind.schema(),
                Target::Registered(entry) => {
                    if let Some(key) = reserved_field(&entry.schema) {
                        return Err(ReelError::validation(format!(
                            "animation \"{}\" declares reserved item key \"{key}\" as config",
                            entry.id
                        )));
                    }
                    entry.schema.clone()
                }
            };
            let before = errors.len();
            let props = schema.validate_map_at(&item.props, &mut path, &mut errors);
            if errors.len() != before {
                continue;
            }

            let renderer = match target {
                Target::Primitive(kind) => ItemRenderer::Primitive(kind.bind(props)?),
                Target::Registered(entry) => ItemRenderer::Animation {
                    id: entry.id.clone(),
                    bound: entry.component.bind(props)?,
                },
            };
            pending.push(ResolvedItem {
                id: item.id.clone(),
                track_index: ti,
                window: ItemWindow::new(item.from.max(0) as u64, item.duration_in_frames),
                renderer,
            });
        }
    }

    if !errors.is_empty() {
        return Err(ReelError::ConfigValidation(SchemaErrors { errors }));
    }

    let resolved = ResolvedComposition {
        fps: comp.fps()?,
        canvas: comp.canvas(),
        duration_frames: comp.duration_frames(),
        items: pending,
    };
    tracing::debug!(
        items = resolved.items.len(),
        duration_frames = resolved.duration_frames,
        "composition resolved"
    );
    Ok(resolved)
}

fn reserved_field(schema: &Schema) -> Option<&str> {
    schema
        .fields()
        .iter()
        .map(|f| f.name.as_str())
        .find(|name| RESERVED_ITEM_KEYS.contains(name))
}

enum Target<'a> {
    Primitive(PrimitiveKind),
    Registered(&'a crate::registry::store::RegistryEntry),
}

#[cfg(test)]
#[path = "../../tests/unit/compile/resolve.rs"]
mod tests;
