use crate::foundation::error::ReelResult;
use crate::registry::animation::{Animation, DynAnimation, RenderCtx, erase};
use crate::scene::model::Scene;
use crate::schema::field::Schema;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered animation: renderer, schema, defaults and display metadata.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Unique identifier referenced by timeline items' `type`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Optional grouping used by listings.
    pub category: Option<String>,
    /// Optional preview asset path.
    pub thumbnail: Option<String>,
    /// Configuration schema.
    pub schema: Schema,
    /// Properties a listing uses to render a preview.
    pub default_props: Value,
    /// Type-erased renderer.
    pub component: Arc<dyn DynAnimation>,
}

impl RegistryEntry {
    /// Build an entry from a concrete animation; schema and default props come from it.
    pub fn new<A: Animation>(id: impl Into<String>, name: impl Into<String>, animation: A) -> Self {
        let component = erase(animation);
        let schema = component.schema();
        let default_props = schema.default_props();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: None,
            thumbnail: None,
            schema,
            default_props,
            component,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the thumbnail path.
    pub fn thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Override the preview properties derived from the schema.
    pub fn default_props(mut self, props: Value) -> Self {
        self.default_props = props;
        self
    }

    /// Validate `props`, bind them and render one frame.
    pub fn preview(&self, ctx: &RenderCtx, props: &Value) -> ReelResult<Scene> {
        let validated = self.schema.validate(props)?;
        let bound = self.component.bind(validated)?;
        Ok(bound.render(ctx))
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("thumbnail", &self.thumbnail)
            .finish_non_exhaustive()
    }
}

/// Table of registered animations keyed by id.
///
/// Entries keep registration order. Registering an existing id replaces the entry in place, so
/// its position in [`AnimationRegistry::all`] does not move.
#[derive(Clone, Debug, Default)]
pub struct AnimationRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl AnimationRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in template library.
    pub fn with_builtin_templates() -> Self {
        let mut reg = Self::new();
        crate::templates::register_builtin(&mut reg);
        reg
    }

    /// Insert `entry`, replacing any entry with the same id.
    pub fn register(&mut self, entry: RegistryEntry) {
        match self.index.get(&entry.id) {
            Some(&i) => {
                tracing::debug!(id = %entry.id, "replacing registered animation");
                self.entries[i] = entry;
            }
            None => {
                self.index.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Snapshot of every entry in registration order.
    pub fn all(&self) -> Vec<RegistryEntry> {
        self.entries.clone()
    }

    /// Entry registered under `id`.
    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Entries whose category equals `category` exactly; uncategorized entries never match.
    pub fn by_category(&self, category: &str) -> Vec<&RegistryEntry> {
        self.entries
            .iter()
            .filter(|e| e.category.as_deref() == Some(category))
            .collect()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out = Vec::<&str>::new();
        for c in self.entries.iter().filter_map(|e| e.category.as_deref()) {
            if !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/store.rs"]
mod tests;
