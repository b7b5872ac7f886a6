use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::schema::validate::{SchemaError, SchemaErrors, SchemaPathElem};
use crate::timeline::model::{CompositionDef, FpsDef};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default frame rate when the document omits `fps`.
pub const DEFAULT_FPS: u32 = 30;
/// Default canvas width.
pub const DEFAULT_WIDTH: u32 = 1920;
/// Default canvas height.
pub const DEFAULT_HEIGHT: u32 = 1080;

/// A parsed timeline document.
///
/// Parsing only checks JSON shape. Structural checks live in [`Composition::validate`] and item
/// configuration is validated when a [`crate::RenderSession`] resolves the composition.
#[derive(Debug, Clone)]
pub struct Composition {
    def: CompositionDef,
}

impl Composition {
    /// Parse a composition from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        let def: CompositionDef = serde_json::from_reader(r)
            .map_err(|e| ReelError::validation(format!("parse composition JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a composition from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open composition JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse a composition from an in-memory JSON value.
    pub fn from_value(value: serde_json::Value) -> ReelResult<Self> {
        let def: CompositionDef = serde_json::from_value(value)
            .map_err(|e| ReelError::validation(format!("parse composition JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Wrap an already-built document.
    pub fn from_def(def: CompositionDef) -> Self {
        Self { def }
    }

    /// Borrow the wire document.
    pub fn def(&self) -> &CompositionDef {
        &self.def
    }

    /// Check document-level structure: frame rate, canvas size and item windows.
    pub fn validate(&self) -> ReelResult<()> {
        self.fps()?;
        let canvas = self.canvas();
        if canvas.width == 0 || canvas.height == 0 {
            return Err(ReelError::validation("canvas width/height must be > 0"));
        }

        let mut errors = Vec::new();
        for (ti, track) in self.def.tracks.iter().enumerate() {
            for (ii, item) in track.items.iter().enumerate() {
                let at = |key: &str| {
                    vec![
                        SchemaPathElem::Field("tracks".to_owned()),
                        SchemaPathElem::Index(ti),
                        SchemaPathElem::Field("items".to_owned()),
                        SchemaPathElem::Index(ii),
                        SchemaPathElem::Field(key.to_owned()),
                    ]
                };
                if item.id.trim().is_empty() {
                    errors.push(SchemaError::at(&at("id"), "item id must be non-empty"));
                }
                if item.kind.trim().is_empty() {
                    errors.push(SchemaError::at(&at("type"), "item type must be non-empty"));
                }
                if item.from < 0 {
                    errors.push(SchemaError::at(
                        &at("from"),
                        format!("must be >= 0, got {}", item.from),
                    ));
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ReelError::validation(SchemaErrors { errors }.to_string()))
        }
    }

    /// Frame rate, defaulting to 30.
    pub fn fps(&self) -> ReelResult<Fps> {
        match self.def.fps {
            None => Fps::new(DEFAULT_FPS, 1),
            Some(FpsDef::Whole(n)) => Fps::new(n, 1),
            Some(FpsDef::Rational { num, den }) => Fps::new(num, den),
        }
    }

    /// Canvas size, defaulting to 1920x1080.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.def.width.unwrap_or(DEFAULT_WIDTH),
            height: self.def.height.unwrap_or(DEFAULT_HEIGHT),
        }
    }

    /// Declared duration, or the latest item end when undeclared.
    pub fn duration_frames(&self) -> u64 {
        self.def.duration_in_frames.unwrap_or_else(|| {
            self.def
                .tracks
                .iter()
                .flat_map(|t| t.items.iter())
                .filter_map(|i| i.end())
                .max()
                .unwrap_or(0)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/composition.rs"]
mod tests;
