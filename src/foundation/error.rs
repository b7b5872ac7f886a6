use crate::schema::validate::SchemaErrors;

/// Crate-wide result alias.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error taxonomy for registry, timeline, rendering and encoding.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// One or more item configurations failed schema validation.
    #[error("config validation error: {0}")]
    ConfigValidation(SchemaErrors),

    /// A timeline item names neither a primitive kind nor a registered animation.
    #[error("unknown item type \"{type_name}\" (item \"{item_id}\")")]
    UnknownItemType {
        /// Id of the offending timeline item.
        item_id: String,
        /// The unresolved `type` tag.
        type_name: String,
    },

    /// Malformed documents, options, or ranges.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image/video/font source could not be loaded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Backend or encoder failure.
    #[error("render error: {0}")]
    Render(String),

    /// Binding a validated configuration to its typed form failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Context-wrapped failures (mostly IO).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ReelError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ReelError::UnknownItemType`].
    pub fn unknown_item_type(item_id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownItemType {
            item_id: item_id.into(),
            type_name: type_name.into(),
        }
    }
}

impl From<SchemaErrors> for ReelError {
    fn from(e: SchemaErrors) -> Self {
        Self::ConfigValidation(e)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
