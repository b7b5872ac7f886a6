use serde::Serialize;
use serde_json::{Map, Value};

/// Declared kind of a configuration field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Any finite number, optionally bounded.
    Number {
        /// Inclusive lower bound.
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Whole number, optionally bounded.
    Integer {
        /// Inclusive lower bound.
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        /// Inclusive upper bound.
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// Free-form string.
    String,
    /// Boolean flag.
    Bool,
    /// Color string understood by [`crate::ColorDef::parse`].
    Color,
    /// One of a fixed set of strings.
    Enum {
        /// Accepted values.
        variants: Vec<String>,
    },
    /// Nested object with its own fields.
    Object {
        /// Nested schema.
        schema: Schema,
    },
    /// Homogeneous array.
    Array {
        /// Element kind.
        item: Box<FieldKind>,
    },
}

impl FieldKind {
    /// Short human name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number { .. } => "number",
            Self::Integer { .. } => "integer",
            Self::String => "string",
            Self::Bool => "boolean",
            Self::Color => "color",
            Self::Enum { .. } => "enum",
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
        }
    }

    /// Unbounded number.
    pub fn number() -> Self {
        Self::Number {
            min: None,
            max: None,
        }
    }

    /// Object of the given schema.
    pub fn object(schema: Schema) -> Self {
        Self::Object { schema }
    }
}

/// A named field of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Key in the configuration object.
    pub name: String,
    /// Declared kind.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Value used when the field is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Field may be absent without a default.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    /// Editor-facing description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    /// Field of an arbitrary kind (required until given a default or marked optional).
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            optional: false,
            description: None,
        }
    }

    /// Number field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::number())
    }

    /// Integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Integer {
                min: None,
                max: None,
            },
        )
    }

    /// String field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Boolean field.
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    /// Color field.
    pub fn color(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Color)
    }

    /// Enum field.
    pub fn enumeration(name: impl Into<String>, variants: &[&str]) -> Self {
        Self::new(
            name,
            FieldKind::Enum {
                variants: variants.iter().map(|v| (*v).to_owned()).collect(),
            },
        )
    }

    /// Nested object field.
    pub fn object(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldKind::Object { schema })
    }

    /// Array field with elements of `item` kind.
    pub fn array(name: impl Into<String>, item: FieldKind) -> Self {
        Self::new(
            name,
            FieldKind::Array {
                item: Box::new(item),
            },
        )
    }

    /// Array-of-objects field.
    pub fn array_of(name: impl Into<String>, schema: Schema) -> Self {
        Self::array(name, FieldKind::Object { schema })
    }

    /// Set the default value.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Allow the field to be absent without a default.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Inclusive lower bound for number/integer fields (ignored otherwise).
    pub fn min(mut self, bound: f64) -> Self {
        match &mut self.kind {
            FieldKind::Number { min, .. } => *min = Some(bound),
            FieldKind::Integer { min, .. } => *min = Some(bound.ceil() as i64),
            _ => {}
        }
        self
    }

    /// Inclusive upper bound for number/integer fields (ignored otherwise).
    pub fn max(mut self, bound: f64) -> Self {
        match &mut self.kind {
            FieldKind::Number { max, .. } => *max = Some(bound),
            FieldKind::Integer { max, .. } => *max = Some(bound.floor() as i64),
            _ => {}
        }
        self
    }

    /// Attach an editor-facing description.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Required fields have neither a default nor the optional flag.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.optional
    }
}

/// Ordered set of fields describing an animation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Empty schema (accepts any object, keeps nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing an earlier field of the same name.
    pub fn field(mut self, field: Field) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(slot) => *slot = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Best-effort default properties: every defaulted field, recursively filled.
    ///
    /// Required fields are left out, so the result is not necessarily valid on its own.
    pub fn default_props(&self) -> Value {
        let mut out = Map::new();
        for f in &self.fields {
            if let Some(d) = &f.default {
                out.insert(f.name.clone(), fill_nested_defaults(&f.kind, d.clone()));
            }
        }
        Value::Object(out)
    }

    /// Schema as JSON (the property-panel contract for editors).
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn fill_nested_defaults(kind: &FieldKind, value: Value) -> Value {
    match (kind, value) {
        (FieldKind::Object { schema }, Value::Object(mut obj)) => {
            if let Value::Object(defaults) = schema.default_props() {
                for (k, v) in defaults {
                    obj.entry(k).or_insert(v);
                }
            }
            Value::Object(obj)
        }
        (FieldKind::Array { item }, Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|v| fill_nested_defaults(item, v))
                .collect(),
        ),
        (_, v) => v,
    }
}
