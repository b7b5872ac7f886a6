use crate::scene::color::ColorDef;
use crate::schema::field::{FieldKind, Schema};
use serde_json::{Map, Value};
use std::fmt;

/// One step of a JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaPathElem {
    /// Object key.
    Field(String),
    /// Array index.
    Index(usize),
}

/// A single validation problem.
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Location of the problem, rendered as `$.a.b[0]`.
    pub path: Vec<SchemaPathElem>,
    /// What is wrong there.
    pub message: String,
}

impl SchemaError {
    /// Build an error at `path`.
    pub fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

/// Render a path as `$.field[index]`.
pub fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

/// All problems found while validating one document.
#[derive(Debug, Clone, Default)]
pub struct SchemaErrors {
    /// Problems in discovery order.
    pub errors: Vec<SchemaError>,
}

impl SchemaErrors {
    /// Return `true` when no problem was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Return `true` when some error is reported at exactly `path` (formatted, e.g. `$.fontSize`).
    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| format_path(&e.path) == path)
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl Schema {
    /// Validate a (possibly partial) configuration and fill declared defaults.
    ///
    /// Unknown keys are dropped from the output; `null` counts as absent.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, SchemaErrors> {
        let mut errors = Vec::new();
        let out = self.validate_at(input, &mut Vec::new(), &mut errors);
        if errors.is_empty() {
            Ok(out)
        } else {
            Err(SchemaErrors { errors })
        }
    }

    /// Validate under `path`, appending problems to `errors` instead of failing fast.
    pub(crate) fn validate_at(
        &self,
        input: &Value,
        path: &mut Vec<SchemaPathElem>,
        errors: &mut Vec<SchemaError>,
    ) -> Map<String, Value> {
        let empty = Map::new();
        let obj = match input {
            Value::Object(obj) => obj,
            Value::Null => &empty,
            other => {
                errors.push(SchemaError::at(
                    path,
                    format!("expected object, got {}", json_kind(other)),
                ));
                &empty
            }
        };
        self.validate_map_at(obj, path, errors)
    }

    pub(crate) fn validate_map_at(
        &self,
        obj: &Map<String, Value>,
        path: &mut Vec<SchemaPathElem>,
        errors: &mut Vec<SchemaError>,
    ) -> Map<String, Value> {
        let mut out = Map::new();
        for field in self.fields() {
            path.push(SchemaPathElem::Field(field.name.clone()));
            let provided = obj.get(&field.name).filter(|v| !v.is_null());
            match (provided, &field.default) {
                (Some(v), _) => {
                    if let Some(v) = validate_value(&field.kind, v, path, errors) {
                        out.insert(field.name.clone(), v);
                    }
                }
                (None, Some(d)) => {
                    if let Some(v) = validate_value(&field.kind, d, path, errors) {
                        out.insert(field.name.clone(), v);
                    }
                }
                (None, None) if field.optional => {}
                (None, None) => {
                    errors.push(SchemaError::at(
                        path,
                        format!("required {} field is missing", field.kind.name()),
                    ));
                }
            }
            path.pop();
        }
        out
    }
}

fn validate_value(
    kind: &FieldKind,
    value: &Value,
    path: &mut Vec<SchemaPathElem>,
    errors: &mut Vec<SchemaError>,
) -> Option<Value> {
    let mismatch = |errors: &mut Vec<SchemaError>, path: &[SchemaPathElem]| {
        errors.push(SchemaError::at(
            path,
            format!("expected {}, got {}", kind.name(), json_kind(value)),
        ));
        None
    };

    match kind {
        FieldKind::Number { min, max } => {
            let Some(n) = value.as_f64() else {
                return mismatch(errors, path);
            };
            if !check_bounds(n, *min, *max, path, errors) {
                return None;
            }
            Some(value.clone())
        }
        FieldKind::Integer { min, max } => {
            let n = match value.as_i64() {
                Some(n) => n,
                None => match value.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => f as i64,
                    _ => return mismatch(errors, path),
                },
            };
            let fmin = min.map(|m| m as f64);
            let fmax = max.map(|m| m as f64);
            if !check_bounds(n as f64, fmin, fmax, path, errors) {
                return None;
            }
            Some(Value::from(n))
        }
        FieldKind::String => match value {
            Value::String(_) => Some(value.clone()),
            _ => mismatch(errors, path),
        },
        FieldKind::Bool => match value {
            Value::Bool(_) => Some(value.clone()),
            _ => mismatch(errors, path),
        },
        FieldKind::Color => match value {
            Value::String(s) => match ColorDef::parse(s) {
                Ok(_) => Some(value.clone()),
                Err(e) => {
                    errors.push(SchemaError::at(path, e));
                    None
                }
            },
            _ => mismatch(errors, path),
        },
        FieldKind::Enum { variants } => match value {
            Value::String(s) if variants.iter().any(|v| v == s) => Some(value.clone()),
            Value::String(s) => {
                errors.push(SchemaError::at(
                    path,
                    format!("\"{s}\" is not one of [{}]", variants.join(", ")),
                ));
                None
            }
            _ => mismatch(errors, path),
        },
        FieldKind::Object { schema } => match value {
            Value::Object(obj) => Some(Value::Object(schema.validate_map_at(obj, path, errors))),
            _ => mismatch(errors, path),
        },
        FieldKind::Array { item } => match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, v) in items.iter().enumerate() {
                    path.push(SchemaPathElem::Index(i));
                    if let Some(v) = validate_value(item, v, path, errors) {
                        out.push(v);
                    }
                    path.pop();
                }
                Some(Value::Array(out))
            }
            _ => mismatch(errors, path),
        },
    }
}

fn check_bounds(
    n: f64,
    min: Option<f64>,
    max: Option<f64>,
    path: &[SchemaPathElem],
    errors: &mut Vec<SchemaError>,
) -> bool {
    if let Some(min) = min
        && n < min
    {
        errors.push(SchemaError::at(path, format!("{n} is below minimum {min}")));
        return false;
    }
    if let Some(max) = max
        && n > max
    {
        errors.push(SchemaError::at(path, format!("{n} is above maximum {max}")));
        return false;
    }
    true
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/validate.rs"]
mod tests;
