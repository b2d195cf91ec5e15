//! Statically declared JSON shapes and the walker that checks values against them.

use serde_json::Value;
use thiserror::Error;

/// Expected shape of a JSON value.
///
/// Declared as `static` items next to the result types they guard, e.g.
///
/// ```ignore
/// static WEEK: Shape = Shape::Object(&[
///     Field { name: "week", shape: Shape::Number, required: true },
/// ]);
/// ```
#[derive(Debug)]
pub enum Shape {
    /// Anything, including null. Contents are not inspected.
    Any,
    String,
    /// A string with at least one non-whitespace character.
    NonEmptyString,
    Number,
    /// A non-negative integer that fits in `u32`. `3.0` is accepted and
    /// rewritten as `3`.
    WholeNumber,
    Array(&'static Shape),
    NonEmptyArray(&'static Shape),
    Object(&'static [Field]),
}

/// A named member of an object shape.
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

/// The first place where a value departs from its declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{path}` {problem}")]
pub struct SchemaViolation {
    /// JSONPath-like location, e.g. `$.weeklySchedule[2].topics`.
    pub path: String,
    pub problem: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            problem: problem.into(),
        }
    }
}

/// Checks `value` against `shape` and normalises it in place.
///
/// Optional fields that are explicitly `null` are removed so typed
/// deserialization falls back to their defaults. Extra fields are left alone.
pub fn conform(value: &mut Value, shape: &Shape) -> Result<(), SchemaViolation> {
    conform_at(value, shape, "$")
}

fn conform_at(value: &mut Value, shape: &Shape, path: &str) -> Result<(), SchemaViolation> {
    match shape {
        Shape::Any => Ok(()),
        Shape::String => require(value.is_string(), path, "must be a string"),
        Shape::NonEmptyString => match value.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(()),
            Some(_) => Err(SchemaViolation::new(path, "must not be empty")),
            None => Err(SchemaViolation::new(path, "must be a string")),
        },
        Shape::Number => require(value.is_number(), path, "must be a number"),
        Shape::WholeNumber => {
            let whole = whole_number(value)
                .ok_or_else(|| SchemaViolation::new(path, "must be a whole number"))?;
            *value = Value::from(whole);
            Ok(())
        }
        Shape::Array(items) => conform_array(value, items, false, path),
        Shape::NonEmptyArray(items) => conform_array(value, items, true, path),
        Shape::Object(fields) => {
            let object = value
                .as_object_mut()
                .ok_or_else(|| SchemaViolation::new(path, "must be an object"))?;

            for field in fields.iter() {
                if !field.required && matches!(object.get(field.name), Some(Value::Null)) {
                    object.remove(field.name);
                    continue;
                }

                let child = format!("{path}.{}", field.name);
                match object.get_mut(field.name) {
                    Some(member) => conform_at(member, &field.shape, &child)?,
                    None if field.required => {
                        return Err(SchemaViolation::new(child, "is required"));
                    }
                    None => {}
                }
            }
            Ok(())
        }
    }
}

fn conform_array(
    value: &mut Value,
    items: &Shape,
    non_empty: bool,
    path: &str,
) -> Result<(), SchemaViolation> {
    let array = value
        .as_array_mut()
        .ok_or_else(|| SchemaViolation::new(path, "must be an array"))?;

    if non_empty && array.is_empty() {
        return Err(SchemaViolation::new(path, "must not be empty"));
    }
    for (i, item) in array.iter_mut().enumerate() {
        conform_at(item, items, &format!("{path}[{i}]"))?;
    }
    Ok(())
}

fn whole_number(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let n = value.as_f64()?;
    (n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n)).then_some(n as u32)
}

fn require(ok: bool, path: &str, problem: &str) -> Result<(), SchemaViolation> {
    if ok {
        Ok(())
    } else {
        Err(SchemaViolation::new(path, problem))
    }
}
