use std::collections::BTreeMap;

use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    Null,
}

impl ScalarKind {
    /// Scalar category of a JSON value, `None` for objects and arrays.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(ScalarKind::String),
            Value::Number(_) => Some(ScalarKind::Number),
            Value::Bool(_) => Some(ScalarKind::Boolean),
            Value::Null => Some(ScalarKind::Null),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Output shape a generated response has to satisfy: the exact key set of
/// every object and the type category of every value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Scalar(ScalarKind),
    Object(BTreeMap<String, Shape>),
    /// `None` accepts any array regardless of its elements.
    Array(Option<Box<Shape>>),
}

impl Shape {
    pub fn string() -> Self {
        Shape::Scalar(ScalarKind::String)
    }

    pub fn number() -> Self {
        Shape::Scalar(ScalarKind::Number)
    }

    pub fn boolean() -> Self {
        Shape::Scalar(ScalarKind::Boolean)
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Shape)>) -> Self {
        Shape::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array_of(element: Shape) -> Self {
        Shape::Array(Some(Box::new(element)))
    }

    /// Derives a shape from an example document. Example arrays only pin the
    /// "is an array" category, their elements are not inspected.
    pub fn from_example(example: &Value) -> Self {
        match example {
            Value::Object(map) => Shape::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Shape::from_example(value)))
                    .collect(),
            ),
            Value::Array(_) => Shape::Array(None),
            Value::String(_) => Shape::string(),
            Value::Number(_) => Shape::number(),
            Value::Bool(_) => Shape::boolean(),
            Value::Null => Shape::Scalar(ScalarKind::Null),
        }
    }

    pub fn fields(&self) -> Option<&BTreeMap<String, Shape>> {
        match self {
            Shape::Object(fields) => Some(fields),
            _ => None,
        }
    }
}
