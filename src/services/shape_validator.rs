use serde_json::Value;

use crate::models::domain::shape::{ScalarKind, Shape};

/// Checks provider output against `template`.
///
/// An array root is valid when every element conforms (an empty array is
/// accepted). An object root must conform itself. Unparseable text and scalar
/// roots are rejected.
pub fn matches(candidate: &str, template: &Shape) -> bool {
    let value: Value = match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("Response is not valid JSON: {}", e);
            return false;
        }
    };

    match &value {
        Value::Array(items) => items.iter().all(|item| conforms(item, template)),
        Value::Object(_) => conforms(&value, template),
        _ => {
            log::debug!("Response root is neither an object nor an array");
            false
        }
    }
}

pub fn conforms(value: &Value, shape: &Shape) -> bool {
    match (shape, value) {
        (Shape::Scalar(kind), value) => ScalarKind::of(value) == Some(*kind),
        (Shape::Array(element), Value::Array(items)) => element
            .as_deref()
            .map_or(true, |element| items.iter().all(|item| conforms(item, element))),
        (Shape::Object(fields), Value::Object(map)) => {
            if map.len() != fields.len() || !fields.keys().all(|key| map.contains_key(key)) {
                log::debug!(
                    "Keys do not match. Response keys: {:?}, template keys: {:?}",
                    map.keys().collect::<Vec<_>>(),
                    fields.keys().collect::<Vec<_>>()
                );
                return false;
            }
            fields.iter().all(|(key, field_shape)| {
                let ok = map.get(key).is_some_and(|v| conforms(v, field_shape));
                if !ok {
                    log::debug!("Type mismatch for key '{}'", key);
                }
                ok
            })
        }
        _ => false,
    }
}
