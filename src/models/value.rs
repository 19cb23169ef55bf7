use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

/// Maximum characters of a string rendered by [`Value::to_display_string`]
const DISPLAY_STRING_LIMIT: usize = 200;
/// Arrays up to this length render inline, comma-separated
const INLINE_ARRAY_LIMIT: usize = 3;
/// Maps up to this many keys try a single-line rendering first
const INLINE_MAP_KEY_LIMIT: usize = 2;
/// Single-line map rendering is only kept when it fits in this many characters
const INLINE_MAP_WIDTH_LIMIT: usize = 60;

/// An arbitrary JSON value, as found inside tool-use parameters.
///
/// Tool inputs are arbitrarily shaped, so decoding is lenient by design:
/// [`Value::from_json`] never fails, it degrades unrecognized shapes to
/// [`Value::Null`]. Equality is structural.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Null,
}

impl Value {
    /// Decode an untyped JSON value into a tagged [`Value`].
    ///
    /// Integer is attempted before float so that integral numbers survive a
    /// round-trip as integers. Anything that matches no variant becomes
    /// [`Value::Null`] rather than an error.
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Null
                }
            }
            JsonValue::String(s) => Value::Str(s.clone()),
            JsonValue::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect(),
            ),
            JsonValue::Null => Value::Null,
        }
    }

    /// Encode back to an untyped JSON value. Structural inverse of
    /// [`Value::from_json`]: floats that are not finite encode as null
    /// (JSON has no representation for them).
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => JsonValue::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Null => JsonValue::Null,
        }
    }

    /// Human-readable rendering used when displaying tool parameters.
    ///
    /// Display-only and lossy: long strings are truncated, so this must never
    /// be used as the round-trip encoder ([`Value::to_json`] is).
    pub fn to_display_string(&self) -> String {
        self.render(0)
    }

    fn render(&self, depth: usize) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => truncate_for_display(s),
            Value::Null => "null".to_string(),
            Value::Array(items) => {
                if items.is_empty() {
                    "[]".to_string()
                } else if items.len() <= INLINE_ARRAY_LIMIT {
                    let inner: Vec<String> =
                        items.iter().map(|v| v.render(depth + 1)).collect();
                    format!("[{}]", inner.join(", "))
                } else {
                    let indent = "  ".repeat(depth);
                    items
                        .iter()
                        .map(|v| format!("{indent}- {}", v.render(depth + 1)))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Value::Object(map) => {
                if map.is_empty() {
                    return "{}".to_string();
                }
                // Small maps try a one-line form first and fall through to the
                // multi-line form when it gets too wide
                if map.len() <= INLINE_MAP_KEY_LIMIT {
                    let pairs: Vec<String> = map
                        .iter()
                        .map(|(k, v)| format!("{k}: {}", v.render(depth + 1)))
                        .collect();
                    let inline = format!("{{ {} }}", pairs.join(", "));
                    if inline.chars().count() <= INLINE_MAP_WIDTH_LIMIT {
                        return inline;
                    }
                }
                // BTreeMap iteration is already in lexicographic key order
                let indent = "  ".repeat(depth);
                map.iter()
                    .map(|(k, v)| format!("{indent}{k}: {}", v.render(depth + 1)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    }
}

/// Truncate a string to the display limit, appending an ellipsis marker.
/// Counts characters, not bytes, to stay on UTF-8 boundaries.
fn truncate_for_display(s: &str) -> String {
    if s.chars().count() > DISPLAY_STRING_LIMIT {
        let mut truncated: String = s.chars().take(DISPLAY_STRING_LIMIT).collect();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}
