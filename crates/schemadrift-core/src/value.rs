use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Loosely-typed scalar captured from a sampled row cell.
///
/// Backend-specific types with no natural mapping (numerics beyond i64/f64,
/// timestamps, arrays, json) are captured as their text rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_scalars() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Bytes(vec![1, 2, 3]).to_string(), "<3 bytes>");
    }

    #[test]
    fn serializes_with_explicit_tags() {
        let json = serde_json::to_string(&Value::Int(7)).expect("serialize value");
        assert_eq!(json, r#"{"int":7}"#);
        let json = serde_json::to_string(&Value::Null).expect("serialize null");
        assert_eq!(json, r#""null""#);
    }
}
