//! Closed view of a JSON-Schema fragment, as far as skeleton synthesis cares.
//!
//! Raw schema JSON is classified once, here, in a fixed precedence order; the synthesizer then
//! matches exhaustively on [`SchemaFragment`].

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaFragment {
    /// `$ref` is present. The reference is kept verbatim and never resolved.
    Ref(Value),
    /// `type: object` with `properties`, in the object's own key order. Properties whose schema
    /// is JSON `null` are left out.
    Object(Vec<(String, SchemaFragment)>),
    /// `type: array`; a missing `items` is an empty (unknown) schema.
    Array(Box<SchemaFragment>),
    /// `enum` is present. Non-array `enum` values count as empty.
    Enum(Vec<Value>),
    String,
    /// `number` or `integer`.
    Number,
    Boolean,
    /// Anything else: missing `type`, `type: object` without `properties`, `null`, composition
    /// keywords (`allOf`/`oneOf`/`anyOf`) without a `type`, non-object schemas.
    Unknown,
}

impl SchemaFragment {
    /// Classify a raw schema value.
    ///
    /// Precedence: `$ref`, then object-with-properties, then array, then `enum`, then the
    /// primitive `type` switch.
    #[must_use]
    pub fn from_value(schema: &Value) -> Self {
        let Some(obj) = schema.as_object() else {
            return Self::Unknown;
        };

        if let Some(reference) = obj.get("$ref").filter(|r| is_truthy(r)) {
            return Self::Ref(reference.clone());
        }

        let ty = obj.get("type").and_then(Value::as_str);

        if ty == Some("object")
            && let Some(properties) = obj.get("properties").and_then(Value::as_object)
        {
            return Self::Object(
                properties
                    .iter()
                    .filter(|(_, prop)| !prop.is_null())
                    .map(|(name, prop)| (name.clone(), Self::from_value(prop)))
                    .collect(),
            );
        }

        if ty == Some("array") {
            let items = obj
                .get("items")
                .filter(|items| !items.is_null())
                .map_or(Self::Unknown, Self::from_value);
            return Self::Array(Box::new(items));
        }

        if let Some(values) = obj.get("enum").filter(|e| is_truthy(e)) {
            return Self::Enum(values.as_array().cloned().unwrap_or_default());
        }

        match ty {
            Some("string") => Self::String,
            Some("number" | "integer") => Self::Number,
            Some("boolean") => Self::Boolean,
            _ => Self::Unknown,
        }
    }
}

/// `$ref: ""`, `$ref: false` and friends do not count as a reference.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
