//! The loaded `OpenAPI` document.
//!
//! The document is kept as raw JSON (with key order preserved) rather than a typed `OpenAPI`
//! model: operations, parameters and schemas are handed back to callers verbatim.

use serde_json::{Map, Value};

/// Root of an `OpenAPI` 3.x document.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApiDocument {
    root: Value,
}

impl OpenApiDocument {
    #[must_use]
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// The whole document as parsed.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// `paths`: URL template -> path item, in document order.
    #[must_use]
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths").and_then(Value::as_object)
    }

    /// `components.schemas`, in document order.
    #[must_use]
    pub fn component_schemas(&self) -> Option<&Map<String, Value>> {
        self.root
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
    }

    /// Names of all `components.schemas` entries.
    #[must_use]
    pub fn component_names(&self) -> Vec<String> {
        self.component_schemas()
            .map(|schemas| schemas.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// A single `components.schemas` entry.
    #[must_use]
    pub fn component_schema(&self, name: &str) -> Option<&Value> {
        self.component_schemas()
            .and_then(|schemas| schemas.get(name))
            .filter(|schema| !schema.is_null())
    }
}
