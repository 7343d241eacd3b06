//! Request-template synthesis.

use crate::extract::OperationSchemas;
use crate::schema::SchemaFragment;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// A request skeleton for one operation.
///
/// Header and cookie parameters are not represented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTemplate {
    pub operation_id: String,
    pub method: String,
    pub path: String,
    pub path_params: Map<String, Value>,
    /// Omitted entirely when the operation has no query parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

fn placeholder(name: &str) -> Value {
    Value::String(format!("<{name}>"))
}

/// Build path/query placeholders and a body skeleton from an operation's schemas.
#[must_use]
pub fn build_request_template(schemas: &OperationSchemas) -> RequestTemplate {
    let mut path_params = Map::new();
    let mut query = Map::new();

    for param in &schemas.parameters {
        let Some(name) = param.get("name").and_then(Value::as_str) else {
            continue;
        };
        match param.get("in").and_then(Value::as_str) {
            Some("path") => {
                path_params.insert(name.to_string(), placeholder(name));
            }
            Some("query") => {
                query.insert(name.to_string(), placeholder(name));
            }
            _ => {}
        }
    }

    RequestTemplate {
        operation_id: schemas.operation_id.clone(),
        method: schemas.method.clone(),
        path: schemas.path.clone(),
        path_params,
        query: (!query.is_empty()).then_some(query),
        body: build_body_skeleton(schemas.request_body.as_ref()),
    }
}

/// Synthesize a representative value for a schema. `None` in, `None` out.
#[must_use]
pub fn build_body_skeleton(schema: Option<&Value>) -> Option<Value> {
    schema
        .filter(|s| !s.is_null())
        .map(|s| skeleton(&SchemaFragment::from_value(s)))
}

fn skeleton(schema: &SchemaFragment) -> Value {
    match schema {
        SchemaFragment::Ref(reference) => json!({ "$ref": reference }),
        SchemaFragment::Object(properties) => Value::Object(
            properties
                .iter()
                .map(|(name, prop)| (name.clone(), skeleton(prop)))
                .collect(),
        ),
        SchemaFragment::Array(items) => Value::Array(vec![skeleton(items)]),
        SchemaFragment::Enum(values) => values.first().cloned().unwrap_or(Value::Null),
        SchemaFragment::String => Value::String("<string>".to_string()),
        SchemaFragment::Number => json!(0),
        SchemaFragment::Boolean => Value::Bool(false),
        SchemaFragment::Unknown => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(schema: &Value) -> Value {
        build_body_skeleton(Some(schema)).unwrap()
    }

    #[test]
    fn object_with_string_and_integer_array() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": { "type": "string" },
                "b": { "type": "array", "items": { "type": "integer" } }
            }
        });
        assert_eq!(body(&schema), json!({ "a": "<string>", "b": [0] }));
    }

    #[test]
    fn enum_precedes_primitive_type() {
        assert_eq!(body(&json!({ "type": "string", "enum": ["x", "y"] })), json!("x"));
        assert_eq!(body(&json!({ "type": "string", "enum": [] })), Value::Null);
    }

    #[test]
    fn ref_is_not_expanded() {
        let schema = json!({ "$ref": "#/components/schemas/Foo", "type": "object" });
        assert_eq!(body(&schema), json!({ "$ref": "#/components/schemas/Foo" }));
    }

    #[test]
    fn primitives_and_unknowns() {
        assert_eq!(body(&json!({ "type": "number" })), json!(0));
        assert_eq!(body(&json!({ "type": "boolean" })), json!(false));
        assert_eq!(body(&json!({ "allOf": [{ "type": "string" }] })), Value::Null);
        assert_eq!(body(&json!({})), Value::Null);
        assert_eq!(body(&json!({ "type": "array" })), json!([null]));
        assert_eq!(build_body_skeleton(None), None);
    }

    #[test]
    fn property_order_is_preserved_and_output_is_stable() {
        let schema = json!({
            "type": "object",
            "properties": {
                "zeta": { "type": "boolean" },
                "alpha": { "type": "object", "properties": { "n": { "type": "number" } } },
                "mid": { "$ref": "#/components/schemas/Mid" }
            }
        });
        let first = body(&schema);
        let keys: Vec<&String> = first.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(first, body(&schema));
        assert_eq!(
            first,
            json!({
                "zeta": false,
                "alpha": { "n": 0 },
                "mid": { "$ref": "#/components/schemas/Mid" }
            })
        );
    }

    #[test]
    fn template_places_path_and_query_placeholders() {
        let schemas = OperationSchemas {
            operation_id: "updateItem".to_string(),
            method: "PUT".to_string(),
            path: "/items/{id}".to_string(),
            parameters: vec![
                json!({ "name": "id", "in": "path", "required": true }),
                json!({ "name": "dryRun", "in": "query" }),
                json!({ "name": "x-trace", "in": "header" }),
                json!({ "name": "session", "in": "cookie" }),
            ],
            request_body: Some(json!({ "type": "object", "properties": { "name": { "type": "string" } } })),
            responses: Map::new(),
        };
        let tmpl = build_request_template(&schemas);
        assert_eq!(
            serde_json::to_value(&tmpl).unwrap(),
            json!({
                "operationId": "updateItem",
                "method": "PUT",
                "path": "/items/{id}",
                "pathParams": { "id": "<id>" },
                "query": { "dryRun": "<dryRun>" },
                "body": { "name": "<string>" }
            })
        );
    }

    #[test]
    fn empty_query_and_missing_body_are_omitted() {
        let schemas = OperationSchemas {
            operation_id: "ping".to_string(),
            method: "GET".to_string(),
            path: "/ping".to_string(),
            parameters: Vec::new(),
            request_body: None,
            responses: Map::new(),
        };
        let tmpl = build_request_template(&schemas);
        assert!(tmpl.query.is_none());
        assert_eq!(
            serde_json::to_value(&tmpl).unwrap(),
            json!({ "operationId": "ping", "method": "GET", "path": "/ping", "pathParams": {} })
        );
    }

    #[test]
    fn null_property_schema_is_left_out() {
        let schema = json!({
            "type": "object",
            "properties": { "x": null, "y": { "type": "boolean" } }
        });
        assert_eq!(body(&schema), json!({ "y": false }));
    }
}
