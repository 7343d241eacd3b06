//! Parameter, request-body and response schema extraction for a single operation.

use crate::document::OpenApiDocument;
use crate::index::find_operation_by_id;
use serde::Serialize;
use serde_json::{Map, Value};

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Schemas of one operation, as handed to callers and to the template synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSchemas {
    pub operation_id: String,
    pub method: String,
    pub path: String,
    /// The operation's `parameters`, verbatim.
    pub parameters: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    /// Status code -> schema, else description, else the raw response object.
    pub responses: Map<String, Value>,
}

/// Pick the media-type object to read a schema from: `application/json` if declared,
/// otherwise the first declared entry.
#[must_use]
pub fn preferred_media_type(content: &Map<String, Value>) -> Option<&Value> {
    content
        .get(JSON_MEDIA_TYPE)
        .filter(|media| !media.is_null())
        .or_else(|| content.values().next())
}

fn content_of(value: &Value) -> Option<&Map<String, Value>> {
    value.get("content").and_then(Value::as_object)
}

fn schema_or_self(media: &Value) -> &Value {
    media.get("schema").filter(|s| !s.is_null()).unwrap_or(media)
}

fn request_body_schema(op: &Value) -> Option<Value> {
    let content = op.get("requestBody").and_then(content_of)?;
    preferred_media_type(content).map(|media| schema_or_self(media).clone())
}

fn response_entry(response: &Value) -> Value {
    if let Some(schema) = content_of(response)
        .and_then(preferred_media_type)
        .and_then(|media| media.get("schema"))
        .filter(|s| !s.is_null())
    {
        return schema.clone();
    }
    if let Some(description) = response.get("description").filter(|d| !d.is_null()) {
        return description.clone();
    }
    response.clone()
}

/// Extract parameters, request-body schema and per-status response entries.
///
/// Returns `None` when no operation has the given `operationId`.
#[must_use]
pub fn operation_schemas(doc: &OpenApiDocument, operation_id: &str) -> Option<OperationSchemas> {
    let op = find_operation_by_id(doc, operation_id)?;
    let raw = &op.raw;

    let parameters = raw
        .get("parameters")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let responses = raw
        .get("responses")
        .and_then(Value::as_object)
        .map(|responses| {
            responses
                .iter()
                .map(|(code, response)| (code.clone(), response_entry(response)))
                .collect()
        })
        .unwrap_or_default();

    Some(OperationSchemas {
        operation_id: operation_id.to_string(),
        method: op.method,
        path: op.path,
        parameters,
        request_body: request_body_schema(raw),
        responses,
    })
}
