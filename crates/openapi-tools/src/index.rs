//! Operation enumeration and lookup.
//!
//! Operations are never stored: both functions rescan `paths` in document order. The document
//! is small and loaded once, so no index is built.

use crate::document::OpenApiDocument;
use serde::Serialize;
use serde_json::Value;

/// Path-item keys that name an HTTP operation. Anything else under a path item (`parameters`,
/// `summary`, `x-*` extensions, ...) is skipped.
pub const HTTP_METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "head", "options"];

/// One HTTP-verb/path combination of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Upper-cased HTTP method.
    pub method: String,
    /// URL template, e.g. `/items/{id}`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// The operation object exactly as it appears in the document.
    #[serde(skip)]
    pub raw: Value,
}

fn is_http_method(key: &str) -> bool {
    HTTP_METHODS.iter().any(|m| m.eq_ignore_ascii_case(key))
}

fn string_field(op: &Value, field: &str) -> Option<String> {
    op.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Iterate `(path, method key, operation object)` over the document in order.
fn operations(doc: &OpenApiDocument) -> impl Iterator<Item = (&str, &str, &Value)> {
    doc.paths().into_iter().flat_map(|paths| {
        paths.iter().flat_map(|(path, item)| {
            item.as_object().into_iter().flat_map(move |methods| {
                methods
                    .iter()
                    .filter(|(method, _)| is_http_method(method))
                    .map(move |(method, op)| (path.as_str(), method.as_str(), op))
            })
        })
    })
}

fn to_operation(path: &str, method: &str, op: &Value) -> Operation {
    Operation {
        operation_id: string_field(op, "operationId"),
        method: method.to_ascii_uppercase(),
        path: path.to_string(),
        summary: string_field(op, "summary"),
        raw: op.clone(),
    }
}

/// Every operation in the document, one per (path, verb) pair.
#[must_use]
pub fn list_operations(doc: &OpenApiDocument) -> Vec<Operation> {
    operations(doc)
        .map(|(path, method, op)| to_operation(path, method, op))
        .collect()
}

/// The first operation (in document order) whose `operationId` equals `operation_id`.
///
/// `operationId` uniqueness is not enforced; duplicates after the first are unreachable here.
#[must_use]
pub fn find_operation_by_id(doc: &OpenApiDocument, operation_id: &str) -> Option<Operation> {
    operations(doc)
        .find(|(_, _, op)| op.get("operationId").and_then(Value::as_str) == Some(operation_id))
        .map(|(path, method, op)| to_operation(path, method, op))
}
