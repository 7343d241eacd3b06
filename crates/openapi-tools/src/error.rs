//! Error types for `acomo-openapi-tools`.

use thiserror::Error;

/// Main error type for `OpenAPI` introspection and dispatch.
#[derive(Error, Debug)]
pub enum OpenApiToolsError {
    #[error("OpenAPI document unavailable: failed to read '{path}': {source}")]
    DocumentRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("OpenAPI document unavailable: failed to parse '{path}': {message}")]
    DocumentParse { path: String, message: String },

    /// Lookup miss for an `operationId`.
    #[error("Unknown operationId: {0}")]
    UnknownOperation(String),

    /// Lookup miss for a `components.schemas` entry.
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// Required runtime credentials are not set.
    #[error("Missing configuration: {} must be set", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error(
        "Operation '{operation_id}' uses {method}; set ACOMO_ENABLE_MUTATION_TOOLS=true to allow it"
    )]
    MutationDisabled {
        operation_id: String,
        method: String,
    },

    /// Configuration errors (invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The call was cancelled, either by the timeout or by shutdown.
    #[error("Request to {url} aborted after {timeout_ms} ms")]
    AbortedRequest { url: String, timeout_ms: u64 },

    /// Non-2xx response.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A 2xx response whose body is not valid JSON.
    #[error("Malformed JSON response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// HTTP client (transport) errors.
    #[error("Request error: {0}")]
    Request(String),
}

impl OpenApiToolsError {
    /// Whether this is the `DocumentUnavailable` condition (missing or unparsable document).
    #[must_use]
    pub fn is_document_unavailable(&self) -> bool {
        matches!(self, Self::DocumentRead { .. } | Self::DocumentParse { .. })
    }
}

/// Result type alias for `OpenAPI` tooling operations.
pub type Result<T> = std::result::Result<T, OpenApiToolsError>;
