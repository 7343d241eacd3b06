//! Outbound HTTP dispatch to the backend API.

use crate::config::Config;
use crate::error::{OpenApiToolsError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Performs one backend call per [`Self::call`]: URL join, auth/tenant headers, timeout.
///
/// There is no retry. A call ends on response, transport error, timeout, or cancellation of
/// the dispatcher's token; the in-flight request future is dropped in the latter two cases,
/// which closes the connection.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    config: Config,
    cancel: CancellationToken,
}

impl Dispatcher {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// A dispatcher for `config` that shares this one's connection pool and cancellation.
    #[must_use]
    pub fn with_config(&self, config: Config) -> Self {
        Self {
            client: self.client.clone(),
            config,
            cancel: self.cancel.clone(),
        }
    }

    /// Abort in-flight and future calls when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute URL for `path` under the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`OpenApiToolsError::Config`] if the joined string is not a valid URL.
    pub fn build_url(&self, path: &str) -> Result<Url> {
        let joined = join_url(&self.config.base_url, path);
        Url::parse(&joined)
            .map_err(|e| OpenApiToolsError::Config(format!("Invalid request URL '{joined}': {e}")))
    }

    /// Call the backend and return the parsed JSON body (`Value::Null` for an empty body).
    ///
    /// # Errors
    ///
    /// - [`OpenApiToolsError::AbortedRequest`] on timeout or cancellation
    /// - [`OpenApiToolsError::HttpStatus`] on a non-2xx status
    /// - [`OpenApiToolsError::MalformedResponse`] if a 2xx body is not JSON
    /// - [`OpenApiToolsError::Request`] on transport failures
    pub async fn call(&self, path: &str, method: &str, body: Option<&Value>) -> Result<Value> {
        let method = resolve_http_method(method)?;
        let url = self.build_url(path)?;
        let redacted = redact_url(&url);
        let timeout_ms = self.config.request_timeout_ms;

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        if let Some(tenant_id) = &self.config.tenant_id {
            request = request.header("x-tenant-id", tenant_id);
        }
        if let Some(body) = body.filter(|b| !b.is_null()) {
            request = request.json(body);
        }

        tracing::debug!("Dispatching {method} {redacted}");

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| OpenApiToolsError::Request(sanitize_reqwest_error(&e)))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| OpenApiToolsError::Request(sanitize_reqwest_error(&e)))?;
            Ok::<_, OpenApiToolsError>((status, text))
        };

        let aborted = || OpenApiToolsError::AbortedRequest {
            url: redacted.clone(),
            timeout_ms,
        };

        let (status, text) = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(aborted()),
            res = tokio::time::timeout(self.config.request_timeout(), exchange) => {
                res.map_err(|_| aborted())??
            }
        };

        parse_response(status, &text).inspect_err(|e| {
            tracing::warn!("{method} {redacted} failed: {e}");
        })
    }
}

fn parse_response(status: StatusCode, text: &str) -> Result<Value> {
    if !status.is_success() {
        return Err(OpenApiToolsError::HttpStatus {
            status: status.as_u16(),
            body: text.to_string(),
        });
    }
    if text.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(OpenApiToolsError::MalformedResponse)
}

/// `base` without trailing slashes, then exactly one `/`, then `path`.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn resolve_http_method(method: &str) -> Result<Method> {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Ok(Method::GET),
        "POST" => Ok(Method::POST),
        "PUT" => Ok(Method::PUT),
        "DELETE" => Ok(Method::DELETE),
        "PATCH" => Ok(Method::PATCH),
        "HEAD" => Ok(Method::HEAD),
        "OPTIONS" => Ok(Method::OPTIONS),
        other => Err(OpenApiToolsError::Request(format!(
            "Unsupported HTTP method: {other}"
        ))),
    }
}

fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    // Best-effort: drop credentials + query + fragment.
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}
