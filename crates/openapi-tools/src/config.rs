//! Environment-sourced runtime configuration.
//!
//! Values are read on every call site rather than cached, so a long-running server picks up
//! whatever the environment says at the time of the call.

use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_BASE: &str = "ACOMO_API_BASE";
pub const ENV_TENANT_ID: &str = "ACOMO_TENANT_ID";
pub const ENV_ACCESS_TOKEN: &str = "ACOMO_ACCESS_TOKEN";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "ACOMO_REQUEST_TIMEOUT_MS";
pub const ENV_ENABLE_MUTATION_TOOLS: &str = "ACOMO_ENABLE_MUTATION_TOOLS";
pub const ENV_OPENAPI_PATH: &str = "ACOMO_OPENAPI_PATH";

pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Runtime configuration for document loading and dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL, trailing slashes already stripped.
    pub base_url: String,
    /// Value for the `x-tenant-id` header.
    pub tenant_id: Option<String>,
    /// Bearer token for the `Authorization` header.
    pub token: Option<String>,
    /// Per-call timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Allow `callOperation` on methods that may mutate state.
    pub enable_mutation_tools: bool,
    /// Location of the `OpenAPI` document.
    pub openapi_path: PathBuf,
}

impl Config {
    /// Read the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let base_url = get(ENV_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let request_timeout_ms = match get(ENV_REQUEST_TIMEOUT_MS) {
            None => DEFAULT_REQUEST_TIMEOUT_MS,
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(
                    "{ENV_REQUEST_TIMEOUT_MS}='{raw}' is not a number of milliseconds; using {DEFAULT_REQUEST_TIMEOUT_MS}"
                );
                DEFAULT_REQUEST_TIMEOUT_MS
            }),
        };
        let openapi_path = get(ENV_OPENAPI_PATH).map_or_else(default_openapi_path, PathBuf::from);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant_id: get(ENV_TENANT_ID),
            token: get(ENV_ACCESS_TOKEN),
            request_timeout_ms,
            enable_mutation_tools: get(ENV_ENABLE_MUTATION_TOOLS).as_deref() == Some("true"),
            openapi_path,
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Names of the runtime credentials that are required for calling the backend but unset.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.tenant_id.is_none() {
            missing.push(ENV_TENANT_ID);
        }
        if self.token.is_none() {
            missing.push(ENV_ACCESS_TOKEN);
        }
        missing
    }
}

fn default_openapi_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("acomo-backend")
        .join("openapi.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.base_url, "http://localhost:3000/api");
        assert_eq!(cfg.request_timeout_ms, 30_000);
        assert!(!cfg.enable_mutation_tools);
        assert!(cfg.openapi_path.ends_with("acomo-backend/openapi.json"));
        assert_eq!(
            cfg.missing_credentials(),
            vec!["ACOMO_TENANT_ID", "ACOMO_ACCESS_TOKEN"]
        );
    }

    #[test]
    fn strips_every_trailing_slash_from_base_url() {
        let cfg = config_from(&[("ACOMO_API_BASE", "https://api.example.com//")]);
        assert_eq!(cfg.base_url, "https://api.example.com");
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg = config_from(&[("ACOMO_TENANT_ID", ""), ("ACOMO_ACCESS_TOKEN", "t")]);
        assert_eq!(cfg.tenant_id, None);
        assert_eq!(cfg.missing_credentials(), vec!["ACOMO_TENANT_ID"]);
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let cfg = config_from(&[("ACOMO_REQUEST_TIMEOUT_MS", "soon")]);
        assert_eq!(cfg.request_timeout_ms, 30_000);

        let cfg = config_from(&[("ACOMO_REQUEST_TIMEOUT_MS", "250")]);
        assert_eq!(cfg.request_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn mutation_tools_require_literal_true() {
        assert!(config_from(&[("ACOMO_ENABLE_MUTATION_TOOLS", "true")]).enable_mutation_tools);
        assert!(!config_from(&[("ACOMO_ENABLE_MUTATION_TOOLS", "1")]).enable_mutation_tools);
    }
}
