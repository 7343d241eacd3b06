//! MCP tool/resource surface over the `OpenAPI` core.

use crate::guide::{AUTH_GUIDE, AUTH_GUIDE_URI, OPENAPI_RESOURCE_URI};
use acomo_openapi_tools::config::Config;
use acomo_openapi_tools::dispatch::Dispatcher;
use acomo_openapi_tools::error::{OpenApiToolsError, Result as ToolsResult};
use acomo_openapi_tools::extract::operation_schemas;
use acomo_openapi_tools::index::{find_operation_by_id, list_operations};
use acomo_openapi_tools::request::resolve_request_path;
use acomo_openapi_tools::store::SpecStore;
use acomo_openapi_tools::template::build_request_template;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, ErrorData as McpError, Implementation,
    ListResourcesResult, PaginatedRequestParams, RawResource, ReadResourceRequestParams,
    ReadResourceResult, Resource, ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, tool, tool_handler, tool_router};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Methods `callOperation` runs without `ACOMO_ENABLE_MUTATION_TOOLS`.
const SAFE_METHODS: [&str; 3] = ["GET", "HEAD", "OPTIONS"];

type ConfigSource = Arc<dyn Fn() -> Config + Send + Sync>;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationIdParam {
    /// `operationId` as declared in the `OpenAPI` document.
    pub operation_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComponentParam {
    /// Name of a `components.schemas` entry.
    pub name: String,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CallOperationParam {
    /// `operationId` as declared in the `OpenAPI` document.
    pub operation_id: String,
    /// Values for `{name}` placeholders in the operation path.
    #[serde(default)]
    pub path_params: Option<Map<String, Value>>,
    /// Query string parameters.
    #[serde(default)]
    pub query: Option<Map<String, Value>>,
    /// JSON request body.
    #[serde(default)]
    pub body: Option<Value>,
}

#[derive(Clone)]
pub struct AcomoMcpServer {
    store: Arc<SpecStore>,
    config_source: ConfigSource,
    /// Built once so every call shares one connection pool.
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AcomoMcpServer {
    #[must_use]
    pub fn new(store: Arc<SpecStore>) -> Self {
        Self {
            store,
            config_source: Arc::new(Config::from_env),
            dispatcher: Dispatcher::new(Config::from_lookup(|_| None)),
            shutdown: CancellationToken::new(),
            tool_router: Self::tool_router(),
        }
    }

    /// Replace where per-call configuration comes from (the environment by default).
    #[must_use]
    pub fn with_config_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> Config + Send + Sync + 'static,
    {
        self.config_source = Arc::new(source);
        self
    }

    /// In-flight backend calls are aborted when `token` is cancelled.
    #[must_use]
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    #[tool(
        name = "health",
        annotations(read_only_hint = true),
        description = "acomo MCP server health check (fixed response)"
    )]
    async fn health(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }

    #[tool(
        name = "listOperations",
        annotations(read_only_hint = true),
        description = "List every OpenAPI operation (operationId, method, path, summary)"
    )]
    async fn list_operations_tool(&self) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(self.render_operations().await))
    }

    #[tool(
        name = "describeOperation",
        annotations(read_only_hint = true),
        description = "Describe one operation by operationId: path, method, summary and the raw operation object"
    )]
    async fn describe_operation_tool(
        &self,
        param: Parameters<OperationIdParam>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(
            self.render_operation(&param.0.operation_id).await,
        ))
    }

    #[tool(
        name = "operationSchemas",
        annotations(read_only_hint = true),
        description = "Extract parameters, requestBody schema and per-status response schemas for an operationId"
    )]
    async fn operation_schemas_tool(
        &self,
        param: Parameters<OperationIdParam>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(
            self.render_schemas(&param.0.operation_id).await,
        ))
    }

    #[tool(
        name = "generateRequestTemplate",
        annotations(read_only_hint = true),
        description = "Generate a path/query/body request skeleton for an operationId"
    )]
    async fn generate_request_template_tool(
        &self,
        param: Parameters<OperationIdParam>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(
            self.render_template(&param.0.operation_id).await,
        ))
    }

    #[tool(
        name = "listComponents",
        annotations(read_only_hint = true),
        description = "List the names of OpenAPI components.schemas"
    )]
    async fn list_components_tool(&self) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(self.render_components().await))
    }

    #[tool(
        name = "describeComponent",
        annotations(read_only_hint = true),
        description = "Return the JSON Schema of a components.schemas entry"
    )]
    async fn describe_component_tool(
        &self,
        param: Parameters<ComponentParam>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(self.render_component(&param.0.name).await))
    }

    #[tool(
        name = "callOperation",
        description = "Call the acomo API by operationId with optional pathParams, query and JSON body (minimal validation). Methods other than GET/HEAD/OPTIONS require ACOMO_ENABLE_MUTATION_TOOLS=true"
    )]
    async fn call_operation_tool(
        &self,
        param: Parameters<CallOperationParam>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result(self.call_operation(param.0).await))
    }
}

impl AcomoMcpServer {
    async fn render_operations(&self) -> ToolsResult<String> {
        let doc = self.store.load().await?;
        Ok(compact(&list_operations(&doc)))
    }

    async fn render_operation(&self, operation_id: &str) -> ToolsResult<String> {
        let doc = self.store.load().await?;
        let op = find_operation_by_id(&doc, operation_id)
            .ok_or_else(|| OpenApiToolsError::UnknownOperation(operation_id.to_string()))?;

        let mut detail = match serde_json::to_value(&op) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        detail.insert("raw".to_string(), op.raw);
        Ok(pretty(&detail))
    }

    async fn render_schemas(&self, operation_id: &str) -> ToolsResult<String> {
        let doc = self.store.load().await?;
        let schemas = operation_schemas(&doc, operation_id)
            .ok_or_else(|| OpenApiToolsError::UnknownOperation(operation_id.to_string()))?;
        Ok(pretty(&schemas))
    }

    async fn render_template(&self, operation_id: &str) -> ToolsResult<String> {
        let doc = self.store.load().await?;
        let schemas = operation_schemas(&doc, operation_id)
            .ok_or_else(|| OpenApiToolsError::UnknownOperation(operation_id.to_string()))?;
        Ok(pretty(&build_request_template(&schemas)))
    }

    async fn render_components(&self) -> ToolsResult<String> {
        let doc = self.store.load().await?;
        Ok(compact(&doc.component_names()))
    }

    async fn render_component(&self, name: &str) -> ToolsResult<String> {
        let doc = self.store.load().await?;
        let schema = doc
            .component_schema(name)
            .ok_or_else(|| OpenApiToolsError::UnknownComponent(name.to_string()))?;
        Ok(pretty(schema))
    }

    /// Resolve, validate, and dispatch one `callOperation` invocation.
    async fn call_operation(&self, param: CallOperationParam) -> ToolsResult<String> {
        let doc = self.store.load().await?;
        let op = find_operation_by_id(&doc, &param.operation_id)
            .ok_or_else(|| OpenApiToolsError::UnknownOperation(param.operation_id.clone()))?;

        let config = (self.config_source)();
        let missing = config.missing_credentials();
        if !missing.is_empty() {
            return Err(OpenApiToolsError::MissingConfig(missing));
        }
        if !config.enable_mutation_tools && !SAFE_METHODS.contains(&op.method.as_str()) {
            return Err(OpenApiToolsError::MutationDisabled {
                operation_id: param.operation_id,
                method: op.method,
            });
        }

        let path = resolve_request_path(
            &op.path,
            param.path_params.as_ref(),
            param.query.as_ref(),
        );
        tracing::info!("callOperation {} -> {} {path}", param.operation_id, op.method);

        let response = self
            .dispatcher
            .with_config(config)
            .with_cancellation(self.shutdown.child_token())
            .call(&path, &op.method, param.body.as_ref())
            .await?;
        Ok(compact(&response))
    }

    async fn read_openapi_resource(&self) -> ToolsResult<String> {
        let doc = self.store.load().await?;
        Ok(pretty(doc.as_value()))
    }
}

fn compact<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("\"<unserializable: {e}>\""))
}

fn pretty<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("\"<unserializable: {e}>\""))
}

/// Tool failures are reported in-band (`isError: true`), not as protocol errors.
fn into_tool_result(result: ToolsResult<String>) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            if e.is_document_unavailable() {
                tracing::error!("{e}");
            }
            CallToolResult::error(vec![Content::text(e.to_string())])
        }
    }
}

fn resource(uri: &str, name: &str, description: &str, mime_type: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some(mime_type.to_string());
    raw.no_annotation()
}

#[tool_handler]
impl ServerHandler for AcomoMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "acomo-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("acomo MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Discover acomo API operations with listOperations, inspect them with \
                 operationSchemas, build a skeleton with generateRequestTemplate, then invoke \
                 with callOperation. Read guide://auth for the required credentials."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(vec![
            resource(
                OPENAPI_RESOURCE_URI,
                "openapi",
                "acomo OpenAPI specification",
                "application/json",
            ),
            resource(
                AUTH_GUIDE_URI,
                "auth-guide",
                "acomo authentication and header setup",
                "text/markdown",
            ),
        ]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = match request.uri.as_str() {
            OPENAPI_RESOURCE_URI => self
                .read_openapi_resource()
                .await
                .map_err(|e| McpError::internal_error(e.to_string(), None))?,
            AUTH_GUIDE_URI => AUTH_GUIDE.to_string(),
            other => {
                return Err(McpError::resource_not_found(
                    format!("Unknown resource: {other}"),
                    None,
                ));
            }
        };
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
