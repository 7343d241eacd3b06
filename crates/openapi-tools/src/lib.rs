//! OpenAPI introspection and request synthesis for the acomo MCP server.
//!
//! Control flow through this crate:
//! - [`store::SpecStore`] loads the document once per process
//! - [`index`] enumerates operations and looks them up by `operationId`
//! - [`extract`] pulls parameter/request/response schemas out of an operation
//! - [`template`] turns those schemas into a request skeleton
//! - [`dispatch::Dispatcher`] performs the actual HTTP call
//!
//! It intentionally contains **no** MCP protocol handling; the server crate owns that.

pub mod config;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod extract;
pub mod index;
pub mod request;
pub mod schema;
pub mod store;
pub mod template;
