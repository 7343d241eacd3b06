//! acomo MCP server: exposes the acomo `OpenAPI` document as MCP tools and resources.
//!
//! All `OpenAPI` logic lives in `acomo-openapi-tools`; this crate only registers tools and
//! resources and turns results into MCP text content.

pub mod guide;
pub mod server;
