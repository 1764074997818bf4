//! MCP server implementation for standards-mcp.
//!
//! Implements `ServerHandler` by hand rather than through the tool-router
//! macros: every tool call flows through the [`Dispatcher`] so the operation
//! catalog, argument normalization, and error taxonomy live in one place,
//! and the resource URIs resolve to exactly the same operations as the
//! named tool calls.

use std::sync::Arc;

use rmcp::model::{
    AnnotateAble, CallToolRequestParams, CallToolResult, Content, ErrorCode, Implementation,
    ListResourceTemplatesResult, ListResourcesResult, ListToolsResult, PaginatedRequestParams,
    ProtocolVersion, RawResourceTemplate, ReadResourceRequestParams, ReadResourceResult,
    ResourceContents, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::{Value, json};

use crate::config::ServerConfig;
use crate::error::{Error, Result};

use super::dispatch::{Dispatcher, operations};

/// Converts a taxonomy error into an MCP protocol error, carrying the
/// stable kind tag in the error data so callers can branch on it.
fn to_mcp_error(err: &Error) -> McpError {
    let code = match err {
        Error::Validation(_) => ErrorCode::INVALID_PARAMS,
        Error::MethodNotFound(_) => ErrorCode::METHOD_NOT_FOUND,
        Error::NotFound(_) => ErrorCode::RESOURCE_NOT_FOUND,
        Error::Fetch { .. } | Error::Parse(_) => ErrorCode::INTERNAL_ERROR,
    };
    McpError::new(code, err.to_string(), Some(json!({"kind": err.kind()})))
}

/// Maps a resource URI onto its operation name and arguments.
///
/// A pure alias layer: `rfc://2616` is `get_rfc`, `draft://latest/<base>`
/// is `get_internet_draft` with the versionless name, `wg://<group>/rfcs`
/// is the working-group listing with drafts excluded, and so on.
fn route_resource(uri: &str) -> Result<(&'static str, Value)> {
    let (scheme, rest) = uri
        .split_once("://")
        .ok_or_else(|| Error::Validation(format!("malformed resource URI {uri:?}")))?;
    let rest = rest.trim_end_matches('/');
    if rest.is_empty() {
        return Err(Error::Validation(format!("empty resource path in {uri:?}")));
    }

    match scheme {
        "rfc" => Ok(match rest.strip_prefix("search/") {
            Some(query) => ("search_rfcs", json!({"query": query})),
            None => ("get_rfc", json!({"number": rest})),
        }),
        "draft" => Ok(if let Some(query) = rest.strip_prefix("search/") {
            ("search_internet_drafts", json!({"query": query}))
        } else if let Some(base) = rest.strip_prefix("latest/") {
            ("get_internet_draft", json!({"name": base}))
        } else {
            ("get_internet_draft", json!({"name": rest}))
        }),
        "spec" => Ok(match rest.strip_prefix("search/") {
            Some(query) => ("search_specs", json!({"query": query})),
            None => ("get_spec", json!({"name": rest})),
        }),
        "wg" => {
            let (group, filter) = rest
                .split_once('/')
                .map_or((rest, None), |(group, filter)| (group, Some(filter)));
            let (rfcs, drafts) = match filter {
                None => (true, true),
                Some("rfcs") => (true, false),
                Some("drafts") => (false, true),
                Some(other) => {
                    return Err(Error::Validation(format!(
                        "unknown working group filter {other:?}, expected rfcs or drafts"
                    )));
                }
            };
            Ok((
                "get_working_group_documents",
                json!({
                    "working_group": group,
                    "include_rfcs": rfcs,
                    "include_drafts": drafts,
                }),
            ))
        }
        other => Err(Error::Validation(format!(
            "unknown resource scheme {other:?}, expected rfc, draft, spec, or wg"
        ))),
    }
}

/// Standards document gateway MCP server.
#[derive(Clone)]
pub struct StandardsMcpServer {
    dispatcher: Arc<Dispatcher>,
}

impl StandardsMcpServer {
    /// Creates the server with the production HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot initialize.
    pub fn new(config: ServerConfig) -> Result<Self> {
        Ok(Self {
            dispatcher: Arc::new(Dispatcher::new(config)?),
        })
    }

    async fn call(&self, method: &str, args: Value) -> std::result::Result<String, McpError> {
        let result = self
            .dispatcher
            .dispatch(method, args)
            .await
            .map_err(|e| to_mcp_error(&e))?;
        serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {e}"), None))
    }
}

impl ServerHandler for StandardsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "standards-mcp".to_string(),
                title: Some("Standards Document Gateway".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Standards document gateway: fetch RFCs, Internet Drafts, and foundation \
                 specifications as structured documents (metadata, section tree, full text). \
                 Use the get_* tools for whole documents or single sections, search_* tools \
                 for keyword lookup, and get_working_group_documents for an IETF working \
                 group's RFCs and active drafts. Resources mirror the tools: rfc://2616, \
                 draft://latest/{base}, spec://{name}, wg://{group}."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        let tools = operations()
            .iter()
            .map(|op| {
                let schema = match (op.schema)() {
                    Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                Tool::new(op.name, op.description, Arc::new(schema))
            })
            .collect();
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        CallToolRequestParams { name, arguments, .. }: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let args = arguments.map_or_else(|| json!({}), Value::Object);
        let json = self.call(&name, args).await?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParams { uri, .. }: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        let (method, args) = route_resource(&uri).map_err(|e| to_mcp_error(&e))?;
        let json = self.call(method, args).await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(json, uri)],
        })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        // The document space is unbounded; templates describe it.
        Ok(ListResourcesResult {
            resources: Vec::new(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourceTemplatesResult, McpError> {
        let templates = [
            (
                "rfc://{number}",
                "RFC document",
                "Full parsed RFC: metadata, section tree, and text.",
            ),
            (
                "rfc://search/{query}",
                "RFC search",
                "Keyword search over RFC titles.",
            ),
            (
                "draft://{name}",
                "Internet Draft",
                "Full parsed Internet Draft; a versionless name resolves to the latest version.",
            ),
            (
                "draft://latest/{base_name}",
                "Latest Internet Draft version",
                "Latest version of a draft by its versionless base name.",
            ),
            (
                "draft://search/{query}",
                "Internet Draft search",
                "Keyword search over drafts.",
            ),
            (
                "spec://{name}",
                "Foundation specification",
                "Full parsed specification from the built-in catalog.",
            ),
            (
                "spec://search/{query}",
                "Foundation specification search",
                "Keyword search over the built-in catalog.",
            ),
            (
                "wg://{group}",
                "Working group documents",
                "An IETF working group's RFCs and active drafts. Append /rfcs or /drafts to \
                 restrict the listing.",
            ),
        ];

        let resource_templates = templates
            .into_iter()
            .map(|(uri_template, name, description)| {
                RawResourceTemplate {
                    uri_template: uri_template.to_string(),
                    name: name.to_string(),
                    title: None,
                    description: Some(description.to_string()),
                    mime_type: Some("application/json".to_string()),
                    icons: None,
                }
                .no_annotation()
            })
            .collect();

        Ok(ListResourceTemplatesResult {
            resource_templates,
            next_cursor: None,
            meta: None,
        })
    }
}
