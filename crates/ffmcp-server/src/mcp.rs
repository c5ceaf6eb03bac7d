//! MCP message dispatch.
//!
//! Transport-agnostic: both the stdio loop and the HTTP endpoint hand raw
//! JSON-RPC messages to [`McpServer::handle_message`].

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use ffmcp_media::resource::{name_from_uri, uri_for};
use ffmcp_media::tools::descriptors;
use ffmcp_media::{
    MediaDirs, MediaError, MediaResult, ResourceExposer, ToolExecutor, RESOURCE_URI_TEMPLATE,
};
use ffmcp_models::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ResourceResult};

/// Protocol revision answered when the client does not ask for one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "ffmcp";

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

/// Routes JSON-RPC methods onto the tool and resource surfaces.
#[derive(Clone)]
pub struct McpServer {
    tools: ToolExecutor,
    resources: ResourceExposer,
}

impl McpServer {
    pub fn new(tools: ToolExecutor, resources: ResourceExposer) -> Self {
        Self { tools, resources }
    }

    /// Server running real engine processes against `dirs`.
    pub fn from_dirs(dirs: Arc<MediaDirs>) -> MediaResult<Self> {
        let tools = ToolExecutor::new(Arc::clone(&dirs))?;
        Ok(Self::new(tools, ResourceExposer::new(dirs)))
    }

    /// Handle one raw message. `None` means no response is due.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Received malformed JSON-RPC message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(format!("Parse error: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
            )),
        }
    }

    /// Handle a parsed request. Notifications never get a response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "Handling MCP request");

        if request.is_notification() {
            if !request.method.starts_with("notifications/") {
                debug!(method = %request.method, "Ignoring unexpected notification");
            }
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let params = request.params.unwrap_or(Value::Null);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": descriptors() })),
            "tools/call" => self.call_tool(params).await,
            "resources/list" => self.list_resources().await,
            "resources/templates/list" => Ok(resource_templates()),
            "resources/read" => self.read_resource(params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::result(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn initialize(&self, params: &Value) -> Value {
        let protocol = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);

        json!({
            "protocolVersion": protocol,
            "capabilities": {
                "tools": {},
                "resources": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    async fn call_tool(&self, params: Value) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tool call: {}", e)))?;

        let result = self
            .tools
            .invoke(&params.name, params.arguments)
            .await
            .map_err(|e| match e {
                MediaError::UnknownTool(_) | MediaError::JsonParse(_) => {
                    JsonRpcError::invalid_params(e.to_string())
                }
                other => JsonRpcError::internal(other.to_string()),
            })?;

        let structured =
            serde_json::to_value(&result).map_err(|e| JsonRpcError::internal(e.to_string()))?;
        let text = serde_json::to_string_pretty(&structured)
            .map_err(|e| JsonRpcError::internal(e.to_string()))?;

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "structuredContent": structured,
            "isError": !result.success
        }))
    }

    async fn list_resources(&self) -> Result<Value, JsonRpcError> {
        let entries = self
            .resources
            .list()
            .await
            .map_err(|e| JsonRpcError::internal(e.to_string()))?;

        let resources: Vec<Value> = entries
            .into_iter()
            .map(|entry| {
                json!({
                    "uri": uri_for(&entry.name),
                    "name": entry.name,
                    "mimeType": entry.mime_type,
                    "size": entry.size
                })
            })
            .collect();

        Ok(json!({ "resources": resources }))
    }

    async fn read_resource(&self, params: Value) -> Result<Value, JsonRpcError> {
        let params: ReadResourceParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid resource read: {}", e)))?;

        let name = name_from_uri(&params.uri).ok_or_else(|| {
            JsonRpcError::invalid_params(format!("Unknown resource URI: {}", params.uri))
        })?;

        let content = match self.resources.fetch(Some(name)).await {
            ResourceResult::Content {
                mime_type, blob, ..
            } => json!({
                "uri": params.uri,
                "mimeType": mime_type,
                "blob": blob
            }),
            descriptor => {
                let text = serde_json::to_string(&descriptor)
                    .map_err(|e| JsonRpcError::internal(e.to_string()))?;
                json!({
                    "uri": params.uri,
                    "mimeType": "application/json",
                    "text": text
                })
            }
        };

        Ok(json!({ "contents": [content] }))
    }
}

fn resource_templates() -> Value {
    json!({
        "resourceTemplates": [{
            "uriTemplate": RESOURCE_URI_TEMPLATE,
            "name": "Generated artifacts",
            "description": "Files in the output area, by file name. An empty name describes the output directory."
        }]
    })
}
