// MCP protocol messages (JSON-RPC 2.0 over HTTP)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// Request id used for `tools/list`
pub const TOOLS_LIST_ID: i64 = 1;
/// Request id used for `tools/call`
pub const TOOLS_CALL_ID: i64 = 2;

/// Header carrying the session id on the streamable HTTP transport
pub const MCP_SESSION_HEADER: &str = "mcp-session-id";
/// Header carrying the session id in an SSE handshake response
pub const SSE_SESSION_HEADER: &str = "X-Session-ID";
/// Query parameter carrying the session id on the SSE transport
pub const SSE_SESSION_QUERY: &str = "sessionId";

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: i64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: i64, method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// `{"jsonrpc":"2.0","id":1,"method":"tools/list"}`
    pub fn list_tools() -> Self {
        Self::new(TOOLS_LIST_ID, METHOD_TOOLS_LIST)
    }

    /// `{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":..,"arguments":..}}`
    pub fn call_tool(name: &str, arguments: Map<String, Value>) -> Self {
        let mut params = Map::new();
        params.insert("name".to_string(), Value::String(name.to_string()));
        params.insert("arguments".to_string(), Value::Object(arguments));
        Self::new(TOOLS_CALL_ID, METHOD_TOOLS_CALL).with_params(Value::Object(params))
    }
}

/// JSON-RPC 2.0 Response as received from a remote server.
///
/// `result` and `error` are kept as raw JSON; remote payloads are passed
/// through to callers without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present_value")]
    pub result: Option<Value>,
    #[serde(default, deserialize_with = "present_value")]
    pub error: Option<Value>,
}

/// A key that is present maps to `Some`, even when its value is `null`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcResponse {
    /// `result.tools` when it is an array
    pub fn tools(&self) -> Option<&Vec<Value>> {
        self.result.as_ref()?.get("tools")?.as_array()
    }
}
