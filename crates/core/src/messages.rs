// Request and response bodies shared by the HTTP surface and the SDK

use crate::types::{AuthType, ServerConnection, Session, SessionStatus, ToolCallResult, ToolDescriptor, Transport};
use serde::{Deserialize, Serialize};

/// Full connection list, as read and written by admins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConnectionsConfig {
    #[serde(rename = "MCP_SERVER_CONNECTIONS")]
    pub connections: Vec<ServerConnection>,
}

/// Ad-hoc server description for a connectivity test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConnectionRequest {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub auth_type: AuthType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_header_name: Option<String>,
}

impl TestConnectionRequest {
    /// Id used for the temporary connection built from this request
    pub const ADHOC_ID: &'static str = "test";

    pub fn into_connection(self) -> ServerConnection {
        let mut conn = ServerConnection::new(self.name, self.url, self.transport).with_id(Self::ADHOC_ID);
        conn.auth_type = self.auth_type;
        conn.auth_key = self.auth_key;
        conn.auth_header_name = self.auth_header_name;
        conn
    }
}

/// Connectivity report with a short tool preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConnectionReport {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDescriptor>>,
}

impl TestConnectionReport {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            session: None,
            tools_count: None,
            tools: None,
        }
    }
}

/// One row of the connected-servers listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatusEntry {
    pub id: String,
    pub name: String,
    pub status: SessionStatus,
    pub tools_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub transport: Transport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerListResponse {
    pub servers: Vec<ServerStatusEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerToolsResponse {
    pub server_id: String,
    pub server_name: String,
    pub session_id: Option<String>,
    pub tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub server_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub server_id: String,
    pub tool_name: String,
    pub result: ToolCallResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_uses_upper_case_wire_key() {
        let config: ServerConnectionsConfig = serde_json::from_value(json!({
            "MCP_SERVER_CONNECTIONS": [{"name": "demo", "url": "http://x"}]
        }))
        .unwrap();

        assert_eq!(config.connections.len(), 1);
        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("MCP_SERVER_CONNECTIONS").is_some());
    }

    #[test]
    fn test_adhoc_connection() {
        let request: TestConnectionRequest = serde_json::from_value(json!({
            "name": "scratch",
            "url": "http://x",
            "transport": "httpStreamable",
            "auth_type": "header",
            "auth_key": "k",
            "auth_header_name": "X-Key"
        }))
        .unwrap();

        let conn = request.into_connection();
        assert_eq!(conn.id, "test");
        assert!(conn.enabled);
        assert_eq!(conn.transport, Transport::HttpStreamable);
        assert_eq!(conn.auth_header_name.as_deref(), Some("X-Key"));
    }

    #[test]
    fn test_failed_report_omits_optional_fields() {
        let value = serde_json::to_value(TestConnectionReport::failed("nope")).unwrap();
        assert_eq!(value, json!({"success": false, "message": "nope"}));
    }

    #[test]
    fn test_tool_call_request_defaults_arguments() {
        let request: ToolCallRequest =
            serde_json::from_value(json!({"server_id": "a", "tool_name": "echo"})).unwrap();
        assert!(request.arguments.is_empty());
    }
}
