use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Network mechanism used to reach an MCP server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    /// Long-lived event stream handshake (`GET <url>/sse`)
    #[default]
    #[serde(rename = "sse")]
    Sse,
    /// Per-request streamable HTTP (`POST <url>`)
    #[serde(rename = "httpStreamable")]
    HttpStreamable,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sse => "sse",
            Self::HttpStreamable => "httpStreamable",
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound authentication policy for a server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    #[default]
    None,
    Bearer,
    Header,
}

/// Identity and policy for one remote tool provider.
///
/// Unknown keys are captured in `extra` and written back unchanged, so a
/// client that stores its own attributes on a connection never loses them.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConnection {
    /// Empty until the registry assigns one
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transport: Transport,
    #[serde(default, deserialize_with = "null_as_default")]
    pub auth_type: AuthType,
    #[serde(default)]
    pub auth_key: Option<String>,
    #[serde(default)]
    pub auth_header_name: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_enabled() -> bool {
    true
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ServerConnection {
    pub fn new(name: impl Into<String>, url: impl Into<String>, transport: Transport) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            url: url.into(),
            transport,
            auth_type: AuthType::None,
            auth_key: None,
            auth_header_name: None,
            enabled: true,
            config: None,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_bearer(mut self, key: impl Into<String>) -> Self {
        self.auth_type = AuthType::Bearer;
        self.auth_key = Some(key.into());
        self
    }

    pub fn with_header_auth(mut self, header_name: impl Into<String>, key: impl Into<String>) -> Self {
        self.auth_type = AuthType::Header;
        self.auth_header_name = Some(header_name.into());
        self.auth_key = Some(key.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Check the parts of the policy that can only be caught once a call is attempted
    pub fn validate(&self) -> Result<(), ConnectionConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConnectionConfigError::MissingUrl {
                server: self.name.clone(),
            });
        }

        if self.auth_type == AuthType::Header
            && self
                .auth_header_name
                .as_deref()
                .map_or(true, |name| name.trim().is_empty())
        {
            return Err(ConnectionConfigError::MissingAuthHeaderName {
                server: self.name.clone(),
            });
        }

        Ok(())
    }
}

impl std::fmt::Debug for ServerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConnection")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &self.url)
            .field("transport", &self.transport)
            .field("auth_type", &self.auth_type)
            .field("auth_key", &self.auth_key.as_ref().map(|_| "<redacted>"))
            .field("auth_header_name", &self.auth_header_name)
            .field("enabled", &self.enabled)
            .field("config", &self.config)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Connection policy problems surfaced when a server is used
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionConfigError {
    #[error("MCP server '{server}' has no url")]
    MissingUrl { server: String },

    #[error("MCP server '{server}' uses header auth but has no auth_header_name")]
    MissingAuthHeaderName { server: String },
}

/// Observed connectivity of a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Connected,
    Disconnected,
}

/// Result of a successful handshake; lives only as long as the call that made it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub server_id: String,
    pub session_id: Option<String>,
    pub status: SessionStatus,
    pub transport: Transport,
}

impl Session {
    pub fn connected(server_id: impl Into<String>, session_id: Option<String>, transport: Transport) -> Self {
        Self {
            server_id: server_id.into(),
            session_id,
            status: SessionStatus::Connected,
            transport,
        }
    }
}

/// Tool metadata exactly as the remote server reported it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolDescriptor(pub Value);

impl ToolDescriptor {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }

    pub fn input_schema(&self) -> Option<&Value> {
        self.0.get("inputSchema")
    }
}

/// Outcome of a `tools/call`; failures are values, never errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ToolCallResultWire", from = "ToolCallResultWire")]
pub enum ToolCallResult {
    Success { result: Value },
    Failure { error: Value },
}

impl ToolCallResult {
    pub fn success(result: Value) -> Self {
        Self::Success { result }
    }

    pub fn failure(error: impl Into<Value>) -> Self {
        Self::Failure { error: error.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// `{"success": bool, "result"?: .., "error"?: ..}`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolCallResultWire {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<Value>,
}

impl From<ToolCallResult> for ToolCallResultWire {
    fn from(value: ToolCallResult) -> Self {
        match value {
            ToolCallResult::Success { result } => Self {
                success: true,
                result: Some(result),
                error: None,
            },
            ToolCallResult::Failure { error } => Self {
                success: false,
                result: None,
                error: Some(error),
            },
        }
    }
}

impl From<ToolCallResultWire> for ToolCallResult {
    fn from(wire: ToolCallResultWire) -> Self {
        if wire.success {
            Self::Success {
                result: wire.result.unwrap_or(Value::Null),
            }
        } else {
            Self::Failure {
                error: wire.error.unwrap_or(Value::Null),
            }
        }
    }
}
