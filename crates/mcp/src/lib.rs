// Client side of the Model Context Protocol: session negotiation, tool
// discovery and tool invocation against remote MCP servers

pub mod catalog;
pub mod config;
pub mod error;
pub mod invoker;
pub mod protocol;
pub mod service;
pub mod transport;

pub use config::McpClientConfig;
pub use error::{McpError, McpResult};
pub use service::{McpService, TOOL_PREVIEW_LIMIT};
pub use transport::{McpConnector, McpTransport, SseTransport, StreamableHttpTransport};
