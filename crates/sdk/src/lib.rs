//! # mcplink SDK
//!
//! Rust client for the mcplink gateway: manage remote MCP server
//! connections, discover their tools and call them over the gateway's HTTP API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcplink_sdk::{McpLinkClient, McpLinkResult};
//! use serde_json::{json, Map};
//!
//! #[tokio::main]
//! async fn main() -> McpLinkResult<()> {
//!     let client = McpLinkClient::builder()
//!         .base_url("http://localhost:8080")
//!         .api_key("your-api-token")
//!         .build()?;
//!
//!     let listing = client.mcp().list_servers().await?;
//!     for server in &listing.servers {
//!         println!("{} ({:?}): {} tools", server.name, server.status, server.tools_count);
//!     }
//!
//!     let mut arguments = Map::new();
//!     arguments.insert("text".to_string(), json!("hello"));
//!     let response = client.mcp().call_tool("mcp_1234", "echo", arguments).await?;
//!     println!("{:?}", response.result);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{McpLinkClient, McpLinkClientBuilder};
pub use config::{ClientConfig, RetryConfig};
pub use error::{McpLinkError, McpLinkResult};

// Re-export core types for convenience
pub use mcplink_core::messages::{
    ServerConnectionsConfig, ServerListResponse, ServerStatusEntry, ServerToolsResponse, TestConnectionReport,
    TestConnectionRequest, ToolCallRequest, ToolCallResponse,
};
pub use mcplink_core::types::{
    AuthType, ServerConnection, Session, SessionStatus, ToolCallResult, ToolDescriptor, Transport,
};
