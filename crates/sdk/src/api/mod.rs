//! API endpoint groups exposed by the client.

pub mod health;
pub mod mcp;

pub use health::{HealthApi, HealthCheck};
pub use mcp::McpApi;
