//! Basic SDK usage example.
//!
//! Lists the gateway's MCP servers, prints the tools of the first connected
//! one and calls a tool on it.
//!
//! Run with: cargo run --example basic_usage

use mcplink_sdk::{McpLinkClient, McpLinkResult, SessionStatus, ToolCallResult};
use serde_json::{json, Map};
use std::time::Duration;

#[tokio::main]
async fn main() -> McpLinkResult<()> {
    tracing_subscriber::fmt::init();

    let client = McpLinkClient::builder()
        .base_url("http://localhost:8080")
        .api_key("user-token")
        .timeout(Duration::from_secs(60))
        .build()?;

    let health = client.health().check().await?;
    println!("{} {} is {}", health.service, health.version, health.status);

    let listing = client.mcp().list_servers().await?;
    println!("Found {} enabled servers", listing.servers.len());
    for server in &listing.servers {
        println!(
            "  {} [{}] {:?}, {} tools",
            server.name, server.transport, server.status, server.tools_count
        );
    }

    let Some(server) = listing.servers.iter().find(|s| s.status == SessionStatus::Connected) else {
        println!("No connected server");
        return Ok(());
    };

    let tools = client.mcp().list_server_tools(&server.id).await?;
    for tool in &tools.tools {
        println!(
            "  - {}: {}",
            tool.name().unwrap_or("<unnamed>"),
            tool.description().unwrap_or("")
        );
    }

    let mut arguments = Map::new();
    arguments.insert("text".to_string(), json!("hello from mcplink"));

    let response = client.mcp().call_tool(&server.id, "echo", arguments).await?;
    match response.result {
        ToolCallResult::Success { result } => println!("Result: {}", result),
        ToolCallResult::Failure { error } => println!("Tool failed: {}", error),
    }

    Ok(())
}
