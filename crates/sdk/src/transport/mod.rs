//! Transport layer for the mcplink SDK.

pub mod http;

pub use http::HttpTransport;
