// Core types and state for the mcplink MCP gateway

pub mod authz;
pub mod messages;
pub mod registry;
pub mod store;
pub mod types;

pub use authz::{Access, AuthzError, CallerAuthorizer, CallerRole, StaticTokenAuthorizer};
pub use registry::{RegistryError, RegistrySnapshot, ServerRegistry};
pub use store::{ConnectionStore, MemoryConnectionStore, RedbConnectionStore, StoreError};
pub use types::*;
