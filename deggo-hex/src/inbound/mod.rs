//! MCP Inbound Adapter
//!
//! JSON-RPC server over stdio that drives the application layer.

mod server;
pub mod tools;

pub use server::{JsonRpcResponse, McpServer};
