//! MCP stdio transport layer.
//!
//! Newline-delimited JSON-RPC 2.0 over stdin/stdout, exposing the gateway's
//! tools via `tools/list` and `tools/call`.

pub mod protocol;
pub mod router;
pub mod server;

pub use server::McpServer;
