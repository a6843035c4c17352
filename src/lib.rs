//! # BotEmail MCP - Tool Gateway for Bot Email Accounts
//!
//! Exposes the BotEmail.ai account API as MCP tools so an agent can:
//! - create a bot email account
//! - read its inbox, or a single message
//! - register a webhook for new-mail notifications
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────────────────────────┐
//!   stdin  ───→   │ mcp::McpServer (JSON-RPC, per-call task) │   ───→ stdout
//!                 └───────────────┬──────────────────────────┘
//!                                 │ ToolCall
//!                 ┌───────────────▼──────────────────────────┐
//!                 │ gateway::Gateway                         │
//!                 │  tools::ToolCatalog → Operation          │
//!                 │  → RemoteService (reqwest) → ToolResult  │
//!                 └──────────────────────────────────────────┘
//! ```
//!
//! The gateway is stateless: the only process-wide data is the immutable
//! [`Config`] built at startup.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod gateway;
pub mod mcp;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use gateway::{Gateway, ToolCall};
pub use tools::{ToolCatalog, ToolResult};
pub use types::{Config, Error, Result};
