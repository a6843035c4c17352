//! Core types for the BotEmail gateway.
//!
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Remote endpoint, server and observability configuration

mod config;
mod errors;

pub use config::{
    Config, ObservabilityConfig, RemoteConfig, ServerConfig, DEFAULT_API_BASE, ENV_API_BASE,
    ENV_API_KEY, ENV_LOG_FORMAT, ENV_TIMEOUT_SECS,
};
pub use errors::{Error, ErrorKind, Result};
