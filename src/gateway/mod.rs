//! Dispatch gateway — resolves a tool call, performs the remote call, and
//! returns a [`ToolResult`].
//!
//! Per call:
//! ```text
//! ToolCall → resolve name → check + convert args → OutboundRequest
//!          → RemoteService::send → normalize → ToolResult
//! ```
//! Every failure along the way becomes an error envelope; [`Gateway::dispatch`]
//! never returns `Err` and holds no state between calls.

pub mod operation;
pub mod remote;

pub use operation::{
    check_remote_error, CreateBotEmailArgs, GetEmailByIdArgs, GetEmailsArgs, Operation,
    OutboundRequest, RegisterWebhookArgs,
};
pub use remote::{HttpRemote, RemoteService};

use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::tools::catalog::value_type_name;
use crate::tools::{ToolCatalog, ToolEntry, ToolResult};
use crate::types::{Error, RemoteConfig, Result};

/// Inbound invocation: a tool name plus an untyped argument bag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Stateless tool dispatcher.
#[derive(Clone)]
pub struct Gateway {
    catalog: ToolCatalog,
    remote: Arc<dyn RemoteService>,
    default_api_key: Option<String>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("tools", &self.catalog.len())
            .field("default_api_key", &self.default_api_key.is_some())
            .finish()
    }
}

impl Gateway {
    /// Gateway talking to the configured remote service over HTTP.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let remote = HttpRemote::new(config)?;
        Ok(Self::with_remote(config, Arc::new(remote)))
    }

    /// Gateway with a caller-supplied outbound seam.
    pub fn with_remote(config: &RemoteConfig, remote: Arc<dyn RemoteService>) -> Self {
        Self {
            catalog: ToolCatalog::new(),
            remote,
            default_api_key: config
                .default_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        }
    }

    /// Every tool this gateway can dispatch, in catalog order.
    pub fn list_tools(&self) -> &[ToolEntry] {
        self.catalog.list_entries()
    }

    /// Execute one tool call. Never fails; errors come back as error envelopes.
    pub async fn dispatch(&self, call: ToolCall) -> ToolResult {
        let started = Instant::now();
        let name = call.name.clone();

        match self.try_dispatch(call).await {
            Ok(payload) => {
                tracing::info!(
                    tool = %name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "tool call succeeded"
                );
                ToolResult::json(&payload)
            }
            Err(err) => {
                tracing::warn!(
                    tool = %name,
                    kind = err.kind().as_str(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "tool call failed: {}",
                    err
                );
                ToolResult::error(err)
            }
        }
    }

    async fn try_dispatch(&self, call: ToolCall) -> Result<Value> {
        let (tool, entry) = self
            .catalog
            .resolve(&call.name)
            .ok_or_else(|| Error::unknown_tool(&call.name))?;

        let mut arguments = match call.arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(Error::invalid_arguments(
                    tool.name(),
                    vec![format!(
                        "Arguments must be a JSON object, got {}",
                        value_type_name(&other)
                    )],
                ))
            }
        };

        if tool.requires_api_key() {
            self.fill_default_api_key(&mut arguments);
        }

        let operation = Operation::parse(tool, entry, arguments)?;
        let request = operation.request();
        tracing::debug!(tool = %tool, ?request, "dispatching");

        let payload = self.remote.send(request).await?;
        operation.normalize(payload)
    }

    /// Substitute the configured default key when `apiKey` is absent or blank.
    fn fill_default_api_key(&self, arguments: &mut Map<String, Value>) {
        let Some(default) = &self.default_api_key else {
            return;
        };
        let missing = match arguments.get("apiKey") {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        };
        if missing {
            arguments.insert("apiKey".to_string(), Value::String(default.clone()));
        }
    }
}
