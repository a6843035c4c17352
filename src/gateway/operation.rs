//! Typed operations — validated arguments, outbound request building, and
//! remote payload normalization.
//!
//! Each operation is a pure mapping: arguments → [`OutboundRequest`], and
//! remote payload → normalized payload. Nothing here touches the network.

use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::tools::{Tool, ToolEntry};
use crate::types::{Error, Result};

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBotEmailArgs {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEmailsArgs {
    pub email: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetEmailByIdArgs {
    pub email: String,
    pub email_id: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWebhookArgs {
    pub email: String,
    pub webhook_url: String,
    pub api_key: String,
}

/// A tool call with its arguments checked and converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateBotEmail(CreateBotEmailArgs),
    GetEmails(GetEmailsArgs),
    GetEmailById(GetEmailByIdArgs),
    RegisterWebhook(RegisterWebhookArgs),
}

impl Operation {
    /// Validate `arguments` against `entry` and convert them into the typed
    /// operation for `tool`.
    pub fn parse(tool: Tool, entry: &ToolEntry, arguments: Map<String, Value>) -> Result<Self> {
        let errors = entry.validate_params(&arguments);
        if !errors.is_empty() {
            return Err(Error::invalid_arguments(tool.name(), errors));
        }

        let arguments = Value::Object(arguments);
        let operation = match tool {
            Tool::CreateBotEmail => Operation::CreateBotEmail(serde_json::from_value(arguments)?),
            Tool::GetEmails => Operation::GetEmails(serde_json::from_value(arguments)?),
            Tool::GetEmailById => Operation::GetEmailById(serde_json::from_value(arguments)?),
            Tool::RegisterWebhook => Operation::RegisterWebhook(serde_json::from_value(arguments)?),
        };
        Ok(operation)
    }

    pub fn tool(&self) -> Tool {
        match self {
            Operation::CreateBotEmail(_) => Tool::CreateBotEmail,
            Operation::GetEmails(_) => Tool::GetEmails,
            Operation::GetEmailById(_) => Tool::GetEmailById,
            Operation::RegisterWebhook(_) => Tool::RegisterWebhook,
        }
    }

    /// Describe the single outbound call for this operation.
    ///
    /// `register_webhook` sends its credential in the body rather than the
    /// `Authorization` header; the remote endpoint expects it there.
    pub fn request(&self) -> OutboundRequest {
        match self {
            Operation::CreateBotEmail(args) => OutboundRequest {
                method: Method::POST,
                path: "/api/create-account".to_string(),
                bearer: None,
                body: Some(json!({ "username": args.username })),
            },
            Operation::GetEmails(args) => OutboundRequest {
                method: Method::GET,
                path: format!("/api/emails/{}", urlencoding::encode(&args.email)),
                bearer: Some(args.api_key.clone()),
                body: None,
            },
            Operation::GetEmailById(args) => OutboundRequest {
                method: Method::GET,
                // emailId is inserted verbatim.
                path: format!(
                    "/api/emails/{}/{}",
                    urlencoding::encode(&args.email),
                    args.email_id
                ),
                bearer: Some(args.api_key.clone()),
                body: None,
            },
            Operation::RegisterWebhook(args) => OutboundRequest {
                method: Method::POST,
                path: "/api/webhook/register".to_string(),
                bearer: None,
                body: Some(json!({
                    "botEmail": args.email,
                    "webhookUrl": args.webhook_url,
                    "apiKey": args.api_key,
                })),
            },
        }
    }

    /// Turn a parsed remote payload into the payload returned to the caller.
    pub fn normalize(&self, payload: Value) -> Result<Value> {
        check_remote_error(&payload)?;

        match self {
            Operation::CreateBotEmail(_) => {
                let mut selected = Map::new();
                for key in ["email", "apiKey", "message"] {
                    if let Some(value) = payload.get(key) {
                        selected.insert(key.to_string(), value.clone());
                    }
                }
                Ok(Value::Object(selected))
            }
            Operation::GetEmails(_) | Operation::GetEmailById(_) | Operation::RegisterWebhook(_) => {
                Ok(payload)
            }
        }
    }
}

/// Fail if the remote payload carries a truthy `error` field.
///
/// `null`, `false`, `0` and `""` are not errors. String errors pass through
/// verbatim; anything else is rendered as JSON text.
pub fn check_remote_error(payload: &Value) -> Result<()> {
    let Some(error) = payload.get("error") else {
        return Ok(());
    };
    let truthy = match error {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };
    if !truthy {
        return Ok(());
    }
    match error {
        Value::String(s) => Err(Error::remote(s.clone())),
        other => Err(Error::remote(other.to_string())),
    }
}

// =============================================================================
// Outbound request
// =============================================================================

/// Description of one outbound HTTP call, relative to the remote base address.
#[derive(Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub path: String,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub bearer: Option<String>,
    /// Sent as a JSON body when present.
    pub body: Option<Value>,
}

// Credentials stay out of logs.
impl std::fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
