//! Tool catalog — typed metadata, parameter validation, input schema rendering.
//!
//! The set of tools is closed: [`Tool`] enumerates every operation and
//! [`Tool::entry`] is the single place its metadata is declared, so adding a
//! tool is a compile-checked change to one match.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs. Every BotEmail parameter is a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
}

impl ParamType {
    /// Validate a JSON value against this parameter type.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        let ok = match self {
            ParamType::String => value.is_string(),
        };
        if ok {
            Ok(())
        } else {
            Err(format!(
                "expected {}, got {}",
                self.json_type(),
                value_type_name(value)
            ))
        }
    }

    /// JSON Schema `type` keyword for this parameter.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String => "string",
        }
    }
}

/// JSON type name of a value, as used in validation messages.
pub(crate) fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDef {
    pub name: &'static str,
    pub param_type: ParamType,
    pub required: bool,
    pub description: &'static str,
}

impl ParamDef {
    const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            param_type: ParamType::String,
            required: true,
            description,
        }
    }
}

// =============================================================================
// Tools
// =============================================================================

const API_KEY_DESCRIPTION: &str = "API key for the bot account";

/// Every operation the gateway can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    CreateBotEmail,
    GetEmails,
    GetEmailById,
    RegisterWebhook,
}

impl Tool {
    /// All tools, in catalog order.
    pub const ALL: [Tool; 4] = [
        Tool::CreateBotEmail,
        Tool::GetEmails,
        Tool::GetEmailById,
        Tool::RegisterWebhook,
    ];

    /// Stable wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::CreateBotEmail => "create_bot_email",
            Tool::GetEmails => "get_emails",
            Tool::GetEmailById => "get_email_by_id",
            Tool::RegisterWebhook => "register_webhook",
        }
    }

    /// Resolve a wire name. Exact, case-sensitive match.
    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Whether the call needs a bot account credential.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Tool::CreateBotEmail)
    }

    /// Catalog metadata for this tool.
    pub fn entry(&self) -> ToolEntry {
        let (description, parameters) = match self {
            Tool::CreateBotEmail => (
                "Create a new bot email account at botemail.ai",
                vec![ParamDef::required(
                    "username",
                    "Username for the bot (lowercase, letters, numbers, underscores, hyphens only)",
                )],
            ),
            Tool::GetEmails => (
                "Get inbox for a bot email account",
                vec![
                    ParamDef::required(
                        "email",
                        "Bot email address (e.g., mybot_bot@botemail.ai)",
                    ),
                    ParamDef::required("apiKey", API_KEY_DESCRIPTION),
                ],
            ),
            Tool::GetEmailById => (
                "Get a specific email by ID",
                vec![
                    ParamDef::required("email", "Bot email address"),
                    ParamDef::required("emailId", "Email ID to retrieve"),
                    ParamDef::required("apiKey", API_KEY_DESCRIPTION),
                ],
            ),
            Tool::RegisterWebhook => (
                "Register a webhook URL to receive push notifications for new emails",
                vec![
                    ParamDef::required("email", "Bot email address"),
                    ParamDef::required("webhookUrl", "URL to send webhook notifications to"),
                    ParamDef::required("apiKey", API_KEY_DESCRIPTION),
                ],
            ),
        };

        ToolEntry {
            name: self.name(),
            description,
            parameters,
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Tool entry
// =============================================================================

/// Complete tool metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParamDef>,
}

impl ToolEntry {
    /// Render the parameters as a JSON Schema object (MCP `inputSchema`).
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.to_string(),
                json!({
                    "type": param.param_type.json_type(),
                    "description": param.description,
                }),
            );
        }
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Validate an argument bag against this entry.
    ///
    /// Returns a list of validation errors (empty = valid). Parameters the
    /// entry does not declare are ignored.
    pub fn validate_params(&self, params: &Map<String, Value>) -> Vec<String> {
        let mut errors = Vec::new();

        for param_def in &self.parameters {
            match params.get(param_def.name) {
                None | Some(Value::Null) if param_def.required => {
                    errors.push(format!("Missing required parameter: {}", param_def.name));
                }
                None | Some(Value::Null) => {}
                Some(value) => {
                    if let Err(e) = param_def.param_type.validate(value) {
                        errors.push(format!("Parameter '{}': {}", param_def.name, e));
                    }
                }
            }
        }

        errors
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Immutable, ordered tool catalog.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    entries: Vec<ToolEntry>,
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            entries: Tool::ALL.iter().map(Tool::entry).collect(),
        }
    }

    /// Resolve a tool name against the catalog.
    pub fn resolve(&self, name: &str) -> Option<(Tool, &ToolEntry)> {
        let tool = Tool::from_name(name)?;
        self.entries
            .iter()
            .find(|e| e.name == tool.name())
            .map(|entry| (tool, entry))
    }

    /// Get a tool entry by name.
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.resolve(name).map(|(_, entry)| entry)
    }

    /// List all tool entries in catalog order.
    pub fn list_entries(&self) -> &[ToolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn required_names(entry: &ToolEntry) -> Vec<&'static str> {
        entry
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn test_catalog_has_four_tools_in_order() {
        let catalog = ToolCatalog::new();
        let names: Vec<&str> = catalog.list_entries().iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec!["create_bot_email", "get_emails", "get_email_by_id", "register_webhook"]
        );
    }

    #[test]
    fn test_catalog_required_fields() {
        let catalog = ToolCatalog::new();
        assert_eq!(required_names(catalog.get("create_bot_email").unwrap()), vec!["username"]);
        assert_eq!(required_names(catalog.get("get_emails").unwrap()), vec!["email", "apiKey"]);
        assert_eq!(
            required_names(catalog.get("get_email_by_id").unwrap()),
            vec!["email", "emailId", "apiKey"]
        );
        assert_eq!(
            required_names(catalog.get("register_webhook").unwrap()),
            vec!["email", "webhookUrl", "apiKey"]
        );
        for entry in catalog.list_entries() {
            assert!(entry.parameters.iter().all(|p| p.required));
        }
    }

    #[test]
    fn test_catalog_is_deterministic() {
        let a = ToolCatalog::new();
        let b = ToolCatalog::new();
        assert_eq!(a.list_entries(), b.list_entries());
        assert_eq!(a.list_entries(), a.list_entries());
    }

    #[test]
    fn test_names_unique_and_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        let mut names: Vec<&str> = Tool::ALL.iter().map(Tool::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 4);
        assert_eq!(Tool::from_name("Get_Emails"), None);
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = ToolCatalog::new();
        assert!(catalog.resolve("delete_everything").is_none());
        assert!(catalog.get("").is_none());
    }

    #[test]
    fn test_input_schema_shape() {
        let schema = Tool::GetEmailById.entry().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["emailId"]["type"], "string");
        assert_eq!(schema["properties"]["emailId"]["description"], "Email ID to retrieve");
        assert_eq!(schema["required"], json!(["email", "emailId", "apiKey"]));
    }

    #[test]
    fn test_validate_params_valid() {
        let entry = Tool::GetEmails.entry();
        let params = json!({"email": "bot@botemail.ai", "apiKey": "k"});
        let errors = entry.validate_params(params.as_object().unwrap());
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }

    #[test]
    fn test_validate_params_missing_and_null() {
        let entry = Tool::RegisterWebhook.entry();
        let params = json!({"email": "bot@botemail.ai", "webhookUrl": null});
        let errors = entry.validate_params(params.as_object().unwrap());
        assert_eq!(
            errors,
            vec![
                "Missing required parameter: webhookUrl".to_string(),
                "Missing required parameter: apiKey".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_params_wrong_type() {
        let entry = Tool::CreateBotEmail.entry();
        let params = json!({"username": 42});
        let errors = entry.validate_params(params.as_object().unwrap());
        assert_eq!(errors, vec!["Parameter 'username': expected string, got number".to_string()]);
    }

    #[test]
    fn test_validate_params_ignores_undeclared() {
        let entry = Tool::CreateBotEmail.entry();
        let params = json!({"username": "mybot", "color": "blue"});
        assert!(entry.validate_params(params.as_object().unwrap()).is_empty());
    }

    #[test]
    fn test_param_type_validation() {
        assert!(ParamType::String.validate(&json!("x")).is_ok());
        assert_eq!(
            ParamType::String.validate(&json!([1])),
            Err("expected string, got array".to_string())
        );
        assert_eq!(value_type_name(&Value::Null), "null");
    }
}
