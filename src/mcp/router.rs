//! Method router — maps one inbound JSON-RPC line to a reply or a tool call.

use serde_json::{json, Value};

use super::protocol::{
    InitializeResult, JsonRpcRequest, JsonRpcResponse, ServerCapabilities, ServerInfo,
    ToolDescriptor, ToolsCapability, ToolsListResult, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, MCP_PROTOCOL_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::gateway::{Gateway, ToolCall};
use crate::types::ServerConfig;

/// What the server should do with one inbound message.
#[derive(Debug)]
pub enum Routed {
    /// Write this reply immediately.
    Reply(JsonRpcResponse),
    /// Run a tool call and reply with its result under `id`.
    Call { id: Option<Value>, call: ToolCall },
    /// Notification; nothing to write.
    Ignore,
}

/// Route one raw JSON-RPC message.
pub fn route(raw: &str, gateway: &Gateway, server: &ServerConfig) -> Routed {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => return Routed::Reply(JsonRpcResponse::error(None, PARSE_ERROR, e.to_string())),
    };
    let request: JsonRpcRequest = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            return Routed::Reply(JsonRpcResponse::error(
                None,
                INVALID_REQUEST,
                format!("Invalid request: {}", e),
            ))
        }
    };

    if request.is_notification() {
        tracing::debug!(method = %request.method, "notification received");
        return Routed::Ignore;
    }

    let id = request.id.clone();
    match request.method.as_str() {
        "initialize" => {
            let result = InitializeResult {
                protocol_version: MCP_PROTOCOL_VERSION.into(),
                capabilities: ServerCapabilities {
                    tools: ToolsCapability {},
                },
                server_info: ServerInfo {
                    name: server.name.clone(),
                    version: server.version.clone(),
                },
            };
            Routed::Reply(to_reply(id, &result))
        }

        "ping" => Routed::Reply(JsonRpcResponse::success(id, json!({}))),

        "tools/list" => {
            let result = ToolsListResult {
                tools: gateway.list_tools().iter().map(ToolDescriptor::from).collect(),
            };
            Routed::Reply(to_reply(id, &result))
        }

        "tools/call" => match serde_json::from_value::<ToolCall>(request.params) {
            Ok(call) => Routed::Call { id, call },
            Err(e) => Routed::Reply(JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("Invalid tools/call params: {}", e),
            )),
        },

        other => Routed::Reply(JsonRpcResponse::error(
            id,
            METHOD_NOT_FOUND,
            format!("Unknown method: {}", other),
        )),
    }
}

fn to_reply<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse::success(id, v),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Serialization error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RemoteConfig;

    fn gateway() -> Gateway {
        Gateway::new(&RemoteConfig::default()).unwrap()
    }

    fn reply(raw: &str) -> JsonRpcResponse {
        match route(raw, &gateway(), &ServerConfig::default()) {
            Routed::Reply(r) => r,
            other => panic!("expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_initialize() {
        let r = reply(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#);
        let result = r.result.unwrap();
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "botemail-mcp");
        assert_eq!(result["capabilities"]["tools"], json!({}));
        assert_eq!(r.id, Some(json!(1)));
    }

    #[test]
    fn test_tools_list() {
        let r = reply(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#);
        let tools = r.result.unwrap()["tools"].as_array().cloned().unwrap();
        assert_eq!(tools.len(), 4);
        assert_eq!(tools[0]["name"], "create_bot_email");
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["username"]));
    }

    #[test]
    fn test_tools_call_routes_to_call() {
        let routed = route(
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"get_emails","arguments":{"email":"a@x"}}}"#,
            &gateway(),
            &ServerConfig::default(),
        );
        match routed {
            Routed::Call { id, call } => {
                assert_eq!(id, Some(json!(7)));
                assert_eq!(call.name, "get_emails");
                assert_eq!(call.arguments["email"], "a@x");
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_tools_call_bad_params() {
        let r = reply(r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"arguments":{}}}"#);
        assert_eq!(r.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_parse_error_and_unknown_method() {
        assert_eq!(reply("{not json").error.unwrap().code, PARSE_ERROR);
        assert_eq!(reply(r#"[1,2]"#).error.unwrap().code, INVALID_REQUEST);
        let r = reply(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#);
        assert_eq!(r.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_notifications_ignored() {
        let routed = route(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            &gateway(),
            &ServerConfig::default(),
        );
        assert!(matches!(routed, Routed::Ignore));
    }

    #[test]
    fn test_null_id_gets_reply() {
        let r = reply(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#);
        assert_eq!(r.result, Some(json!({})));
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert!(value.as_object().unwrap().contains_key("id"));
    }
}
