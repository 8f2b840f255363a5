//! Wire types for the MCP (Modular Capability Provider) fabric.
//!
//! An MCP is a small JSON-RPC 2.0 service reachable over HTTP: `GET /functions`
//! lists the tools it publishes, `POST /mcp` invokes one. This crate owns only
//! the envelope shapes; each MCP's own business logic is out of scope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC error codes this fabric recognizes. Application errors may use
/// any code in `-32000..=-32099`; the ones below are reserved by JSON-RPC.
pub mod error_codes {
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const APPLICATION_ERROR: i32 = -32000;
}

/// One callable function an MCP publishes. Immutable after registration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FunctionSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON-schema-shaped object describing the call's parameters.
    pub parameters: Value,
}

/// `{jsonrpc:"2.0", id, method, params}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// `{code, message}` inside a JSON-RPC error response.
#[derive(Clone, Debug, Serialize, Deserialize, thiserror::Error)]
#[error("mcp error {code}: {message}")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_codes::METHOD_NOT_FOUND,
            format!("method not found: {method}"),
        )
    }

    pub fn invalid_params(name: &str) -> Self {
        Self::new(
            error_codes::INVALID_PARAMS,
            format!("invalid or missing parameter: {name}"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message.into())
    }
}

/// `{jsonrpc:"2.0", id, result}` or `{jsonrpc:"2.0", id, error}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_omits_error_field() {
        let resp = JsonRpcResponse::success(Value::from(1), serde_json::json!({"ok": true}));
        let v = serde_json::to_value(&resp).unwrap();
        assert!(v.get("error").is_none());
        assert_eq!(v["result"]["ok"], true);
    }

    #[test]
    fn failure_response_omits_result_field() {
        let resp = JsonRpcResponse::failure(Value::from(1), RpcError::method_not_found("foo"));
        let v = serde_json::to_value(&resp).unwrap();
        assert!(v.get("result").is_none());
        assert_eq!(v["error"]["code"], error_codes::METHOD_NOT_FOUND);
    }
}
