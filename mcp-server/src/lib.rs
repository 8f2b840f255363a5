//! Reusable MCP server skeleton: `GET /functions` plus a JSON-RPC 2.0 `POST /mcp`.
//!
//! Each concrete MCP (files, web, shell, ...) registers its own [`McpMethod`]
//! implementations and function schemas; this crate only owns the HTTP/JSON-RPC
//! plumbing every MCP shares.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;

use mcp_protocol::{error_codes, FunctionSchema, JsonRpcRequest, JsonRpcResponse, RpcError};

/// One dispatchable JSON-RPC method. Implementations own their own parameter
/// validation and return `Err(RpcError)` with the appropriate code.
#[async_trait]
pub trait McpMethod: Send + Sync {
    async fn call(&self, params: Value) -> Result<Value, RpcError>;
}

/// Holds the published function schemas and the method dispatch table for one MCP.
pub struct McpServer {
    functions: Vec<FunctionSchema>,
    methods: HashMap<String, Arc<dyn McpMethod>>,
}

impl McpServer {
    pub fn new() -> Self {
        Self {
            functions: Vec::new(),
            methods: HashMap::new(),
        }
    }

    /// Registers a method under `name`, publishing `schema` via `/functions`.
    pub fn register(
        mut self,
        name: impl Into<String>,
        schema: FunctionSchema,
        method: Arc<dyn McpMethod>,
    ) -> Self {
        let name = name.into();
        self.functions.push(schema);
        self.methods.insert(name, method);
        self
    }

    pub fn into_router(self) -> Router {
        let state = Arc::new(self);
        Router::new()
            .route("/functions", get(functions_handler))
            .route("/mcp", post(mcp_handler))
            .with_state(state)
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn functions_handler(State(state): State<Arc<McpServer>>) -> Json<Vec<FunctionSchema>> {
    Json(state.functions.clone())
}

/// Request-shape and method-not-found/invalid-params failures all respond HTTP 400
/// with a JSON-RPC error body, matching the original MCP reference server's
/// `JsonRpcError -> 400` mapping. Anything else (an unexpected panic path) is a
/// 500 with `INTERNAL_ERROR`.
async fn mcp_handler(State(state): State<Arc<McpServer>>, body: Json<Value>) -> Response {
    let id = body.get("id").cloned().unwrap_or(Value::Null);

    let request: JsonRpcRequest = match validate_request(&body, id.clone()) {
        Ok(req) => req,
        Err(err) => return bad_request(id, err),
    };

    let method = match state.methods.get(&request.method) {
        Some(m) => m,
        None => return bad_request(id, RpcError::method_not_found(&request.method)),
    };

    match method.call(request.params).await {
        Ok(result) => Json(JsonRpcResponse::success(id, result)).into_response(),
        Err(err) if err.code == error_codes::INTERNAL_ERROR => internal_error(id, err),
        Err(err) => bad_request(id, err),
    }
}

fn validate_request(body: &Value, id: Value) -> Result<JsonRpcRequest, RpcError> {
    let jsonrpc = body.get("jsonrpc").and_then(Value::as_str);
    if jsonrpc != Some("2.0") {
        return Err(RpcError::new(
            error_codes::INVALID_REQUEST,
            "missing or invalid \"jsonrpc\" field",
        ));
    }
    if body.get("id").is_none() {
        return Err(RpcError::new(error_codes::INVALID_REQUEST, "missing \"id\""));
    }
    let method = body
        .get("method")
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::new(error_codes::INVALID_REQUEST, "missing \"method\""))?;
    let params = body.get("params").cloned().unwrap_or(Value::Null);
    Ok(JsonRpcRequest::new(id, method, params))
}

fn bad_request(id: Value, err: RpcError) -> Response {
    tracing::warn!(code = err.code, message = %err.message, "mcp request rejected");
    (
        StatusCode::BAD_REQUEST,
        Json(JsonRpcResponse::failure(id, err)),
    )
        .into_response()
}

fn internal_error(id: Value, err: RpcError) -> Response {
    tracing::error!(message = %err.message, "mcp internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(JsonRpcResponse::failure(id, err)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct Echo;

    #[async_trait]
    impl McpMethod for Echo {
        async fn call(&self, params: Value) -> Result<Value, RpcError> {
            Ok(params)
        }
    }

    struct AlwaysInternal;

    #[async_trait]
    impl McpMethod for AlwaysInternal {
        async fn call(&self, _params: Value) -> Result<Value, RpcError> {
            Err(RpcError::internal("boom"))
        }
    }

    fn server() -> Router {
        McpServer::new()
            .register(
                "echo",
                FunctionSchema {
                    name: "echo".into(),
                    description: Some("echoes params".into()),
                    parameters: serde_json::json!({"type": "object"}),
                },
                Arc::new(Echo),
            )
            .register(
                "explode",
                FunctionSchema {
                    name: "explode".into(),
                    description: None,
                    parameters: serde_json::json!({"type": "object"}),
                },
                Arc::new(AlwaysInternal),
            )
            .into_router()
    }

    async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn functions_endpoint_lists_registered_schemas() {
        let resp = server()
            .oneshot(Request::builder().uri("/functions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let schemas: Vec<FunctionSchema> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(schemas.len(), 2);
    }

    #[tokio::test]
    async fn valid_call_returns_200_with_result() {
        let (status, body) = post_json(
            server(),
            serde_json::json!({"jsonrpc":"2.0","id":1,"method":"echo","params":{"x":1}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["x"], 1);
    }

    #[tokio::test]
    async fn unknown_method_is_400_with_method_not_found_code() {
        let (status, body) = post_json(
            server(),
            serde_json::json!({"jsonrpc":"2.0","id":1,"method":"nope","params":{}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_jsonrpc_field_is_400_invalid_request() {
        let (status, body) = post_json(
            server(),
            serde_json::json!({"id":1,"method":"echo","params":{}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], error_codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn internal_failure_is_500() {
        let (status, body) = post_json(
            server(),
            serde_json::json!({"jsonrpc":"2.0","id":1,"method":"explode","params":{}}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], error_codes::INTERNAL_ERROR);
    }
}
