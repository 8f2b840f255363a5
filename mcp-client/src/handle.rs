//! Per-MCP client handle: a monotonic request-id counter and a synchronous
//! call API over `POST {base_url}/mcp`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use mcp_protocol::{FunctionSchema, JsonRpcRequest, JsonRpcResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("mcp {mcp}: http error calling {method}: {source}")]
    Http {
        mcp: String,
        method: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("mcp {mcp}: http {status} calling {method}: {body}")]
    Status {
        mcp: String,
        method: String,
        status: u16,
        body: String,
    },
    #[error("mcp {mcp}: {method} failed ({code}): {message}")]
    Rpc {
        mcp: String,
        method: String,
        code: i32,
        message: String,
    },
    #[error("mcp {mcp}: malformed response to {method}: {source}")]
    Decode {
        mcp: String,
        method: String,
        #[source]
        source: reqwest::Error,
    },
}

/// `{name, base_url, next_request_id}`. `next_request_id` starts at 1 and is
/// monotonic for the lifetime of the handle.
pub struct McpHandle {
    pub name: String,
    pub base_url: String,
    next_request_id: AtomicU64,
    client: reqwest::Client,
}

impl McpHandle {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            next_request_id: AtomicU64::new(1),
            client: reqwest::Client::new(),
        }
    }

    /// Fetches the published function schemas via `GET /functions`.
    pub async fn list_functions(&self) -> Result<Vec<FunctionSchema>, ClientError> {
        let url = format!("{}/functions", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                mcp: self.name.clone(),
                method: "functions".to_string(),
                source: e,
            })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                mcp: self.name.clone(),
                method: "functions".to_string(),
                status: status.as_u16(),
                body,
            });
        }
        resp.json().await.map_err(|e| ClientError::Decode {
            mcp: self.name.clone(),
            method: "functions".to_string(),
            source: e,
        })
    }

    /// A single GET /functions probe used by readiness discovery; returns
    /// `true` only on HTTP 200.
    pub async fn is_ready(&self) -> bool {
        let url = format!("{}/functions", self.base_url);
        matches!(self.client.get(&url).send().await, Ok(r) if r.status().is_success())
    }

    /// Calls `method` with `params` via `POST /mcp`, using and incrementing
    /// this handle's monotonic id.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest::new(id, method, params);
        let url = format!("{}/mcp", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                mcp: self.name.clone(),
                method: method.to_string(),
                source: e,
            })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                mcp: self.name.clone(),
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        let parsed: JsonRpcResponse = resp.json().await.map_err(|e| ClientError::Decode {
            mcp: self.name.clone(),
            method: method.to_string(),
            source: e,
        })?;
        if let Some(err) = parsed.error {
            return Err(ClientError::Rpc {
                mcp: self.name.clone(),
                method: method.to_string(),
                code: err.code,
                message: err.message,
            });
        }
        Ok(parsed.result.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::sync::atomic::AtomicU64 as StdAtomicU64;
    use std::sync::Arc;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn call_increments_request_id_each_time() {
        let seen_ids = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_ids2 = Arc::clone(&seen_ids);
        let router = Router::new().route(
            "/mcp",
            post(move |Json(body): Json<Value>| {
                let seen_ids = Arc::clone(&seen_ids2);
                async move {
                    seen_ids.lock().unwrap().push(body["id"].clone());
                    Json(serde_json::json!({"jsonrpc":"2.0","id":body["id"],"result":{}}))
                }
            }),
        );
        let base = spawn(router).await;
        let handle = McpHandle::new("test", base);
        handle.call("ping", Value::Null).await.unwrap();
        handle.call("ping", Value::Null).await.unwrap();
        let ids = seen_ids.lock().unwrap().clone();
        assert_eq!(ids, vec![Value::from(1), Value::from(2)]);
        let _ = StdAtomicU64::new(0);
    }

    #[tokio::test]
    async fn rpc_error_surfaces_mcp_name_method_code_and_message() {
        let router = Router::new().route(
            "/mcp",
            post(|Json(_body): Json<Value>| async move {
                Json(serde_json::json!({
                    "jsonrpc":"2.0","id":1,
                    "error":{"code":-32601,"message":"no such method"}
                }))
            }),
        );
        let base = spawn(router).await;
        let handle = McpHandle::new("demo", base);
        let err = handle.call("bogus", Value::Null).await.unwrap_err();
        match err {
            ClientError::Rpc {
                mcp,
                method,
                code,
                message,
            } => {
                assert_eq!(mcp, "demo");
                assert_eq!(method, "bogus");
                assert_eq!(code, -32601);
                assert_eq!(message, "no such method");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn is_ready_true_only_on_http_200() {
        let router = Router::new().route("/functions", get(|| async { Json(serde_json::json!([])) }));
        let base = spawn(router).await;
        let ready = McpHandle::new("test", base);
        assert!(ready.is_ready().await);
        let dead = McpHandle::new("dead", "http://127.0.0.1:1");
        assert!(!dead.is_ready().await);
    }
}
