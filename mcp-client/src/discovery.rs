//! Orchestrator-side readiness polling: wait until every configured MCP
//! answers `GET /functions` with HTTP 200 before registering any of them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::handle::McpHandle;

#[derive(Debug, thiserror::Error)]
#[error("mcp readiness deadline exceeded, still not ready: {0:?}")]
pub struct DiscoveryTimeout(pub Vec<String>);

/// Polls every handle's `/functions` endpoint at `poll_interval` until all are
/// ready or `deadline` elapses. On timeout, names every MCP still not ready.
pub async fn wait_for_ready(
    handles: &[Arc<McpHandle>],
    poll_interval: Duration,
    deadline: Duration,
) -> Result<(), DiscoveryTimeout> {
    let start = Instant::now();
    loop {
        let mut pending = Vec::new();
        for h in handles {
            if !h.is_ready().await {
                pending.push(h.name.clone());
            }
        }
        if pending.is_empty() {
            return Ok(());
        }
        if start.elapsed() >= deadline {
            return Err(DiscoveryTimeout(pending));
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn all_ready_returns_ok_immediately() {
        let base = spawn(Router::new().route("/functions", get(|| async { Json(serde_json::json!([])) }))).await;
        let handles = vec![Arc::new(McpHandle::new("a", base))];
        let result = wait_for_ready(&handles, Duration::from_millis(10), Duration::from_millis(200)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unreachable_mcp_times_out_naming_it() {
        let handles = vec![Arc::new(McpHandle::new("dead", "http://127.0.0.1:1"))];
        let result = wait_for_ready(&handles, Duration::from_millis(5), Duration::from_millis(30)).await;
        let err = result.unwrap_err();
        assert_eq!(err.0, vec!["dead".to_string()]);
    }
}
