//! MCP registration (§4.3): build a handle per active key, wait for every
//! one to answer `GET /functions`, then fill a [`loom::ToolCatalog`] from
//! the allow-listed subset.

use std::sync::Arc;
use std::time::Duration;

use loom::{LocalTool, ToolCatalog};
use mcp_client::{wait_for_ready, DiscoveryTimeout, McpHandle};

/// §4.3: poll at least every 500ms, up to a 30s deadline.
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const READY_DEADLINE: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("unknown mcp key: {0}")]
    UnknownKey(String),
    #[error(transparent)]
    NotReady(#[from] DiscoveryTimeout),
}

/// Resolves each active key to an `McpHandle` via the registry's base URL.
pub fn build_handles(keys: &[String]) -> Result<Vec<Arc<McpHandle>>, RegistrationError> {
    keys.iter()
        .map(|key| {
            let descriptor = mcp_client::find(key).ok_or_else(|| RegistrationError::UnknownKey(key.clone()))?;
            Ok(Arc::new(McpHandle::new(descriptor.key, descriptor.base_url())))
        })
        .collect()
}

/// Blocks until every handle answers `GET /functions` (§4.3 startup ordering).
pub async fn wait_until_all_ready(handles: &[Arc<McpHandle>]) -> Result<(), RegistrationError> {
    wait_for_ready(handles, READY_POLL_INTERVAL, READY_DEADLINE).await?;
    Ok(())
}

/// Registers every published function of `handles` whose key passes
/// `allow` (`None` means "allow all") into `catalog` as a remote tool.
pub async fn register_remote_tools(
    catalog: &mut ToolCatalog,
    handles: &[Arc<McpHandle>],
    allow: Option<&[String]>,
) -> Result<(), mcp_client::ClientError> {
    for handle in handles {
        if let Some(allow) = allow {
            if !allow.iter().any(|k| k == &handle.name) {
                continue;
            }
        }
        for schema in handle.list_functions().await? {
            let method = schema.name.clone();
            catalog.register_remote(schema, handle.clone(), method);
        }
    }
    Ok(())
}

pub fn register_local_tool(catalog: &mut ToolCatalog, tool: Arc<dyn LocalTool>) {
    catalog.register_local(tool);
}
