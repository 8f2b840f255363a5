//! Agent orchestrator: waits for the MCP fleet to become ready, assembles the
//! tool catalog, wires up hierarchical delegation to the RPG sub-agent, and
//! drives the top-level agent loop.
//!
//! **Public API**: [`registration`], [`active_mcps`].

pub mod registration;

use std::sync::Arc;

use loom::ToolCatalog;
use loom::delegation::RpgTaskDelegate;
use loom::llm::LlmClient;
use mcp_client::McpHandle;

pub use registration::RegistrationError;

pub const ORCHESTRATOR_SYSTEM_PROMPT: &str = "You are a local desktop assistant with access to a set of \
tools, one of which lets you delegate self-contained RPG actions to a specialized sub-agent. Use tools \
when a request requires them; otherwise answer directly.";

/// Reads `ACTIVE_MCPS` from the process environment (§6.3), falling back to
/// an explicit manifest file if the variable is unset.
pub fn active_mcps(manifest_path: Option<&std::path::Path>) -> Vec<String> {
    if let Ok(raw) = std::env::var("ACTIVE_MCPS") {
        return raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect();
    }
    manifest_path
        .and_then(|path| std::fs::read_to_string(path).ok())
        .map(|content| {
            content
                .trim()
                .strip_prefix("ACTIVE_MCPS=")
                .unwrap_or(content.trim())
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Builds the top-level catalog: every allow-listed remote MCP method, plus
/// `execute_rpg_task` if an MCP named "rpg" is present among `handles`.
pub async fn build_top_level_catalog(
    handles: &[Arc<McpHandle>],
    allow: Option<&[String]>,
    llm: Arc<dyn LlmClient>,
    model: &str,
) -> Result<ToolCatalog, mcp_client::ClientError> {
    let mut catalog = ToolCatalog::new();
    registration::register_remote_tools(&mut catalog, handles, allow).await?;

    if let Some(rpg_handle) = handles.iter().find(|h| h.name == "rpg") {
        let delegate = RpgTaskDelegate::new(llm, model.to_string(), rpg_handle.clone());
        registration::register_local_tool(&mut catalog, Arc::new(delegate));
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_mcps_prefers_the_environment_variable() {
        std::env::set_var("ACTIVE_MCPS", "files,rpg");
        assert_eq!(active_mcps(None), vec!["files", "rpg"]);
        std::env::remove_var("ACTIVE_MCPS");
    }

    #[test]
    fn active_mcps_falls_back_to_a_manifest_file() {
        std::env::remove_var("ACTIVE_MCPS");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest");
        std::fs::write(&path, "ACTIVE_MCPS=web,rpg\n").unwrap();
        assert_eq!(active_mcps(Some(&path)), vec!["web", "rpg"]);
    }
}
