//! The fabric's single source of truth for which MCPs exist.
//!
//! Mirrors the original registry table: one descriptor per MCP key, each
//! naming its script/endpoint, the env var that overrides its port, and a
//! default port. Adding an MCP to the fleet means adding an entry here.

/// `{key, display_name, script_or_endpoint, port, description}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MCPDescriptor {
    pub key: &'static str,
    pub display_name: &'static str,
    pub script_or_endpoint: &'static str,
    pub port_env: &'static str,
    pub default_port: u16,
    pub description: &'static str,
}

/// The built-in descriptor table. Internal business logic of each MCP
/// (browser automation, Telegram, file sandbox, ...) is out of scope here;
/// only the registration shape is specified.
pub const REGISTRY: &[MCPDescriptor] = &[
    MCPDescriptor {
        key: "files",
        display_name: "Files",
        script_or_endpoint: "mcp_files",
        port_env: "MCP_FILES_PORT",
        default_port: 8001,
        description: "Sandboxed file and directory access.",
    },
    MCPDescriptor {
        key: "web",
        display_name: "Web",
        script_or_endpoint: "mcp_web",
        port_env: "MCP_WEB_PORT",
        default_port: 8002,
        description: "Browser navigation and page interaction.",
    },
    MCPDescriptor {
        key: "shell",
        display_name: "Shell",
        script_or_endpoint: "mcp_shell",
        port_env: "MCP_SHELL_PORT",
        default_port: 8003,
        description: "Whitelisted shell command execution.",
    },
    MCPDescriptor {
        key: "clipboard",
        display_name: "Clipboard",
        script_or_endpoint: "mcp_clipboard",
        port_env: "MCP_CLIPBOARD_PORT",
        default_port: 8004,
        description: "Read/write the system clipboard.",
    },
    MCPDescriptor {
        key: "telegram",
        display_name: "Telegram",
        script_or_endpoint: "mcp_telegram",
        port_env: "MCP_TELEGRAM_PORT",
        default_port: 8005,
        description: "Read and send Telegram messages.",
    },
    MCPDescriptor {
        key: "semantic_memory",
        display_name: "Semantic Memory",
        script_or_endpoint: "mcp_semantic_memory",
        port_env: "MCP_SEMANTIC_MEMORY_PORT",
        default_port: 8007,
        description: "Semantic recall plus an entity graph.",
    },
    MCPDescriptor {
        key: "rpg",
        display_name: "RPG Engine",
        script_or_endpoint: "mcp_rpg",
        port_env: "MCP_RPG_PORT",
        default_port: 8008,
        description: "Drives the authoritative RPG game server.",
    },
];

/// Looks up a descriptor by key.
pub fn find(key: &str) -> Option<&'static MCPDescriptor> {
    REGISTRY.iter().find(|d| d.key == key)
}

impl MCPDescriptor {
    /// Resolves the HTTP base URL: env var override, else `default_port` on loopback.
    pub fn base_url(&self) -> String {
        let port = std::env::var(self.port_env)
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(self.default_port);
        format!("http://127.0.0.1:{port}")
    }
}
