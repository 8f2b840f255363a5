//! # Loom
//!
//! The agent runtime: a bounded ReAct loop over an injected [`llm::LlmClient`]
//! and a [`tool_catalog::ToolCatalog`] assembled from local tools and
//! discovered MCP methods.
//!
//! ## Main modules
//!
//! - [`message`]: [`message::Message`], [`message::Role`] — the conversation the loop reads and appends to.
//! - [`llm`]: [`llm::LlmClient`] trait, [`llm::MockLlm`], [`llm::ChatOpenAI`].
//! - [`tool_catalog`]: [`tool_catalog::ToolCatalog`], [`tool_catalog::LocalTool`] — the name-indexed set of callable tools.
//! - [`agent`]: [`agent::Agent`] — the turn-bounded loop itself.
//! - [`delegation`]: [`delegation::RpgTaskDelegate`] — hierarchical delegation to an RPG-only sub-agent.
//! - [`error`]: [`error::AgentError`].

pub mod agent;
pub mod delegation;
pub mod error;
pub mod llm;
pub mod message;
pub mod tool_catalog;

pub use agent::{Agent, AgentOutcome, MAX_AGENT_TURNS};
pub use delegation::RpgTaskDelegate;
pub use error::AgentError;
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, MockLlm, ToolChoiceMode};
pub use message::{Message, Role, ToolCallRequest};
pub use tool_catalog::{LocalTool, ToolCatalog, ToolError};
