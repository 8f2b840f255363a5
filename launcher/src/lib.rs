//! Launcher: spawns MCP processes, streams their stdout into tracing,
//! writes the `ACTIVE_MCPS` discovery manifest, and propagates shutdown.
//!
//! **Public API**: [`manifest`], [`supervisor::spawn_fleet`], [`supervisor::Fleet`].

pub mod manifest;
pub mod supervisor;

pub use supervisor::{Fleet, SupervisorError};
