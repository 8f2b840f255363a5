//! Spawns and supervises one child process per active MCP (§2 Launcher,
//! ≈5% of core budget): start it, stream its stdout into tracing, and
//! propagate shutdown by killing every child.

use std::process::Stdio;

use mcp_client::MCPDescriptor;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("unknown mcp key: {0}")]
    UnknownKey(String),
    #[error("failed to spawn {key} ({script}): {source}")]
    Spawn {
        key: String,
        script: String,
        #[source]
        source: std::io::Error,
    },
}

struct Supervised {
    key: String,
    child: Child,
    stdout_task: JoinHandle<()>,
}

/// The set of MCP processes this launcher invocation started.
pub struct Fleet {
    processes: Vec<Supervised>,
}

fn stream_stdout(key: String, child: &mut Child) -> JoinHandle<()> {
    let stdout = child.stdout.take().expect("child spawned with Stdio::piped()");
    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => tracing::info!(mcp = %key, "{line}"),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(mcp = %key, error = %e, "error reading mcp stdout");
                    break;
                }
            }
        }
    })
}

/// Spawns one child process per `keys` entry found in the registry. Fails
/// fast on the first unknown key or spawn error, but does not attempt to
/// kill already-spawned children — callers that want partial-failure cleanup
/// should call [`Fleet::shutdown`] themselves on the partially built list.
pub fn spawn_fleet(keys: &[String]) -> Result<Fleet, SupervisorError> {
    let mut processes = Vec::with_capacity(keys.len());
    for key in keys {
        let descriptor: &MCPDescriptor = mcp_client::find(key).ok_or_else(|| SupervisorError::UnknownKey(key.clone()))?;

        let mut child = Command::new(descriptor.script_or_endpoint)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SupervisorError::Spawn {
                key: key.clone(),
                script: descriptor.script_or_endpoint.to_string(),
                source,
            })?;

        let stdout_task = stream_stdout(key.clone(), &mut child);
        processes.push(Supervised {
            key: key.clone(),
            child,
            stdout_task,
        });
    }
    Ok(Fleet { processes })
}

impl Fleet {
    pub fn keys(&self) -> Vec<String> {
        self.processes.iter().map(|p| p.key.clone()).collect()
    }

    /// Kills every child and waits for its stdout-streaming task to finish.
    pub async fn shutdown(mut self) {
        for supervised in &mut self.processes {
            if let Err(e) = supervised.child.start_kill() {
                tracing::debug!(mcp = %supervised.key, error = %e, "failed to signal child (likely already exited)");
            }
        }
        for supervised in self.processes {
            let _ = supervised.child.wait().await;
            let _ = supervised.stdout_task.await;
        }
    }
}
