//! `orchestrator` binary: wait for the MCP fleet, register its tools, and
//! run a simple stdin/stdout agent REPL against an OpenAI-compatible LLM.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use loom::{Agent, AgentOutcome, ChatOpenAI};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "orchestrator")]
#[command(about = "Agent orchestrator over the MCP fleet")]
struct Args {
    /// Chat model name passed through to the LLM client
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Manifest file to fall back to when ACTIVE_MCPS is unset (§6.3)
    #[arg(long, value_name = "PATH")]
    manifest_path: Option<PathBuf>,

    /// Restrict the catalog to these MCP keys; defaults to every active MCP
    #[arg(long, value_delimiter = ',')]
    allow: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let _ = config::load_and_apply("loom", None);

    let keys = orchestrator::active_mcps(args.manifest_path.as_deref());
    if keys.is_empty() {
        anyhow::bail!("no active MCPs: set ACTIVE_MCPS or pass --manifest-path");
    }

    let handles = orchestrator::registration::build_handles(&keys)?;
    tracing::info!(mcps = ?keys, "waiting for mcp fleet to become ready");
    orchestrator::registration::wait_until_all_ready(&handles).await?;

    let llm: Arc<dyn loom::LlmClient> = Arc::new(ChatOpenAI::from_env());
    let allow = if args.allow.is_empty() { None } else { Some(args.allow.as_slice()) };
    let catalog = orchestrator::build_top_level_catalog(&handles, allow, llm.clone(), &args.model).await?;

    let agent = Agent::new(llm, args.model.clone(), catalog);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("orchestrator ready. Type a message and press enter (Ctrl-D to quit).");

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match agent.run(orchestrator::ORCHESTRATOR_SYSTEM_PROMPT, &line).await {
            Ok(AgentOutcome::FinalAnswer(text)) => println!("{text}"),
            Ok(AgentOutcome::GuiCommand { tool, args }) => println!("[{tool}] {args}"),
            Err(e) => eprintln!("agent error: {e}"),
        }
        stdout.flush()?;
    }

    Ok(())
}
