//! agent-cli
//!
//! Interactive session boundary for the MCP agent loop: spawns the
//! tool server named on the command line, discovers its tools, then
//! reads one user line at a time and runs one agent turn per line.
//! Empty input, `exit`, or `quit` (case-insensitive) end the session.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{Agent, ConversationHistory, ToolCatalog, ToolProvider, TurnOutcome, prompt};
use agent_mcp::McpClient;
use agent_ollama::OllamaCompleter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, server_args)) = args.split_first() else {
        bail!("usage: agent-cli <mcp-server-command> [args...]");
    };

    // Spawn the tool server and discover its tools.
    let client = Arc::new(
        McpClient::spawn(command, server_args)
            .await
            .with_context(|| format!("failed to start MCP server `{command}`"))?,
    );

    let descriptors = client
        .list_tools()
        .await
        .context("tool discovery failed")?;
    // A duplicate tool name makes dispatch ambiguous; refuse to start.
    let catalog = ToolCatalog::build(descriptors)?;
    tracing::info!("Connected tools: {:?}", catalog.names());

    // Model backend
    let completer = Arc::new(OllamaCompleter::from_env());
    match completer.health_check().await {
        Ok(true) => tracing::info!(model = completer.model(), "Connected to Ollama"),
        Ok(false) | Err(_) => {
            tracing::warn!("Ollama not available - completions will fail");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    // System prompt is fixed for the session: protocol rules plus the
    // rendered tool listing.
    let mut history = ConversationHistory::with_system(prompt::system_prompt(&catalog));
    let agent = Agent::with_defaults(completer, client.clone(), catalog);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty()
            || input.eq_ignore_ascii_case("exit")
            || input.eq_ignore_ascii_case("quit")
        {
            break;
        }

        match agent.run_turn(&mut history, input).await {
            Ok(TurnOutcome::Answered(text)) => println!("\nAgent: {text}"),
            Ok(TurnOutcome::BudgetExhausted) => {
                println!("\n[incomplete] No final answer within the iteration budget.");
            }
            Err(e) => eprintln!("[error] {e}"),
        }
    }

    client.shutdown().await;
    Ok(())
}
